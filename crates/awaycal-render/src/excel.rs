//! Excel absence workbook renderer
//!
//! Writes one worksheet per report sheet, in report order:
//!
//! ```text
//! Sheet: 2025
//! | Date       | Day | Doe, Jane | Roe, Richard | Away (%) |
//! |            |     |           |              |          |
//! | January 2025                                           |
//! | 01.01.2025 | Wed | U         |              | 50.00    |
//! ```
//!
//! Cells are written as text exactly as the report holds them, so the sheet
//! reads the same as the text preview.

use std::path::Path;

use awaycal_core::{DayRow, Report, Row, Sheet};
use chrono::{Datelike, Weekday};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

use crate::{validate, RenderError, Renderer};

/// Excel absence workbook renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Keep the header row visible while scrolling
    pub freeze_header: bool,
    /// Shade Saturday and Sunday rows
    pub shade_weekends: bool,
    /// Upper bound for resource column widths
    pub max_column_width: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            freeze_header: true,
            shade_weekends: true,
            max_column_width: 30.0,
        }
    }
}

struct ExcelFormats {
    header: Format,
    month: Format,
    text: Format,
    marker: Format,
    weekend_text: Format,
    weekend_marker: Format,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the header scroll away with the data
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    /// Render weekends like any other day
    pub fn no_weekend_shading(mut self) -> Self {
        self.shade_weekends = false;
        self
    }

    /// Set the upper bound for resource column widths
    pub fn max_column_width(mut self, width: f64) -> Self {
        self.max_column_width = width;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let mut workbook = self.build_workbook(report)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Write the workbook to `path`
    pub fn save(&self, report: &Report, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let mut workbook = self.build_workbook(report)?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    fn build_workbook(&self, report: &Report) -> Result<Workbook, RenderError> {
        validate(report)?;

        let mut workbook = Workbook::new();
        let formats = Self::create_formats();

        for sheet in &report.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.title)?;
            self.write_sheet(worksheet, report, sheet, &formats)?;
            debug!(sheet = %sheet.title, rows = sheet.rows.len(), "wrote worksheet");
        }

        Ok(workbook)
    }

    /// Create reusable formats
    fn create_formats() -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let month = Format::new().set_bold().set_font_size(12);

        let text = Format::new().set_border(FormatBorder::Thin);

        let marker = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let weekend_text = Format::new()
            .set_background_color(0xD9D9D9) // Light gray
            .set_border(FormatBorder::Thin);

        let weekend_marker = Format::new()
            .set_align(FormatAlign::Center)
            .set_background_color(0xD9D9D9)
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            header,
            month,
            text,
            marker,
            weekend_text,
            weekend_marker,
        }
    }

    fn write_sheet(
        &self,
        worksheet: &mut Worksheet,
        report: &Report,
        sheet: &Sheet,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        for (col, title) in report.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &formats.header)?;
        }
        self.set_column_widths(worksheet, report)?;

        if self.freeze_header {
            worksheet.set_freeze_panes(1, 0)?;
        }

        for (offset, row) in sheet.rows.iter().enumerate() {
            let row_idx = offset as u32 + 1;
            match row {
                Row::Separator(label) if label.is_empty() => {}
                Row::Separator(label) => {
                    worksheet.write_string_with_format(row_idx, 0, label, &formats.month)?;
                }
                Row::Day(day) => self.write_day(worksheet, row_idx, day, formats)?,
            }
        }

        Ok(())
    }

    fn write_day(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        day: &DayRow,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let weekend = self.shade_weekends && matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun);
        let (text, marker) = if weekend {
            (&formats.weekend_text, &formats.weekend_marker)
        } else {
            (&formats.text, &formats.marker)
        };

        let cells = day.cells();
        let last = cells.len().saturating_sub(1);
        for (col, cell) in cells.iter().enumerate() {
            // resource columns sit between Day and Away (%)
            let format = if (2..last).contains(&col) { marker } else { text };
            worksheet.write_string_with_format(row, col as u16, cell, format)?;
        }

        Ok(())
    }

    fn set_column_widths(&self, worksheet: &mut Worksheet, report: &Report) -> Result<(), RenderError> {
        let last = report.width().saturating_sub(1);
        for (col, title) in report.header.iter().enumerate() {
            let width = match col {
                0 => 12.0,
                1 => 6.0,
                c if c == last => 10.0,
                _ => (title.chars().count() as f64 + 2.0).clamp(4.0, self.max_column_width),
            };
            worksheet.set_column_width(col as u16, width)?;
        }
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(report)
    }
}
