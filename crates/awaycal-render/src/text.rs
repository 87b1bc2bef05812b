//! Plain-text table renderer
//!
//! Renders each sheet as an aligned table, for a quick look at the report
//! without opening a spreadsheet.

use std::fmt::Write;

use awaycal_core::{Report, Row, Sheet};

use crate::{validate, RenderError, Renderer};

/// Plain-text table renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Column separator
    pub separator: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            separator: " | ".into(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    fn column_widths(report: &Report, sheet: &Sheet) -> Vec<usize> {
        let mut widths: Vec<usize> = report.header.iter().map(|h| h.chars().count()).collect();
        for day in sheet.day_rows() {
            for (width, cell) in widths.iter_mut().zip(day.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn write_line(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(&self.separator);
        let _ = writeln!(out, "{}", line.trim_end());
    }

    fn render_sheet(&self, out: &mut String, report: &Report, sheet: &Sheet) {
        let widths = Self::column_widths(report, sheet);
        let _ = writeln!(out, "== {} ==", sheet.title);
        self.write_line(out, &report.header, &widths);

        for row in &sheet.rows {
            match row {
                Row::Separator(label) => {
                    let _ = writeln!(out, "{label}");
                }
                Row::Day(day) => self.write_line(out, &day.cells(), &widths),
            }
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        validate(report)?;

        let mut out = String::new();
        for (i, sheet) in report.sheets.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_sheet(&mut out, report, sheet);
        }
        Ok(out)
    }
}
