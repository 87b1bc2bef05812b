//! # awaycal-render
//!
//! Rendering backends for awaycal absence reports.
//!
//! This crate provides:
//! - Excel workbooks, one worksheet per report sheet
//! - Plain-text tables for a quick look in the terminal
//! - The `Renderer` trait shared by both
//!
//! ## Example
//!
//! ```rust,ignore
//! use awaycal_core::{AbsenceIndex, ReportBuilder};
//! use awaycal_render::{ExcelRenderer, Renderer, TextRenderer};
//!
//! let report = ReportBuilder::default().build(&resources, &index, 2025);
//!
//! let xlsx_bytes = ExcelRenderer::new().render(&report)?;
//! std::fs::write("calendar.xlsx", xlsx_bytes)?;
//!
//! println!("{}", TextRenderer::new().render(&report)?);
//! ```

pub mod excel;
pub mod text;

pub use excel::ExcelRenderer;
pub use text::TextRenderer;

use awaycal_core::Report;
use thiserror::Error;

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, report: &Report) -> Result<Self::Output, RenderError>;
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Reject reports that cannot be laid out
pub(crate) fn validate(report: &Report) -> Result<(), RenderError> {
    if report.sheets.is_empty() {
        return Err(RenderError::InvalidData("report has no sheets".into()));
    }
    Ok(())
}
