//! # awaycal-core
//!
//! Core domain model for the awaycal absence export.
//!
//! This crate provides:
//! - Domain types: `Agent`, `Calendar`, `Appointment`, `Resource`, `Interval`
//! - Interval normalization: `AbsenceIndex`
//! - Calendar utilities: month grids, weekday and month names
//! - Report building: `ReportBuilder`, `Report`, `Sheet`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use awaycal_core::{AbsenceIndex, Appointment, FieldValue, ReportBuilder, Resource};
//!
//! let appointments = vec![Appointment::new(
//!     1,
//!     FieldValue::text("2018-01-04 00:00:00"),
//!     FieldValue::text("2018-01-06 00:00:00"),
//!     FieldValue::Int(2),
//! )];
//! let index = AbsenceIndex::from_appointments(&appointments).unwrap();
//! let resources = vec![Resource::new(2, "Foo, Bar")];
//!
//! let report = ReportBuilder::default().build(&resources, &index, 2018);
//! assert_eq!(report.sheets.len(), 3);
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod calendar;
pub mod normalize;
pub mod report;

pub use calendar::{month_grid, NameLocale};
pub use normalize::{is_absent_on, normalize_appointments, AbsenceIndex};
pub use report::{away_percentage, DayRow, Report, ReportBuilder, ReportOptions, Row, Sheet};

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier of an OTRS agent (`users.id`)
pub type ResourceId = i64;

/// Identifier of an OTRS calendar (`calendar.id`)
pub type CalendarId = i64;

/// Timestamp layout used by the appointment table when values arrive as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Raw Values
// ============================================================================

/// A raw column value as delivered by the record store.
///
/// The appointment table does not hand out uniformly typed values: depending
/// on the protocol, timestamps come back either parsed or as text, and the
/// resource column may be numeric, textual or NULL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Int(i64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Interpret the value as a resource id.
    ///
    /// Returns `None` for anything that is not an integer or a decimal string.
    pub fn as_resource_id(&self) -> Option<ResourceId> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Null | Self::Timestamp(_) => None,
        }
    }

    /// Convert the value to a calendar date, dropping the time of day.
    pub fn to_date(&self, field: &'static str) -> Result<NaiveDate, AbsenceError> {
        match self {
            Self::Timestamp(ts) => Ok(ts.date()),
            Self::Text(text) => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
                .map(|ts| ts.date())
                .map_err(|source| AbsenceError::InvalidTimestamp {
                    field,
                    value: text.clone(),
                    source,
                }),
            Self::Null | Self::Int(_) => Err(AbsenceError::MissingTimestamp {
                field,
                value: self.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ============================================================================
// Directory Records
// ============================================================================

/// A valid OTRS agent with a configured e-mail address
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: ResourceId,
    pub login: String,
    pub last_name: String,
    pub first_name: String,
    /// "Last, First" as composed by the directory query
    pub display_name: String,
    pub mail: String,
}

impl Agent {
    /// The report column for this agent
    pub fn resource(&self) -> Resource {
        Resource::new(self.id, self.display_name.clone())
    }
}

/// An active appointment calendar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: CalendarId,
    pub name: String,
}

/// A raw appointment record from the configured calendar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    pub start_time: FieldValue,
    pub end_time: FieldValue,
    pub all_day: bool,
    pub resource_id: FieldValue,
}

impl Appointment {
    pub fn new(
        id: i64,
        start_time: impl Into<FieldValue>,
        end_time: impl Into<FieldValue>,
        resource_id: impl Into<FieldValue>,
    ) -> Self {
        Self {
            id,
            title: String::new(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            all_day: true,
            resource_id: resource_id.into(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }
}

// ============================================================================
// Report Inputs
// ============================================================================

/// One report column: a staff member who can be marked absent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

impl Resource {
    pub fn new(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Inclusive date range of one absence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    /// Ranges with `start > end` are kept as delivered and never match.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error raised while turning raw records into report data
#[derive(Debug, Error)]
pub enum AbsenceError {
    #[error("Invalid {field} '{value}': expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Missing {field}: got {value}")]
    MissingTimestamp { field: &'static str, value: String },
}

// ============================================================================
// Tests
// ============================================================================
