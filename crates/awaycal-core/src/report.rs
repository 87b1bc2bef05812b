//! Day-by-day absence report
//!
//! One sheet per year, one row per calendar day, one marker column per
//! resource, and the share of resources away on that day. Months are
//! introduced by a blank row and a "Month Year" label row.
//!
//! ```text
//! | Date       | Day | Foo, Bar | Baz, Qux | Away (%) |
//! |            |     |          |          |          |
//! | January 2018                                      |
//! | 01.01.2018 | Mon |          |          | 0.00     |
//! | 04.01.2018 | Thu | U        |          | 50.00    |
//! ```

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{month_grid, NameLocale};
use crate::normalize::AbsenceIndex;
use crate::Resource;

/// Date layout of the first column
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Header of the last column
pub const AWAY_HEADER: &str = "Away (%)";

/// Report layout options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// Marker written into a resource's cell on days it is away
    pub symbol: String,
    /// Language for weekday and month names
    pub locale: NameLocale,
    /// First day of the week for the month grid
    pub first_weekday: Weekday,
    /// Months rendered per sheet
    pub months: RangeInclusive<u32>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            symbol: "U".into(),
            locale: NameLocale::English,
            first_weekday: Weekday::Mon,
            months: 1..=12,
        }
    }
}

/// Builds the three-year absence report
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    options: ReportOptions,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Set the away marker
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.options.symbol = symbol.into();
        self
    }

    /// Set the language for day and month names
    pub fn locale(mut self, locale: NameLocale) -> Self {
        self.options.locale = locale;
        self
    }

    /// Restrict the rendered months (defaults to the whole year)
    pub fn months(mut self, months: RangeInclusive<u32>) -> Self {
        self.options.months = months;
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Years rendered for `base_year`, in sheet order
    pub fn target_years(base_year: i32) -> [i32; 3] {
        [base_year, base_year - 1, base_year + 1]
    }

    /// Build sheets for `base_year`, the year before and the year after.
    pub fn build(&self, resources: &[Resource], index: &AbsenceIndex, base_year: i32) -> Report {
        let header = header_row(resources);
        let sheets = Self::target_years(base_year)
            .into_iter()
            .map(|year| self.build_sheet(resources, index, year))
            .collect();

        Report { header, sheets }
    }

    /// Build the sheet for a single year.
    pub fn build_sheet(&self, resources: &[Resource], index: &AbsenceIndex, year: i32) -> Sheet {
        let mut rows = Vec::new();

        for month in self.options.months.clone() {
            rows.push(Row::Separator(String::new()));
            rows.push(Row::Separator(format!(
                "{} {}",
                self.options.locale.month_name(month),
                year
            )));

            for date in month_grid(year, month, self.options.first_weekday) {
                if date.month() != month {
                    continue;
                }
                rows.push(Row::Day(self.day_row(date, resources, index)));
            }
        }

        let sheet = Sheet {
            title: year.to_string(),
            year,
            rows,
        };
        debug!(year, days = sheet.day_rows().count(), "built sheet");
        sheet
    }

    fn day_row(&self, date: NaiveDate, resources: &[Resource], index: &AbsenceIndex) -> DayRow {
        let mut away = 0;
        let markers = resources
            .iter()
            .map(|resource| {
                if index.is_absent(date, resource.id) {
                    away += 1;
                    self.options.symbol.clone()
                } else {
                    String::new()
                }
            })
            .collect();

        DayRow {
            date,
            day: self.options.locale.weekday_abbrev(date.weekday()).to_string(),
            markers,
            away,
            away_percentage: away_percentage(away, resources.len()),
        }
    }
}

/// `Date, Day, <one column per resource>, Away (%)`
pub fn header_row(resources: &[Resource]) -> Vec<String> {
    let mut header = Vec::with_capacity(resources.len() + 3);
    header.push("Date".to_string());
    header.push("Day".to_string());
    header.extend(resources.iter().map(|r| r.name.clone()));
    header.push(AWAY_HEADER.to_string());
    header
}

/// Share of `total` that is `away`, in percent with two decimals.
///
/// An empty roster yields `"0.00"`. The quotient is exact decimal arithmetic
/// and true midpoints round to even, so `23 / 160` (14.375 %) gives
/// `"14.38"`; formatting the binary float of the same quotient would give
/// `"14.37"`. The two only disagree on rosters of 160 or more.
pub fn away_percentage(away: usize, total: usize) -> String {
    if total == 0 {
        return "0.00".to_string();
    }

    let mut pct = (Decimal::from(away) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    pct.rescale(2);
    pct.to_string()
}

/// The complete report: a shared header and one sheet per year
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub header: Vec<String>,
    pub sheets: Vec<Sheet>,
}

impl Report {
    /// Column count of every row
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// One year of the report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub title: String,
    pub year: i32,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn day_rows(&self) -> impl Iterator<Item = &DayRow> {
        self.rows.iter().filter_map(|row| match row {
            Row::Day(day) => Some(day),
            Row::Separator(_) => None,
        })
    }

    /// First day with the most resources away, if anyone is away at all
    pub fn peak(&self) -> Option<&DayRow> {
        self.day_rows()
            .filter(|day| day.away > 0)
            .fold(None, |best: Option<&DayRow>, day| match best {
                Some(b) if b.away >= day.away => Some(b),
                _ => Some(day),
            })
    }
}

/// A row of a sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Row {
    /// Month grouping row; the empty string is a blank spacer
    Separator(String),
    Day(DayRow),
}

/// One calendar day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRow {
    pub date: NaiveDate,
    /// Weekday abbreviation
    pub day: String,
    /// Away symbol or empty, one per resource in header order
    pub markers: Vec<String>,
    /// Number of resources away
    pub away: usize,
    pub away_percentage: String,
}

impl DayRow {
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Cell texts in header order
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.markers.len() + 3);
        cells.push(self.formatted_date());
        cells.push(self.day.clone());
        cells.extend(self.markers.iter().cloned());
        cells.push(self.away_percentage.clone());
        cells
    }
}
