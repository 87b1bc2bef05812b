//! Calendar utilities: month grids and localized day/month names

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Dates of the full weeks covering `year`/`month`.
///
/// The grid starts on `first_weekday` and includes the lead and trail days
/// from the adjacent months. Invalid month numbers yield an empty grid.
pub fn month_grid(year: i32, month: u32, first_weekday: Weekday) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = last_day_of_month(first);

    let lead = days_between(first_weekday, first.weekday());
    let trail = days_between(last.weekday(), first_weekday.pred());

    let (Some(start), Some(end)) = (
        first.checked_sub_days(Days::new(u64::from(lead))),
        last.checked_add_days(Days::new(u64::from(trail))),
    ) else {
        return Vec::new();
    };

    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Days from `from` forward to the next `to` (0 when equal)
fn days_between(from: Weekday, to: Weekday) -> u32 {
    (to.num_days_from_monday() + 7 - from.num_days_from_monday()) % 7
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Language used for weekday and month names in the report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameLocale {
    #[default]
    English,
    German,
}

const WEEKDAYS_EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKDAYS_DE: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober",
    "November", "Dezember",
];

impl NameLocale {
    pub fn weekday_abbrev(self, weekday: Weekday) -> &'static str {
        let names = match self {
            Self::English => &WEEKDAYS_EN,
            Self::German => &WEEKDAYS_DE,
        };
        names[weekday.num_days_from_monday() as usize]
    }

    /// Full month name; empty for month numbers outside 1..=12
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            Self::English => &MONTHS_EN,
            Self::German => &MONTHS_DE,
        };
        month
            .checked_sub(1)
            .and_then(|idx| names.get(idx as usize))
            .copied()
            .unwrap_or("")
    }
}

impl std::str::FromStr for NameLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "de" | "german" => Ok(Self::German),
            other => Err(format!("unknown locale '{other}' (expected english or german)")),
        }
    }
}
