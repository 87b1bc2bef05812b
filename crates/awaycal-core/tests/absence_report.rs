//! End-to-end tests from raw appointments to report sheets

use awaycal_core::{
    AbsenceError, AbsenceIndex, Appointment, FieldValue, ReportBuilder, Resource, Row, Sheet,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn timestamp(year: i32, month: u32, day: u32) -> FieldValue {
    FieldValue::Timestamp(date(year, month, day).and_hms_opt(0, 0, 0).unwrap())
}

fn staff() -> Vec<Resource> {
    vec![
        Resource::new(3, "Doe, Jane"),
        Resource::new(1, "Muster, Max"),
        Resource::new(2, "Roe, Richard"),
    ]
}

/// Mixed representations as they come out of the appointment table
fn vacation_calendar() -> Vec<Appointment> {
    vec![
        Appointment::new(10, "2024-12-30 00:00:00", "2025-01-02 00:00:00", "1").title("Winter break"),
        Appointment::new(11, timestamp(2025, 1, 2), timestamp(2025, 1, 3), 3_i64),
        Appointment::new(12, "2025-01-02 08:00:00", "2025-01-02 12:00:00", FieldValue::Null)
            .title("Team meeting")
            .all_day(false),
        Appointment::new(13, "2025-02-28 00:00:00", "2025-03-01 00:00:00", "2"),
    ]
}

fn cells_on(sheet: &Sheet, wanted: NaiveDate) -> Vec<String> {
    sheet
        .day_rows()
        .find(|d| d.date == wanted)
        .map(|d| d.cells())
        .unwrap()
}

#[test]
fn three_sheets_share_header() {
    let index = AbsenceIndex::from_appointments(&vacation_calendar()).unwrap();
    let report = ReportBuilder::default().build(&staff(), &index, 2025);

    assert_eq!(
        report.header,
        vec!["Date", "Day", "Doe, Jane", "Muster, Max", "Roe, Richard", "Away (%)"]
    );
    let titles: Vec<&str> = report.sheets.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["2025", "2024", "2026"]);

    for sheet in &report.sheets {
        for day in sheet.day_rows() {
            assert_eq!(day.cells().len(), report.width());
        }
    }
}

#[test]
fn absences_cross_year_boundary() {
    let index = AbsenceIndex::from_appointments(&vacation_calendar()).unwrap();
    let report = ReportBuilder::default().build(&staff(), &index, 2025);
    let (current, previous) = (&report.sheets[0], &report.sheets[1]);

    assert_eq!(
        cells_on(previous, date(2024, 12, 31)),
        vec!["31.12.2024", "Tue", "", "U", "", "33.33"]
    );
    assert_eq!(
        cells_on(current, date(2025, 1, 2)),
        vec!["02.01.2025", "Thu", "U", "U", "", "66.67"]
    );
    assert_eq!(
        cells_on(current, date(2025, 1, 3)),
        vec!["03.01.2025", "Fri", "U", "", "", "33.33"]
    );
    assert_eq!(
        cells_on(current, date(2025, 3, 1)),
        vec!["01.03.2025", "Sat", "", "", "U", "33.33"]
    );
}

#[test]
fn appointments_without_resource_do_not_count() {
    let index = AbsenceIndex::from_appointments(&vacation_calendar()).unwrap();
    assert_eq!(index.skipped(), 1);
    assert_eq!(index.interval_count(), 3);
}

#[test]
fn malformed_appointment_aborts() {
    let mut appointments = vacation_calendar();
    appointments.push(Appointment::new(14, "2025-13-01 00:00:00", "2025-13-02 00:00:00", 1_i64));

    let err = AbsenceIndex::from_appointments(&appointments).unwrap_err();
    assert!(matches!(err, AbsenceError::InvalidTimestamp { .. }));
}

#[test]
fn two_resources_one_away_is_half() {
    let resources = [Resource::new(1, "A"), Resource::new(2, "B")];
    let index = AbsenceIndex::from_appointments(&[Appointment::new(
        1,
        "2018-01-04 00:00:00",
        "2018-01-06 00:00:00",
        2_i64,
    )])
    .unwrap();

    let sheet = ReportBuilder::default().build_sheet(&resources, &index, 2018);
    let day = sheet.day_rows().find(|d| d.date == date(2018, 1, 5)).unwrap();
    assert_eq!(day.away_percentage, "50.00");
}

#[test]
fn no_resources_still_builds() {
    let index = AbsenceIndex::from_appointments(&vacation_calendar()).unwrap();
    let report = ReportBuilder::default().build(&[], &index, 2025);

    assert_eq!(report.header, vec!["Date", "Day", "Away (%)"]);
    for sheet in &report.sheets {
        assert!(sheet.day_rows().all(|d| d.away_percentage == "0.00"));
    }
}

#[test]
fn each_month_has_blank_then_label() {
    let report = ReportBuilder::default().build(&staff(), &AbsenceIndex::default(), 2025);

    for sheet in &report.sheets {
        let mut label_rows = 0;
        for pair in sheet.rows.windows(2) {
            if let [Row::Separator(blank), Row::Separator(label)] = pair {
                assert!(blank.is_empty());
                assert!(label.ends_with(&sheet.year.to_string()));
                label_rows += 1;
            }
        }
        assert_eq!(label_rows, 12);
    }
}
