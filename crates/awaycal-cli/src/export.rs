//! The export run: read, normalize, build, write

use std::path::Path;

use anyhow::{Context, Result};
use awaycal_core::{AbsenceIndex, Agent, Appointment, Calendar, Report, ReportBuilder, Resource};
use awaycal_db::OtrsDb;
use awaycal_render::{ExcelRenderer, Renderer, TextRenderer};
use clap::ValueEnum;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Output format of `export`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook
    #[default]
    Xlsx,
    /// Aligned text tables on stdout
    Text,
}

/// Everything the report needs from the database
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub calendars: Vec<Calendar>,
    pub agents: Vec<Agent>,
    pub appointments: Vec<Appointment>,
}

impl Snapshot {
    /// Read calendars, agents and the configured calendar's appointments.
    pub fn fetch(db: &mut OtrsDb, config: &AppConfig) -> Result<Self> {
        let calendars = db.calendars().context("reading calendars")?;
        let agents = db.agents().context("reading agents")?;
        let appointments = db
            .appointments(config.calendar_id)
            .with_context(|| format!("reading appointments of calendar {}", config.calendar_id))?;

        Ok(Self {
            calendars,
            agents,
            appointments,
        })
    }
}

/// Build the report from fetched records.
pub fn build_report(snapshot: &Snapshot, config: &AppConfig, base_year: i32) -> Result<Report> {
    match snapshot.calendars.iter().find(|c| c.id == config.calendar_id) {
        Some(calendar) => info!(id = calendar.id, name = %calendar.name, "using calendar"),
        None => warn!(
            calendar_id = config.calendar_id,
            "calendar is not among the active calendars"
        ),
    }

    let resources: Vec<Resource> = snapshot.agents.iter().map(Agent::resource).collect();
    if resources.is_empty() {
        warn!("no agents found, every day will report 0.00 %");
    }

    let index = AbsenceIndex::from_appointments(&snapshot.appointments)
        .context("normalizing appointments")?;
    info!(
        agents = resources.len(),
        appointments = snapshot.appointments.len(),
        skipped = index.skipped(),
        "loaded absences"
    );

    let report = ReportBuilder::new(config.report_options()).build(&resources, &index, base_year);
    for sheet in &report.sheets {
        if let Some(peak) = sheet.peak() {
            info!(
                sheet = %sheet.title,
                date = %peak.formatted_date(),
                away = peak.away,
                percent = %peak.away_percentage,
                "peak absence"
            );
        }
    }

    Ok(report)
}

/// Write the report in the requested format.
pub fn write_report(report: &Report, format: OutputFormat, output: &Path) -> Result<()> {
    match format {
        OutputFormat::Xlsx => {
            ExcelRenderer::new()
                .save(report, output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote {}", output.display());
        }
        OutputFormat::Text => {
            let text = TextRenderer::new().render(report)?;
            print!("{text}");
        }
    }
    Ok(())
}

/// Full export: connect, fetch, build, write.
pub fn run(config: &AppConfig, base_year: i32, format: OutputFormat, output: &Path) -> Result<()> {
    let mut db = OtrsDb::connect(&config.database)
        .with_context(|| format!("connecting to {}", config.database.redacted()))?;
    let snapshot = Snapshot::fetch(&mut db, config)?;
    let report = build_report(&snapshot, config, base_year)?;
    write_report(&report, format, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use awaycal_core::{AbsenceError, FieldValue, Row};

    fn agent(id: i64, last: &str, first: &str) -> Agent {
        Agent {
            id,
            login: format!("{}.{}", first, last).to_lowercase(),
            last_name: last.into(),
            first_name: first.into(),
            display_name: format!("{last}, {first}"),
            mail: format!("{first}@example.org"),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            calendars: vec![Calendar {
                id: 1,
                name: "Vacation".into(),
            }],
            agents: vec![agent(2, "Doe", "Jane"), agent(1, "Roe", "Rick")],
            appointments: vec![
                Appointment::new(1, "2026-03-02 00:00:00", "2026-03-06 00:00:00", "1"),
                Appointment::new(2, "2026-03-04 00:00:00", "2026-03-04 00:00:00", FieldValue::Null),
            ],
        }
    }

    #[test]
    fn report_columns_follow_agent_order() {
        let report = build_report(&snapshot(), &AppConfig::default(), 2026).unwrap();
        assert_eq!(report.header, vec!["Date", "Day", "Doe, Jane", "Roe, Rick", "Away (%)"]);
    }

    #[test]
    fn report_marks_absence() {
        let report = build_report(&snapshot(), &AppConfig::default(), 2026).unwrap();
        let day = report.sheets[0]
            .day_rows()
            .find(|d| d.formatted_date() == "04.03.2026")
            .unwrap();
        assert_eq!(day.markers, vec!["", "U"]);
        assert_eq!(day.away_percentage, "50.00");
    }

    #[test]
    fn unknown_calendar_still_builds() {
        let config = AppConfig {
            calendar_id: 99,
            ..AppConfig::default()
        };
        let report = build_report(&snapshot(), &config, 2026).unwrap();
        assert_eq!(report.sheets.len(), 3);
    }

    #[test]
    fn malformed_appointment_keeps_cause() {
        let mut snapshot = snapshot();
        snapshot
            .appointments
            .push(Appointment::new(3, "03/02/2026", "03/06/2026", 1_i64));

        let err = build_report(&snapshot, &AppConfig::default(), 2026).unwrap_err();
        assert!(err.downcast_ref::<AbsenceError>().is_some());
    }

    #[test]
    fn empty_snapshot_builds_blank_report() {
        let report = build_report(&Snapshot::default(), &AppConfig::default(), 2026).unwrap();
        assert_eq!(report.header, vec!["Date", "Day", "Away (%)"]);
        assert!(matches!(report.sheets[0].rows[0], Row::Separator(_)));
    }

    #[test]
    fn writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.xlsx");
        let report = build_report(&snapshot(), &AppConfig::default(), 2026).unwrap();

        write_report(&report, OutputFormat::Xlsx, &path).unwrap();
        assert!(path.is_file());
    }
}
