//! # awaycal-db
//!
//! Read-only access to the OTRS tables the absence export needs:
//! - `users` joined with `user_preferences` (agents with an e-mail address)
//! - `calendar` (active calendars)
//! - `calendar_appointment` (appointments of one calendar)
//!
//! A run holds exactly one connection; nothing is pooled.

pub mod error;
pub mod value;

pub use error::{DbError, DbResult};
pub use value::field_value;

use std::collections::HashMap;

use awaycal_core::{Agent, Appointment, Calendar, CalendarId};
use mysql::prelude::Queryable;
use mysql::{params, Conn, Opts, OptsBuilder, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::value::{lossy_text, take, take_as};

const AGENTS_SQL: &str = r"
    SELECT users.id, users.login, users.last_name, users.first_name,
           CONCAT(users.last_name, ', ', users.first_name) AS display_name,
           u.preferences_value AS mail
      FROM users
     INNER JOIN user_preferences u ON users.id = u.user_id
     WHERE u.preferences_key = 'UserEmail'
       AND users.valid_id = 1
     ORDER BY users.last_name";

const CALENDARS_SQL: &str = r"
    SELECT id, name
      FROM calendar
     WHERE calendar.valid_id = 1
     ORDER BY id ASC";

const APPOINTMENTS_SQL: &str = r"
    SELECT id, title, start_time, end_time, all_day, resource_id
      FROM calendar_appointment
     WHERE calendar_id = :calendar_id
     ORDER BY id ASC";

/// Connection settings for the OTRS database
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            user: "otrs".into(),
            password: "otrs".into(),
            database: "otrs".into(),
        }
    }
}

impl DatabaseConfig {
    /// Driver options for this configuration
    pub fn opts(&self) -> Opts {
        OptsBuilder::new()
            .ip_or_hostname(Some(self.host.clone()))
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .into()
    }

    /// `user@host:port/database`, without the password
    pub fn redacted(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

/// Connection to an OTRS database
pub struct OtrsDb {
    conn: Conn,
}

impl OtrsDb {
    /// Open the single connection used for the run.
    pub fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to {}", config.redacted());
        let conn = Conn::new(config.opts())?;
        debug!("Database connection established");
        Ok(Self { conn })
    }

    /// Valid agents with an e-mail preference, ordered by last name.
    ///
    /// An agent with several e-mail rows keeps its first position; the last
    /// row's values win.
    pub fn agents(&mut self) -> DbResult<Vec<Agent>> {
        let rows: Vec<Row> = self.conn.query(AGENTS_SQL)?;

        let mut agents: Vec<Agent> = Vec::with_capacity(rows.len());
        let mut positions: HashMap<i64, usize> = HashMap::new();
        for row in rows {
            let agent = agent_from_row(row)?;
            match positions.get(&agent.id) {
                Some(&pos) => agents[pos] = agent,
                None => {
                    positions.insert(agent.id, agents.len());
                    agents.push(agent);
                }
            }
        }

        debug!(count = agents.len(), "fetched agents");
        Ok(agents)
    }

    /// Active calendars, ordered by id
    pub fn calendars(&mut self) -> DbResult<Vec<Calendar>> {
        let rows: Vec<Row> = self.conn.query(CALENDARS_SQL)?;
        let calendars = rows
            .into_iter()
            .map(calendar_from_row)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = calendars.len(), "fetched calendars");
        Ok(calendars)
    }

    /// Appointments of one calendar, ordered by id
    pub fn appointments(&mut self, calendar_id: CalendarId) -> DbResult<Vec<Appointment>> {
        let rows: Vec<Row> = self.conn.exec(
            APPOINTMENTS_SQL,
            params! { "calendar_id" => calendar_id },
        )?;
        let appointments = rows
            .into_iter()
            .map(appointment_from_row)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(calendar_id, count = appointments.len(), "fetched appointments");
        Ok(appointments)
    }
}

fn agent_from_row(mut row: Row) -> DbResult<Agent> {
    const Q: &str = "agents";
    Ok(Agent {
        id: take_as(&mut row, Q, "id")?,
        login: take_as(&mut row, Q, "login")?,
        last_name: lossy_text(take(&mut row, Q, "last_name")?),
        first_name: lossy_text(take(&mut row, Q, "first_name")?),
        display_name: lossy_text(take(&mut row, Q, "display_name")?),
        mail: lossy_text(take(&mut row, Q, "mail")?),
    })
}

fn calendar_from_row(mut row: Row) -> DbResult<Calendar> {
    const Q: &str = "calendars";
    Ok(Calendar {
        id: take_as(&mut row, Q, "id")?,
        name: lossy_text(take(&mut row, Q, "name")?),
    })
}

fn appointment_from_row(mut row: Row) -> DbResult<Appointment> {
    const Q: &str = "appointments";
    Ok(Appointment {
        id: take_as(&mut row, Q, "id")?,
        title: lossy_text(take(&mut row, Q, "title")?),
        start_time: field_value(take(&mut row, Q, "start_time")?),
        end_time: field_value(take(&mut row, Q, "end_time")?),
        all_day: take_as::<Option<i64>>(&mut row, Q, "all_day")?.is_some_and(|v| v != 0),
        resource_id: field_value(take(&mut row, Q, "resource_id")?),
    })
}
