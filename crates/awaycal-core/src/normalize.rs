//! Per-resource absence intervals
//!
//! Appointments are grouped by the agent they belong to. Records without a
//! usable resource id are routine in OTRS (team-only appointments) and are
//! skipped; timestamps that cannot be read abort the run.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::{AbsenceError, Appointment, Interval, ResourceId};

/// Absence intervals keyed by resource id
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbsenceIndex {
    intervals: HashMap<ResourceId, Vec<Interval>>,
    skipped: usize,
}

impl AbsenceIndex {
    /// Build the index from raw appointment records.
    ///
    /// Intervals keep the input order within each resource.
    pub fn from_appointments(appointments: &[Appointment]) -> Result<Self, AbsenceError> {
        let mut index = Self::default();

        for appointment in appointments {
            let Some(resource_id) = appointment.resource_id.as_resource_id() else {
                trace!(
                    appointment = appointment.id,
                    resource = %appointment.resource_id,
                    "skipping appointment without resource"
                );
                index.skipped += 1;
                continue;
            };

            let start = appointment.start_time.to_date("start_time")?;
            let end = appointment.end_time.to_date("end_time")?;

            index
                .intervals
                .entry(resource_id)
                .or_default()
                .push(Interval::new(start, end));
        }

        debug!(
            resources = index.resource_count(),
            intervals = index.interval_count(),
            skipped = index.skipped,
            "normalized appointments"
        );

        Ok(index)
    }

    /// True if the resource has an interval covering `date`.
    ///
    /// Unknown resources are never absent.
    pub fn is_absent(&self, date: NaiveDate, resource_id: ResourceId) -> bool {
        self.intervals
            .get(&resource_id)
            .is_some_and(|list| list.iter().any(|interval| interval.contains(date)))
    }

    pub fn intervals(&self, resource_id: ResourceId) -> &[Interval] {
        self.intervals.get(&resource_id).map_or(&[], Vec::as_slice)
    }

    /// Number of resources with at least one interval
    pub fn resource_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.values().map(Vec::len).sum()
    }

    /// Records dropped because their resource id did not resolve
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Functional form of [`AbsenceIndex::from_appointments`]
pub fn normalize_appointments(appointments: &[Appointment]) -> Result<AbsenceIndex, AbsenceError> {
    AbsenceIndex::from_appointments(appointments)
}

/// Functional form of [`AbsenceIndex::is_absent`]
pub fn is_absent_on(date: NaiveDate, resource_id: ResourceId, index: &AbsenceIndex) -> bool {
    index.is_absent(date, resource_id)
}
