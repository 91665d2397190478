use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};
use currentcost_quantities::energy::KilowattHours;

use crate::{
    core::tag::{Anchor, Resolved, Tag},
    db::consumption::Consumption,
    frame::Historical,
    prelude::*,
};

/// Reason for skipping a single history field.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Diagnostic {
    #[display("sensor {sensor}: `{tag}` has an unhandled precision")]
    UnhandledPrecision { sensor: u32, tag: String },

    #[display("sensor {sensor}: malformed tag `{tag}`: {reason}")]
    MalformedTag { sensor: u32, tag: String, reason: String },

    #[display("sensor {sensor}: `{tag}` has a malformed value `{value}`")]
    MalformedValue { sensor: u32, tag: String, value: String },

    #[display("sensor {sensor}: `{tag}` cannot be resolved: {reason}")]
    Unresolvable { sensor: u32, tag: String, reason: String },
}

/// Turns history dumps into absolute hourly and daily points.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Reconciler {
    /// Blocks of sensors with this or higher (0-based) index are ignored.
    n_sensors: u32,
}

impl Reconciler {
    pub const fn new(n_sensors: u32) -> Self {
        Self { n_sensors }
    }

    /// Stage the history dump.
    ///
    /// `today` is the local date at the moment of resolution, it anchors the daily tags.
    pub fn reconcile(self, history: &Historical, today: NaiveDate) -> Reconciliation {
        let anchor = Anchor::new(history.reported_at, today);
        let mut reconciliation = Reconciliation::default();
        for block in history.blocks.iter().filter(|block| block.sensor < self.n_sensors) {
            for (tag, value) in block.entries.iter().filter(|(tag, _)| tag != "sensor") {
                if let Err(diagnostic) = reconciliation.stage(block.sensor, tag, value, anchor) {
                    warn!("skipping: {diagnostic}");
                    reconciliation.diagnostics.push(diagnostic);
                }
            }
        }
        reconciliation
    }
}

/// Staged points of a single history dump.
///
/// Both series are keyed by timestamp, so a later point replaces an earlier one.
#[must_use]
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Top-of-the-hour points, these get persisted.
    pub hourly: BTreeMap<DateTime<Local>, KilowattHours>,

    /// Noon points, collected and reported but not persisted.
    pub daily: BTreeMap<DateTime<Local>, KilowattHours>,

    pub diagnostics: Vec<Diagnostic>,
}

impl Reconciliation {
    fn stage(
        &mut self,
        sensor: u32,
        tag: &str,
        value: &str,
        anchor: Anchor,
    ) -> Result<(), Diagnostic> {
        let resolved = Tag::classify(tag)
            .map_err(|error| Diagnostic::MalformedTag {
                sensor,
                tag: tag.to_owned(),
                reason: format!("{error:#}"),
            })?
            .resolve(anchor)
            .map_err(|error| Diagnostic::Unresolvable {
                sensor,
                tag: tag.to_owned(),
                reason: format!("{error:#}"),
            })?
            .ok_or_else(|| Diagnostic::UnhandledPrecision { sensor, tag: tag.to_owned() })?;
        let value = value
            .parse::<KilowattHours>()
            .ok()
            .filter(|value| value.into_inner().is_finite())
            .ok_or_else(|| Diagnostic::MalformedValue {
                sensor,
                tag: tag.to_owned(),
                value: value.to_owned(),
            })?;
        match resolved {
            Resolved::Hour(timestamp) => self.hourly.insert(timestamp, value),
            Resolved::Day(timestamp) => self.daily.insert(timestamp, value),
        };
        Ok(())
    }

    /// Upsert the hourly points, the daily ones are only logged.
    #[instrument(skip_all, fields(n_hourly = self.hourly.len(), n_daily = self.daily.len()))]
    pub async fn persist(&self, consumption: &Consumption<'_>) -> Result {
        for (timestamp, value) in &self.daily {
            info!(%timestamp, %value, "daily consumption");
        }
        for (timestamp, value) in &self.hourly {
            consumption.upsert(*timestamp, *value).await?;
        }
        Ok(())
    }
}
