use chrono::{DateTime, Local};
use currentcost_quantities::energy::KilowattHours;
use turso::{Connection, Value};

use crate::prelude::*;

/// Hourly consumption series keyed by Unix timestamp.
#[must_use]
pub struct Consumption<'c>(pub &'c Connection);

impl Consumption<'_> {
    /// Insert the point or replace the value stored for the same timestamp.
    #[instrument(skip_all, fields(timestamp = %timestamp, value = ?value))]
    pub async fn upsert(&self, timestamp: DateTime<Local>, value: KilowattHours) -> Result {
        // language=sqlite
        const SQL: &str = r"
            INSERT INTO consumption (date, kwatt) VALUES (?1, ?2)
            ON CONFLICT DO UPDATE SET kwatt = ?2
        ";

        debug!("upserting the consumption…");
        self.0
            .prepare_cached(SQL)
            .await?
            .execute((timestamp.timestamp(), value.into_inner()))
            .await
            .context("failed to upsert the consumption")?;
        Ok(())
    }

    /// Fetch the entire series, oldest first.
    #[instrument(skip_all)]
    pub async fn select_all(&self) -> Result<Vec<(DateTime<Local>, KilowattHours)>> {
        // language=sqlite
        const SQL: &str = "SELECT date, kwatt FROM consumption ORDER BY date";

        let mut rows = self.0.query(SQL, ()).await.context("failed to query the consumption")?;
        let mut series = Vec::new();
        while let Some(row) = rows.next().await? {
            series.push((to_timestamp(row.get_value(0)?)?, to_energy(row.get_value(1)?)?));
        }
        info!(n_points = series.len(), "fetched the consumption");
        Ok(series)
    }
}

fn to_timestamp(value: Value) -> Result<DateTime<Local>> {
    match value {
        Value::Integer(seconds) => DateTime::from_timestamp(seconds, 0)
            .map(|timestamp| timestamp.with_timezone(&Local))
            .with_context(|| format!("timestamp `{seconds}` is out of range")),
        other => bail!("`date` is not an integer: {other:?}"),
    }
}

#[expect(clippy::cast_precision_loss)]
fn to_energy(value: Value) -> Result<KilowattHours> {
    match value {
        Value::Real(kwatt) => Ok(KilowattHours::from(kwatt)),
        Value::Integer(kwatt) => Ok(KilowattHours::from(kwatt as f64)),
        other => bail!("`kwatt` is not a number: {other:?}"),
    }
}
