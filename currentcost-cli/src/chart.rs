use std::{
    fmt::{Display, Formatter},
    fs,
    path::Path,
};

use chrono::{DateTime, Datelike, Local, Timelike};
use currentcost_quantities::energy::KilowattHours;
use itertools::Itertools;

use crate::prelude::*;

/// JavaScript fragment with the consumption series for Google Charts.
///
/// The page is expected to `eval` the `consumptionData` string into a `DataTable`.
#[must_use]
pub struct ChartScript<'a>(pub &'a [(DateTime<Local>, KilowattHours)]);

impl Display for ChartScript<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rows = self.0.iter().format_with(", ", |(timestamp, value), f| {
            // JavaScript months are zero-based.
            f(&format_args!(
                "[new Date({}, {}, {}, {}, {}, {}), {}]",
                timestamp.year(),
                timestamp.month0(),
                timestamp.day(),
                timestamp.hour(),
                timestamp.minute(),
                timestamp.second(),
                value.into_inner(),
            ))
        });
        writeln!(
            f,
            "var consumptionData = \"google.visualization.arrayToDataTable([['Date', 'kWh'], {rows}])\";",
        )
    }
}

impl ChartScript<'_> {
    #[instrument(skip_all, fields(path = %path.display(), n_points = self.0.len()))]
    pub fn write_to(&self, path: &Path) -> Result {
        info!("writing the chart…");
        fs::write(path, self.to_string())
            .with_context(|| format!("failed to write `{}`", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn chart_script_ok() {
        let series = [
            (Local.with_ymd_and_hms(2024, 1, 10, 13, 0, 0).unwrap(), KilowattHours::from(1.2)),
            (Local.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap(), KilowattHours::from(30.0)),
        ];
        assert_eq!(
            ChartScript(&series).to_string(),
            "var consumptionData = \"google.visualization.arrayToDataTable([['Date', 'kWh'], \
             [new Date(2024, 0, 10, 13, 0, 0), 1.2], [new Date(2024, 11, 31, 23, 0, 0), 30]])\";\n",
        );
    }

    #[test]
    fn empty_chart_script_ok() {
        assert_eq!(
            ChartScript(&[]).to_string(),
            "var consumptionData = \"google.visualization.arrayToDataTable([['Date', 'kWh'], ])\";\n",
        );
    }
}
