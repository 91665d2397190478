use chrono::{DateTime, Local, TimeDelta};
use currentcost_quantities::{energy::KilowattHours, power::Kilowatts};
use itertools::Itertools;

/// Consumption attributed to the span between two consecutive stored points.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DurationalReading {
    /// The previous stored point.
    pub start: DateTime<Local>,

    /// The point which carries the energy.
    pub end: DateTime<Local>,

    pub energy: KilowattHours,
}

impl DurationalReading {
    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }

    pub fn mean_power(self) -> Kilowatts {
        self.energy / self.duration()
    }
}

impl<T> Durations for T where T: ?Sized {}

pub trait Durations {
    /// Pair the consecutive points.
    ///
    /// Each point closes the interval opened by the previous one, so the very first point only
    /// marks the start.
    fn durations(self) -> impl Iterator<Item = DurationalReading>
    where
        Self: Iterator<Item = (DateTime<Local>, KilowattHours)> + Sized,
    {
        self.tuple_windows()
            .map(|((start, _), (end, energy))| DurationalReading { start, end, energy })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_durations() {
        let series = vec![
            (at(12), KilowattHours::from(9.0)),
            (at(13), KilowattHours::from(1.2)),
            (at(15), KilowattHours::from(3.0)),
        ];
        let readings: Vec<_> = series.into_iter().durations().collect();
        assert_eq!(
            readings,
            [
                DurationalReading { start: at(12), end: at(13), energy: KilowattHours::from(1.2) },
                DurationalReading { start: at(13), end: at(15), energy: KilowattHours::from(3.0) },
            ],
        );
        assert_eq!(readings[1].duration(), TimeDelta::hours(2));
        assert_abs_diff_eq!(readings[1].mean_power().into_inner(), 1.5);
    }

    #[test]
    fn test_single_point() {
        let series = vec![(at(12), KilowattHours::from(9.0))];
        assert_eq!(series.into_iter().durations().count(), 0);
    }
}
