//! Relative history tags such as `h003` or `d002`.

use chrono::{
    DateTime,
    Days,
    DurationRound,
    Local,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    TimeDelta,
    TimeZone,
};

use crate::prelude::*;

const NOON: NaiveTime = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

/// History tag classified by its leading precision character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tag<'a> {
    /// `hNNN`: `NNN` hours before the reported hour.
    Hourly(u32),

    /// `dNNN`: `NNN` days before today.
    Daily(u32),

    /// Any other precision, for example the monthly `mNNN`.
    Unhandled(&'a str),
}

/// Absolute timestamp of a resolved tag, by precision class.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Hour(DateTime<Local>),
    Day(DateTime<Local>),
}

impl<'a> Tag<'a> {
    /// Classify the tag name.
    ///
    /// The offset is taken from the last three characters and must consist of ASCII digits.
    /// Unknown precisions are not an error: the offset is not checked for them at all.
    pub fn classify(name: &'a str) -> Result<Self> {
        match name.chars().next().context("the tag is empty")? {
            'h' => Ok(Self::Hourly(parse_offset(name)?)),
            'd' => Ok(Self::Daily(parse_offset(name)?)),
            _ => Ok(Self::Unhandled(name)),
        }
    }

    /// Resolve the tag against the anchor, `None` for unhandled tags.
    pub fn resolve(self, anchor: Anchor) -> Result<Option<Resolved>> {
        match self {
            Self::Hourly(offset) => Ok(Some(Resolved::Hour(anchor.hours_before(offset)?))),
            Self::Daily(offset) => Ok(Some(Resolved::Day(anchor.days_before(offset)?))),
            Self::Unhandled(_) => Ok(None),
        }
    }
}

fn parse_offset(name: &str) -> Result<u32> {
    let digits = name
        .get(name.len().saturating_sub(3)..)
        .filter(|digits| digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()))
        .with_context(|| format!("`{name}` does not end with a three-digit offset"))?;
    Ok(digits.parse()?)
}

/// Reference points that relative offsets are subtracted from.
///
/// Hourly tags are anchored on the hour reported by the meter, whereas daily tags are anchored
/// on noon of the local day at the moment of resolution, regardless of the reported date.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Anchor {
    reported_at: NaiveDateTime,
    today: NaiveDate,
}

impl Anchor {
    pub const fn new(reported_at: NaiveDateTime, today: NaiveDate) -> Self {
        Self { reported_at, today }
    }

    /// The reported time with minutes and seconds discarded.
    pub fn reported_hour(self) -> Result<DateTime<Local>> {
        let hour = self.reported_at.duration_trunc(TimeDelta::hours(1))?;
        to_local(hour)
    }

    pub fn noon(self) -> Result<DateTime<Local>> {
        to_local(self.today.and_time(NOON))
    }

    pub fn hours_before(self, offset: u32) -> Result<DateTime<Local>> {
        self.reported_hour()?
            .checked_sub_signed(TimeDelta::hours(offset.into()))
            .with_context(|| {
                format!("{offset} hours before {:?} is out of range", self.reported_at)
            })
    }

    /// Calendar days: the result stays at noon even across daylight saving changes.
    pub fn days_before(self, offset: u32) -> Result<DateTime<Local>> {
        self.noon()?
            .checked_sub_days(Days::new(offset.into()))
            .with_context(|| format!("{offset} days before {} is out of range", self.today))
    }
}

fn to_local(timestamp: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&timestamp)
        .earliest()
        .with_context(|| format!("`{timestamp}` does not exist in the local time zone"))
}
