//! CurrentCost XML frames.
//!
//! Every line the meter emits is a `<msg>` document, either a real-time reading:
//!
//! ```xml
//! <msg><time>13:02:39</time><tmpr>18.7</tmpr><sensor>1</sensor><ch1><watts>00345</watts></ch1></msg>
//! ```
//!
//! or a history dump with relative `hNNN`/`dNNN`/`mNNN` tags:
//!
//! ```xml
//! <msg><time>13:10:50</time><hist><dsw>00032</dsw><units>kwhr</units><data><sensor>0</sensor><h024>001.1</h024></data></hist></msg>
//! ```

use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use currentcost_quantities::power::Kilowatts;
use roxmltree::{Document, Node};

use crate::prelude::*;

#[derive(Debug)]
pub enum Frame {
    Instantaneous(Instantaneous),
    Historical(Historical),
}

impl Frame {
    /// Parse a raw line.
    ///
    /// The meter reports only the wall-clock time, so the caller supplies the local date.
    pub fn parse(line: &str, today: NaiveDate) -> Result<Self> {
        let start = line.find('<').context("the line contains no XML marker")?;
        let document =
            Document::parse(&line[start..]).context("the line is not a well-formed document")?;
        let message = document.root_element();
        ensure!(
            message.has_tag_name("msg"),
            "unexpected root element `{}`",
            message.tag_name().name(),
        );
        let time = text(message, "time")?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .with_context(|| format!("invalid time `{time}`"))?;
        let reported_at = today.and_time(time);
        match child(message, "hist") {
            Some(history) => Ok(Self::Historical(Historical::from_node(history, reported_at)?)),
            None => Ok(Self::Instantaneous(Instantaneous::from_node(message, reported_at)?)),
        }
    }
}

/// Real-time power reading.
#[must_use]
#[derive(Debug, Builder)]
pub struct Instantaneous {
    pub reported_at: NaiveDateTime,
    pub sensor: u32,

    /// Readings of `ch1`, `ch2`, … in document order.
    pub channels: Vec<Kilowatts>,

    /// Display temperature in degrees Celsius.
    pub temperature: Option<f64>,

    /// Firmware identifier, for example `CC128-v0.11`.
    pub source: Option<String>,
}

impl Instantaneous {
    fn from_node(message: Node, reported_at: NaiveDateTime) -> Result<Self> {
        let channels = message
            .children()
            .filter(|node| {
                node.tag_name()
                    .name()
                    .strip_prefix("ch")
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
            .map(|channel| {
                let watts = text(channel, "watts")?;
                let watts: f64 =
                    watts.parse().with_context(|| format!("invalid watts `{watts}`"))?;
                Ok(Kilowatts::from_watts(watts))
            })
            .collect::<Result<Vec<_>>>()?;
        ensure!(!channels.is_empty(), "the frame contains no channel readings");
        let temperature = child(message, "tmpr")
            .and_then(|node| node.text())
            .map(|tmpr| {
                tmpr.trim().parse::<f64>().with_context(|| format!("invalid temperature `{tmpr}`"))
            })
            .transpose()?;
        Ok(Self::builder()
            .reported_at(reported_at)
            .sensor(parse_sensor(message)?)
            .channels(channels)
            .maybe_temperature(temperature)
            .maybe_source(child(message, "src").and_then(|node| node.text()).map(str::to_owned))
            .build())
    }

    pub fn total_power(&self) -> Kilowatts {
        self.channels.iter().copied().sum()
    }
}

/// History dump: consumption per sensor, keyed by relative tags.
#[must_use]
#[derive(Debug, Builder)]
pub struct Historical {
    pub reported_at: NaiveDateTime,

    /// Days since the meter was last wiped (`dsw`).
    pub retention_days: u32,

    /// Unit label, normally `kwhr`.
    #[builder(into)]
    pub units: String,

    #[builder(default)]
    pub blocks: Vec<DataBlock>,
}

impl Historical {
    fn from_node(history: Node, reported_at: NaiveDateTime) -> Result<Self> {
        let retention_days = text(history, "dsw")?;
        let retention_days = retention_days
            .parse::<u32>()
            .with_context(|| format!("invalid `dsw`: `{retention_days}`"))?;
        let blocks = history
            .children()
            .filter(|node| node.has_tag_name("data"))
            .map(DataBlock::from_node)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::builder()
            .reported_at(reported_at)
            .retention_days(retention_days)
            .units(text(history, "units")?)
            .blocks(blocks)
            .build())
    }
}

/// One `<data>` element of a history dump.
#[must_use]
#[derive(Debug, Builder)]
pub struct DataBlock {
    pub sensor: u32,

    /// Raw `(tag, value)` fields in document order, including the `sensor` field itself.
    #[builder(default)]
    pub entries: Vec<(String, String)>,
}

impl DataBlock {
    fn from_node(data: Node) -> Result<Self> {
        let entries = data
            .children()
            .filter(Node::is_element)
            .map(|node| {
                let value = node.text().unwrap_or_default().trim();
                (node.tag_name().name().to_owned(), value.to_owned())
            })
            .collect();
        Ok(Self { sensor: parse_sensor(data)?, entries })
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

fn text<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    child(node, name)
        .and_then(|child| child.text())
        .map(str::trim)
        .with_context(|| format!("missing `<{name}>`"))
}

fn parse_sensor(node: Node) -> Result<u32> {
    let sensor = text(node, "sensor")?;
    sensor.parse().with_context(|| format!("invalid sensor `{sensor}`"))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const TODAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    #[test]
    fn instantaneous_ok() -> Result {
        // language=xml
        let line = "<msg><src>CC128-v0.11</src><dsb>00089</dsb><time>13:02:39</time><tmpr>18.7</tmpr><sensor>1</sensor><id>01234</id><type>1</type><ch1><watts>00345</watts></ch1><ch2><watts>02151</watts></ch2><ch3><watts>00000</watts></ch3></msg>\r";
        let Frame::Instantaneous(reading) = Frame::parse(line, TODAY)? else {
            bail!("expected an instantaneous frame");
        };
        assert_eq!(reading.reported_at, TODAY.and_hms_opt(13, 2, 39).unwrap());
        assert_eq!(reading.sensor, 1);
        assert_eq!(reading.channels.len(), 3);
        assert_abs_diff_eq!(reading.total_power().into_inner(), 2.496, epsilon = 1e-9);
        assert_eq!(reading.temperature, Some(18.7));
        assert_eq!(reading.source.as_deref(), Some("CC128-v0.11"));
        Ok(())
    }

    #[test]
    fn historical_ok() -> Result {
        // language=xml
        let line = "<msg><src>CC128-v0.11</src><dsb>00089</dsb><time>13:10:50</time><hist><dsw>00032</dsw><type>1</type><units>kwhr</units><data><sensor>0</sensor><h024>001.1</h024><h022>000.9</h022><d001>030.0</d001></data><data><sensor>1</sensor><h024>000.0</h024></data></hist></msg>";
        let Frame::Historical(history) = Frame::parse(line, TODAY)? else {
            bail!("expected a historical frame");
        };
        assert_eq!(history.reported_at, TODAY.and_hms_opt(13, 10, 50).unwrap());
        assert_eq!(history.retention_days, 32);
        assert_eq!(history.units, "kwhr");
        assert_eq!(history.blocks.len(), 2);
        assert_eq!(history.blocks[0].sensor, 0);
        assert_eq!(
            history.blocks[0].entries,
            [
                ("sensor".to_owned(), "0".to_owned()),
                ("h024".to_owned(), "001.1".to_owned()),
                ("h022".to_owned(), "000.9".to_owned()),
                ("d001".to_owned(), "030.0".to_owned()),
            ],
        );
        assert_eq!(history.blocks[1].sensor, 1);
        Ok(())
    }

    #[test]
    fn leading_noise_is_ignored() -> Result {
        let line = "\u{FFFD}\u{FFFD}<msg><time>00:00:01</time><sensor>0</sensor><ch1><watts>00010</watts></ch1></msg>";
        assert!(matches!(Frame::parse(line, TODAY)?, Frame::Instantaneous(_)));
        Ok(())
    }

    #[test]
    fn missing_marker_err() {
        assert!(Frame::parse("garbage", TODAY).is_err());
        assert!(Frame::parse("", TODAY).is_err());
    }

    #[test]
    fn truncated_document_err() {
        assert!(Frame::parse("<msg><time>13:10:50</time><hist>", TODAY).is_err());
    }

    #[test]
    fn unexpected_root_err() {
        assert!(Frame::parse("<foo><time>13:10:50</time></foo>", TODAY).is_err());
    }

    #[test]
    fn invalid_time_err() {
        let line = "<msg><time>25:61:00</time><sensor>0</sensor><ch1><watts>1</watts></ch1></msg>";
        assert!(Frame::parse(line, TODAY).is_err());
    }

    #[test]
    fn no_channels_err() {
        assert!(Frame::parse("<msg><time>13:10:50</time><sensor>0</sensor></msg>", TODAY).is_err());
    }
}
