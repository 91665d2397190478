use std::path::PathBuf;

use bon::Builder;
use chrono::Local;
use clap::Parser;

use crate::{
    cli::{db::DbArgs, export::ChartArgs},
    core::reconciler::Reconciler,
    db::Db,
    device::FrameReader,
    frame::Frame,
    prelude::*,
};

#[derive(Parser)]
pub struct LogArgs {
    /// Serial device the meter is attached to, `-` reads the standard input.
    #[clap(long, env = "DEVICE", default_value = "/dev/ttyUSB0")]
    device: PathBuf,

    /// Number of lines to read before exiting.
    #[clap(long, env = "N_FRAMES", default_value = "5")]
    n_frames: usize,

    /// Number of sensors whose history is stored, starting from sensor 0.
    #[clap(long, env = "N_SENSORS", default_value = "1")]
    n_sensors: u32,

    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    chart: ChartArgs,
}

impl LogArgs {
    pub async fn run(self) -> Result {
        let db = self.db.connect().await?;
        let lines = FrameReader::open(&self.device)?.take(self.n_frames);
        let tally = Logger::builder()
            .db(&db)
            .reconciler(Reconciler::new(self.n_sensors))
            .build()
            .run(lines)
            .await?;
        info!(
            tally.n_instantaneous,
            tally.n_historical,
            tally.n_malformed,
            tally.n_upserted,
            "finished reading"
        );
        self.chart.export(&db).await
    }
}

#[derive(Builder)]
struct Logger<'a> {
    db: &'a Db,
    reconciler: Reconciler,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Tally {
    n_instantaneous: usize,
    n_historical: usize,
    n_malformed: usize,
    n_upserted: usize,
}

impl Logger<'_> {
    /// Process the lines one by one: a frame is stored before the next line is read.
    #[instrument(skip_all)]
    async fn run(&self, lines: impl IntoIterator<Item = Result<String>>) -> Result<Tally> {
        let mut tally = Tally::default();
        for line in lines {
            let line = line?;
            let today = Local::now().date_naive();
            match Frame::parse(&line, today) {
                Ok(Frame::Instantaneous(reading)) => {
                    tally.n_instantaneous += 1;
                    info!(
                        sensor = reading.sensor,
                        reported_at = %reading.reported_at,
                        power = ?reading.total_power(),
                        temperature = ?reading.temperature,
                        source = reading.source.as_deref(),
                        "instantaneous reading"
                    );
                }
                Ok(Frame::Historical(history)) => {
                    tally.n_historical += 1;
                    debug!(
                        reported_at = %history.reported_at,
                        history.retention_days,
                        units = %history.units,
                        n_blocks = history.blocks.len(),
                        "history dump"
                    );
                    let reconciliation = self.reconciler.reconcile(&history, today);
                    reconciliation.persist(&self.db.consumption()).await?;
                    tally.n_upserted += reconciliation.hourly.len();
                }
                Err(error) => {
                    tally.n_malformed += 1;
                    warn!("skipping the malformed frame: {error:#}");
                }
            }
        }
        Ok(tally)
    }
}
