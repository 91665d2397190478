use clap::Parser;

use crate::{cli::db::DbArgs, core::series::Durations, prelude::*, tables::build_durations_table};

#[derive(Parser)]
pub struct DurationsArgs {
    #[clap(flatten)]
    db: DbArgs,
}

impl DurationsArgs {
    pub async fn run(self) -> Result {
        let series = self.db.connect().await?.consumption().select_all().await?;
        let readings = series.into_iter().durations().collect::<Vec<_>>();
        info!(n_readings = readings.len(), "converted the series");
        println!("{}", build_durations_table(&readings));
        Ok(())
    }
}
