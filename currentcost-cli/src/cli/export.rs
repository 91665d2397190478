use std::path::PathBuf;

use clap::Parser;

use crate::{chart::ChartScript, cli::db::DbArgs, db::Db, prelude::*};

#[derive(Parser)]
pub struct ChartArgs {
    #[clap(long = "chart-path", env = "CHART_PATH", default_value = "consumption.js")]
    path: PathBuf,
}

impl ChartArgs {
    /// Render the whole stored series into the chart script.
    pub async fn export(&self, db: &Db) -> Result {
        let series = db.consumption().select_all().await?;
        ChartScript(&series).write_to(&self.path)
    }
}

#[derive(Parser)]
pub struct ExportArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    chart: ChartArgs,
}

impl ExportArgs {
    pub async fn run(self) -> Result {
        let db = self.db.connect().await?;
        self.chart.export(&db).await
    }
}
