#![allow(clippy::doc_markdown)]
#![doc = include_str!("../../README.md")]

mod chart;
mod cli;
mod core;
mod db;
mod device;
mod frame;
mod prelude;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Log(args) => (*args).run().await?,
        Command::Export(args) => args.run().await?,
        Command::Durations(args) => args.run().await?,
    }

    info!("done!");
    Ok(())
}
