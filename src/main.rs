#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod config;
mod fmt;
mod logging;
mod metric;
mod notify;
mod pipeline;
mod prelude;
mod quantity;
mod reading;
mod render;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    api::{smtp::Mailer, ted},
    cli::Args,
    config::Config,
    pipeline::{Outcome, Pipeline},
    prelude::*,
    tables::build_circuits_table,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let config = Config::read_from(&args.config)?;
    let _log_guard = logging::init(&config.log)?;
    info!(version = crate_version!(), "starting…");

    let number_format = config.locale.number_format()?;
    let client = ted::Client::new();
    let outcome = Pipeline::builder()
        .client(&client)
        .device(&config.device)
        .number_format(number_format)
        .report_path(&config.report.path)
        .build()
        .run();
    if let Outcome::Report { circuits, .. } = &outcome {
        println!("{}", build_circuits_table(circuits, number_format));
    }

    let summary = notify::dispatch(
        &Mailer::new(&config.mail),
        &config.recipients.to,
        &config.recipients.subject,
        &outcome.body(),
    );
    info!(summary.n_delivered, summary.n_failed, "done!");
    Ok(())
}
