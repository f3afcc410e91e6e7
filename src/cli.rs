use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about)]
#[must_use]
pub struct Args {
    /// TOML configuration file with the device, mail account, and recipients.
    #[clap(long, env = "TED_REPORT_CONFIG")]
    pub config: PathBuf,
}
