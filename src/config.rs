use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use lettre::message::Mailbox;
use serde::Deserialize;

use crate::{fmt::NumberFormat, metric::DisplayNames, prelude::*};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub device: DeviceConfig,
    pub mail: MailConfig,
    pub recipients: RecipientsConfig,

    #[serde(default)]
    pub locale: LocaleConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    #[instrument(name = "Reading the configuration…")]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid configuration in `{}`", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result {
        ensure!(!self.device.host.trim().is_empty(), "the device host is empty");
        ensure!(!self.recipients.to.is_empty(), "there are no recipients");
        ensure!(self.log.max_files != 0, "at least one log file must be kept");
        self.locale.number_format()?;
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Device host name, optionally with a port.
    pub host: String,

    #[serde(default)]
    pub names: DisplayNames,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    pub username: String,
    pub password: String,
    pub from: Mailbox,

    #[serde(default = "MailConfig::default_server")]
    pub server: String,

    #[serde(default = "MailConfig::default_port")]
    pub port: u16,
}

impl MailConfig {
    fn default_server() -> String {
        "smtp.gmail.com".to_owned()
    }

    const fn default_port() -> u16 {
        587
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipientsConfig {
    pub to: Vec<Mailbox>,
    pub subject: String,
}

/// Locale names per platform, keyed like [`std::env::consts::OS`].
#[derive(Default, Deserialize)]
#[serde(transparent)]
pub struct LocaleConfig(BTreeMap<String, String>);

impl LocaleConfig {
    pub fn number_format(&self) -> Result<NumberFormat> {
        self.number_format_on(std::env::consts::OS)
    }

    fn number_format_on(&self, os: &str) -> Result<NumberFormat> {
        self.0.get(os).map_or(Ok(NumberFormat::C), |locale| NumberFormat::from_locale(locale))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// The most recently rendered report, overwritten on every successful run.
    #[serde(default = "ReportConfig::default_path")]
    pub path: PathBuf,
}

impl ReportConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("ted.html")
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { path: Self::default_path() }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_directory")]
    pub directory: PathBuf,

    #[serde(default = "LogConfig::default_file_name_prefix")]
    pub file_name_prefix: String,

    #[serde(default = "LogConfig::default_max_files")]
    pub max_files: usize,
}

impl LogConfig {
    fn default_directory() -> PathBuf {
        PathBuf::from("logs")
    }

    fn default_file_name_prefix() -> String {
        env!("CARGO_PKG_NAME").to_owned()
    }

    const fn default_max_files() -> usize {
        5
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: Self::default_directory(),
            file_name_prefix: Self::default_file_name_prefix(),
            max_files: Self::default_max_files(),
        }
    }
}
