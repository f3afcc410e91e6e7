use tracing::Subscriber;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::LogConfig, prelude::*};

/// Log to the console and to the rotating log file.
///
/// An unusable log directory does not stop the run: the logs then go to the console only,
/// and the file error is logged. The returned guard flushes the file writer on drop,
/// keep it alive until the very end.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (subscriber, guard, file_error) = build(config);
    subscriber.try_init().context("failed to initialize the logging")?;
    if let Some(error) = file_error {
        error!("logging to the console only: {error:#}");
    }
    Ok(guard)
}

fn build(
    config: &LogConfig,
) -> (impl Subscriber + Send + Sync + use<>, Option<WorkerGuard>, Option<Error>) {
    let (file_writer, guard, file_error) = match open_file(config) {
        Ok((file_writer, guard)) => (Some(file_writer), Some(guard), None),
        Err(error) => (None, None, Some(error)),
    };
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().without_time().compact())
        .with(file_writer.map(|file_writer| {
            tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer)
        }));
    (subscriber, guard, file_error)
}

fn open_file(config: &LogConfig) -> Result<(NonBlocking, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_name_prefix.clone())
        .filename_suffix("log")
        .max_log_files(config.max_files)
        .build(&config.directory)
        .with_context(|| format!("failed to open the log in `{}`", config.directory.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn log_config(directory: &std::path::Path) -> LogConfig {
        LogConfig { directory: directory.to_owned(), ..LogConfig::default() }
    }

    #[test]
    fn file_log_ok() -> Result {
        let directory = tempfile::tempdir()?;
        let (subscriber, guard, file_error) = build(&log_config(directory.path()));
        assert!(file_error.is_none());
        assert!(guard.is_some());

        tracing::subscriber::with_default(subscriber, || info!("written to the file"));
        drop(guard);

        let n_files = fs::read_dir(directory.path())?.count();
        assert_eq!(n_files, 1);
        Ok(())
    }

    #[test]
    fn unusable_directory_falls_back_to_console() -> Result {
        let not_a_directory = tempfile::NamedTempFile::new()?;
        let (subscriber, guard, file_error) = build(&log_config(not_a_directory.path()));
        assert!(guard.is_none());
        let Some(file_error) = file_error else {
            bail!("expected the log file to fail");
        };
        assert!(file_error.to_string().starts_with("failed to open the log in"));

        tracing::subscriber::with_default(subscriber, || error!("still logged"));
        Ok(())
    }
}
