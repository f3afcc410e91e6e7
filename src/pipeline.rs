use std::{
    any::Any,
    backtrace::BacktraceStatus,
    fs,
    panic::{AssertUnwindSafe, catch_unwind},
    path::Path,
};

use bon::Builder;
use maud::html;

use crate::{
    api::ted::Fetch,
    config::DeviceConfig,
    fmt::NumberFormat,
    prelude::*,
    reading::{self, Circuit},
    render::render_report,
};

/// Result of a single run, each variant maps onto exactly one message body.
#[must_use]
pub enum Outcome {
    /// The report has been rendered and saved.
    Report { circuits: Vec<Circuit>, html: String },

    /// The device could not be reached.
    Unreachable { host: String },

    /// Anything else went wrong.
    Failure { trace: Vec<String> },
}

impl Outcome {
    /// Capture the error chain, and the backtrace if one was captured.
    fn from_error(error: &Error) -> Self {
        let mut trace = vec![format!("the run has failed: {error}")];
        trace.extend(error.chain().skip(1).map(|cause| format!("caused by: {cause}")));
        let backtrace = error.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            trace.extend(backtrace.to_string().lines().map(str::to_owned));
        }
        Self::Failure { trace }
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic");
        Self::Failure { trace: vec![format!("the run has panicked: {message}")] }
    }

    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Self::Report { html, .. } => html.clone(),
            Self::Unreachable { host } => html! {
                html {
                    p { "Unable to connect to the TED device at " (host) "." }
                    p { "You may need to reboot it." }
                }
            }
            .into_string(),
            Self::Failure { trace } => html! {
                html {
                    @for line in trace {
                        (line) br;
                    }
                }
            }
            .into_string(),
        }
    }
}

/// Fetch, parse, render, and save the report, turning any failure into an [`Outcome`].
#[derive(Builder)]
pub struct Pipeline<'a, F> {
    client: &'a F,
    device: &'a DeviceConfig,
    number_format: NumberFormat,
    report_path: &'a Path,
}

impl<F: Fetch> Pipeline<'_, F> {
    #[instrument(skip_all, fields(host = %self.device.host))]
    pub fn run(&self) -> Outcome {
        let outcome = match catch_unwind(AssertUnwindSafe(|| self.try_run())) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(error)) => Outcome::from_error(&error),
            Err(payload) => Outcome::from_panic(payload.as_ref()),
        };
        if let Outcome::Failure { trace } = &outcome {
            for line in trace {
                error!("{line}");
            }
        }
        outcome
    }

    fn try_run(&self) -> Result<Outcome> {
        let raw = match self.client.fetch(&self.device.host) {
            Ok(raw) => raw,
            Err(error) => {
                error!("connectivity failure: {error}");
                return Ok(Outcome::Unreachable { host: error.host });
            }
        };

        let circuits = reading::parse(&raw, &self.device.names)?;
        info!(n_circuits = circuits.len(), "parsed");

        let html = render_report(&circuits, self.number_format);
        fs::write(self.report_path, &html).with_context(|| {
            format!("failed to write the report to `{}`", self.report_path.display())
        })?;
        info!(path = %self.report_path.display(), "saved the report");

        Ok(Outcome::Report { circuits, html })
    }
}
