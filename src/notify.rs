use lettre::message::Mailbox;

use crate::prelude::*;

/// Delivers the final message to a single recipient.
pub trait Notifier {
    fn send(&self, recipient: &Mailbox, subject: &str, body: &str) -> Result<(), DispatchError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to notify `{recipient}`: {reason}")]
pub struct DispatchError {
    pub recipient: String,
    pub reason: String,
}

impl DispatchError {
    pub fn new(recipient: &Mailbox, error: &Error) -> Self {
        Self { recipient: recipient.to_string(), reason: format!("{error:#}") }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub n_delivered: usize,
    pub n_failed: usize,
}

/// Send the message to every recipient, one failure does not prevent the others.
#[instrument(skip_all, fields(n_recipients = recipients.len()))]
pub fn dispatch<N: Notifier>(
    notifier: &N,
    recipients: &[Mailbox],
    subject: &str,
    body: &str,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    for recipient in recipients {
        match notifier.send(recipient, subject, body) {
            Ok(()) => {
                info!(%recipient, "sent");
                summary.n_delivered += 1;
            }
            Err(error) => {
                error!("{error}");
                summary.n_failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
pub mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every message and fails on the listed recipients.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub failing: Vec<String>,
        pub sent: RefCell<Vec<(String, String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, recipient: &Mailbox, subject: &str, body: &str) -> Result<(), DispatchError> {
            self.sent.borrow_mut().push((recipient.to_string(), subject.to_owned(), body.to_owned()));
            if self.failing.contains(&recipient.email.to_string()) {
                return Err(DispatchError::new(recipient, &anyhow!("authentication failed")));
            }
            Ok(())
        }
    }

    pub fn recipients() -> Result<Vec<Mailbox>> {
        Ok(vec!["alice@example.com".parse()?, "Bob <bob@example.com>".parse()?, "carol@example.com".parse()?])
    }

    #[test]
    fn dispatch_ok() -> Result {
        let notifier = RecordingNotifier::default();
        let summary = dispatch(&notifier, &recipients()?, "Energy", "<html></html>");
        assert_eq!(summary, DispatchSummary { n_delivered: 3, n_failed: 0 });
        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|(_, subject, body)| subject == "Energy" && body == "<html></html>"));
        Ok(())
    }

    #[test]
    fn dispatch_continues_after_failure() -> Result {
        let notifier = RecordingNotifier {
            failing: vec!["alice@example.com".to_owned()],
            ..RecordingNotifier::default()
        };
        let summary = dispatch(&notifier, &recipients()?, "Energy", "body");
        assert_eq!(summary, DispatchSummary { n_delivered: 2, n_failed: 1 });
        assert_eq!(notifier.sent.borrow().len(), 3);
        Ok(())
    }

    #[test]
    fn dispatch_error_display_ok() -> Result {
        let error = DispatchError::new(&"alice@example.com".parse()?, &anyhow!("authentication failed"));
        assert_eq!(error.to_string(), "failed to notify `alice@example.com`: authentication failed");
        Ok(())
    }
}
