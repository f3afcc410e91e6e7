use lettre::{
    Message,
    SmtpTransport,
    Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    config::MailConfig,
    notify::{DispatchError, Notifier},
    prelude::*,
};

/// STARTTLS mail account.
///
/// Every message opens its own connection, so a broken session never leaks into the next recipient.
pub struct Mailer {
    server: String,
    port: u16,
    credentials: Credentials,
    from: Mailbox,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), config.password.clone()),
            from: config.from.clone(),
        }
    }

    fn build_message(&self, recipient: &Mailbox, subject: &str, body: &str) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_owned())
            .context("failed to build the message")
    }

    fn try_send(&self, recipient: &Mailbox, subject: &str, body: &str) -> Result {
        let message = self.build_message(recipient, subject, body)?;
        let transport = SmtpTransport::starttls_relay(&self.server)
            .with_context(|| format!("failed to set up the relay `{}`", self.server))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();
        transport.send(&message).context("failed to send the message")?;
        Ok(())
    }
}

impl Notifier for Mailer {
    #[instrument(skip_all, fields(recipient = %recipient))]
    fn send(&self, recipient: &Mailbox, subject: &str, body: &str) -> Result<(), DispatchError> {
        info!("sending…");
        self.try_send(recipient, subject, body)
            .map_err(|error| DispatchError::new(recipient, &error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Result<Mailer> {
        // language=toml
        let config: MailConfig = toml::from_str(
            r#"
                username = "reporter@example.com"
                password = "secret"
                from = "TED Reporter <reporter@example.com>"
            "#,
        )?;
        Ok(Mailer::new(&config))
    }

    #[test]
    fn build_message_ok() -> Result {
        let message = mailer()?.build_message(
            &"alice@example.com".parse()?,
            "Daily energy report",
            "<html></html>",
        )?;
        let formatted = String::from_utf8(message.formatted())?;
        assert!(formatted.contains("<reporter@example.com>"));
        assert!(formatted.contains("To: alice@example.com"));
        assert!(formatted.contains("Subject: Daily energy report"));
        assert!(formatted.contains("Content-Type: text/html; charset=utf-8"));
        Ok(())
    }

    #[test]
    fn send_to_unreachable_server_fails() -> Result {
        let mut mailer = mailer()?;
        mailer.server = "localhost".to_owned();
        mailer.port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
            listener.local_addr()?.port()
        };
        let error = mailer.send(&"alice@example.com".parse()?, "Subject", "body").unwrap_err();
        assert_eq!(error.recipient, "alice@example.com");
        Ok(())
    }
}
