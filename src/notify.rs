use std::time::Duration;

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::{info, warn};

use crate::config::{Config, MailCredentials};
use crate::error::NotificationError;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Tells the operator about a change. Never fails the run.
pub trait Notifier {
    fn notify(&self, subject: &str, body: &str);
}

/// A ready-to-use SMTP relay plus the addresses to send from and to.
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|source| NotificationError::Address {
            address: address.to_string(),
            source,
        })
}

impl Mailer {
    pub fn new(
        credentials: &MailCredentials,
        server: &str,
        port: u16,
    ) -> Result<Self, NotificationError> {
        let transport = SmtpTransport::starttls_relay(server)?
            .port(port)
            .timeout(Some(SMTP_TIMEOUT))
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.secret.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: parse_mailbox(&credentials.sender)?,
            to: parse_mailbox(&credentials.recipient)?,
        })
    }

    /// Builds the mailer when every credential is configured.
    ///
    /// Incomplete credentials are not an error; a relay that cannot be set up
    /// is logged and treated as disabled.
    pub fn from_config(config: &Config) -> Option<Self> {
        let credentials = config.credentials.as_ref()?;
        match Self::new(credentials, &config.smtp_server, config.smtp_port) {
            Ok(mailer) => Some(mailer),
            Err(err) => {
                warn!("Email disabled, could not set up mailer: {err}");
                None
            }
        }
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message, NotificationError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?)
    }

    pub fn send(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        let message = self.build_message(subject, body)?;
        self.transport.send(&message)?;
        Ok(())
    }
}

pub struct EmailNotifier {
    mailer: Option<Mailer>,
}

impl EmailNotifier {
    pub fn new(mailer: Option<Mailer>) -> Self {
        Self { mailer }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, subject: &str, body: &str) {
        let Some(mailer) = &self.mailer else {
            info!("Email not enabled (missing SMTP_USER / SMTP_PASS / EMAIL_TO).");
            return;
        };
        match mailer.send(subject, body) {
            Ok(()) => info!("Email notification sent to {}", mailer.to),
            Err(err) => warn!("Failed to send email notification: {err}"),
        }
    }
}
