//! SMTP adapter for the [`MailTransport`] port.
//!
//! Escalation notices go out as one message addressed to every recipient,
//! with a plain-text and HTML alternative and the complaint files attached.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::domain::OutboundMail;
use crate::domain::ports::{MailTransport, MailTransportError};

/// Connection details for the SMTP relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender mailbox, e.g. `Grievance Portal <noreply@example.edu>`.
    pub from: String,
}

/// STARTTLS relay transport built on lettre.
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    /// Build a transport for `settings`. No connection is opened until the
    /// first send.
    ///
    /// # Errors
    /// Fails when the sender address does not parse or the relay host is
    /// rejected by the TLS setup.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailTransportError> {
        let from = parse_mailbox(&settings.from)?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| MailTransportError::compose(err.to_string()))?
            .port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailTransportError> {
        let message = build_message(&self.from, mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| MailTransportError::delivery(err.to_string()))?;
        info!(
            recipients = mail.recipients.len(),
            attachments = mail.attachments.len(),
            "escalation mail accepted by relay"
        );
        Ok(())
    }
}

/// Transport used when no SMTP host is configured. Every send fails, so
/// escalations still persist and report `delivered: false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailTransport;

#[async_trait]
impl MailTransport for DisabledMailTransport {
    async fn send(&self, _mail: &OutboundMail) -> Result<(), MailTransportError> {
        Err(MailTransportError::disabled())
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailTransportError> {
    raw.parse::<Mailbox>()
        .map_err(|err| MailTransportError::invalid_address(raw, err.to_string()))
}

/// Assemble the MIME message for `mail`.
pub(crate) fn build_message(from: &Mailbox, mail: &OutboundMail) -> Result<Message, MailTransportError> {
    if mail.recipients.is_empty() {
        return Err(MailTransportError::compose("no recipients"));
    }
    let mut builder = Message::builder().from(from.clone()).subject(mail.subject.as_str());
    for recipient in &mail.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let alternative =
        MultiPart::alternative_plain_html(mail.body_text.clone(), mail.body_html.clone());
    let body = if mail.attachments.is_empty() {
        alternative
    } else {
        let octet_stream = ContentType::parse("application/octet-stream")
            .map_err(|err| MailTransportError::compose(err.to_string()))?;
        mail.attachments
            .iter()
            .fold(MultiPart::mixed().multipart(alternative), |parts, file| {
                parts.singlepart(
                    Attachment::new(file.filename.clone())
                        .body(file.content.clone(), octet_stream.clone()),
                )
            })
    };

    builder
        .multipart(body)
        .map_err(|err| MailTransportError::compose(err.to_string()))
}
