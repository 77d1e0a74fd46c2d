//! Escalation targets, outbound mail composition, and reported outcomes.

use serde::Serialize;

use super::attachment::ResolvedAttachment;
use super::ports::MailTransportError;
use super::{Complaint, ComplaintId, Error, Role, Urgency};

/// Roles notified when every authority is asked to intervene, in order.
pub const ESCALATION_CHAIN: [Role; 3] = [Role::Hod, Role::Principal, Role::SuperAdmin];

/// Who an escalation is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationTarget {
    /// A single role, with the label as the initiator typed it.
    Role { role: Role, label: String },
    /// The whole [`ESCALATION_CHAIN`].
    AllAuthorities,
}

impl EscalationTarget {
    /// Build a target from the request fields. `notify_all` wins over a
    /// supplied role.
    ///
    /// # Examples
    /// ```
    /// use grievance::domain::{EscalationTarget, Role};
    ///
    /// let target = EscalationTarget::from_request(Some("Principal"), false).expect("target");
    /// assert_eq!(target.recipient_roles(), vec![Role::Principal]);
    /// assert!(EscalationTarget::from_request(None, false).is_err());
    /// ```
    pub fn from_request(role: Option<&str>, notify_all: bool) -> Result<Self, Error> {
        if notify_all {
            return Ok(Self::AllAuthorities);
        }
        match role.map(str::trim).filter(|label| !label.is_empty()) {
            Some(label) => Ok(Self::Role {
                role: Role::parse(label),
                label: label.to_owned(),
            }),
            None => Err(Error::invalid_request(
                "either a target role or notifyAll is required",
            )),
        }
    }

    /// Roles whose members receive the notification.
    pub fn recipient_roles(&self) -> Vec<Role> {
        match self {
            Self::Role { role, .. } => vec![role.clone()],
            Self::AllAuthorities => ESCALATION_CHAIN.to_vec(),
        }
    }

    /// Value recorded in the complaint's `escalated_to` column.
    pub fn escalated_to(&self) -> String {
        self.recipient_roles()
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn subject(&self) -> String {
        match self {
            Self::Role { label, .. } => format!("Complaint Escalated to {label}"),
            Self::AllAuthorities => "Complaint Escalation - All Authorities Notified".to_owned(),
        }
    }
}

/// A directory entry able to receive escalation mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub role: Role,
}

/// File carried on an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

impl From<ResolvedAttachment> for MailAttachment {
    fn from(value: ResolvedAttachment) -> Self {
        Self {
            filename: value.token.into(),
            content: value.content,
        }
    }
}

/// One batched message to every resolved recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
    pub attachments: Vec<MailAttachment>,
}

impl OutboundMail {
    /// Compose the escalation notice. The body names the complaint and the
    /// initiator only; submitter fields are never included.
    pub fn escalation(
        complaint: &Complaint,
        target: &EscalationTarget,
        initiator: &str,
        recipients: Vec<String>,
        attachments: Vec<MailAttachment>,
    ) -> Self {
        let body_text = format!(
            "Complaint ID: {id}\nTitle: {title}\nDescription: {description}\nUrgency: {urgency}\nEscalated By: {initiator}\n",
            id = complaint.id,
            title = complaint.title,
            description = complaint.description,
            urgency = Urgency::High.as_str(),
        );
        let body_html = format!("<pre>{}</pre>", escape_html(&body_text));
        Self {
            recipients,
            subject: target.subject(),
            body_text,
            body_html,
            attachments,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Stable classification of a failed notification.
///
/// Transport details stay in the logs; callers only see the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryFailure {
    /// No mail transport is configured.
    MailDisabled,
    /// A sender or recipient address was rejected before sending.
    InvalidAddress,
    /// The message could not be assembled.
    ComposeFailed,
    /// The relay refused or dropped the message.
    DeliveryFailed,
}

impl DeliveryFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MailDisabled => "mail_disabled",
            Self::InvalidAddress => "invalid_address",
            Self::ComposeFailed => "compose_failed",
            Self::DeliveryFailed => "delivery_failed",
        }
    }
}

impl From<&MailTransportError> for DeliveryFailure {
    fn from(error: &MailTransportError) -> Self {
        match error {
            MailTransportError::Disabled => Self::MailDisabled,
            MailTransportError::InvalidAddress { .. } => Self::InvalidAddress,
            MailTransportError::Compose { .. } => Self::ComposeFailed,
            MailTransportError::Delivery { .. } => Self::DeliveryFailed,
        }
    }
}

/// Result of the delivery phase of an escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Delivered,
    Failed { kind: DeliveryFailure },
}

/// Report returned once the urgency change has been persisted.
///
/// A failed notification is still a successful escalation: the caller reads
/// [`EscalationOutcome::delivered`] to decide whether to follow up manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationOutcome {
    pub complaint_id: ComplaintId,
    pub urgency: Urgency,
    pub escalated_to: String,
    pub recipients: Vec<String>,
    pub attachments_sent: usize,
    pub attachments_dropped: usize,
    pub notification: NotificationOutcome,
}

impl EscalationOutcome {
    pub fn delivered(&self) -> bool {
        matches!(self.notification, NotificationOutcome::Delivered)
    }
}
