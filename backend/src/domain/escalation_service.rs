//! Escalation and notification engine.
//!
//! Escalation runs in two phases. Phase one validates the target, gathers
//! attachments, resolves recipients and persists `urgency = High`. Phase two
//! sends one batched message. A delivery failure is reported in the outcome
//! and never undoes phase one.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use super::complaint_service::complaint_not_found;
use super::port_errors::{map_attachment_error, map_complaint_error, map_directory_error};
use super::ports::{
    AttachmentRepository, ComplaintRepository, EscalateRequest, EscalationCommand, FileStore,
    MailTransport, UserDirectory,
};
use super::{
    AttachmentToken, ComplaintId, DeliveryFailure, Error, EscalationOutcome, EscalationTarget,
    MailAttachment, NotificationOutcome, OutboundMail, Recipient, ResolvedAttachment, Role,
    Urgency,
};

/// Process-scoped collaborators the engine reaches outside the database.
#[derive(Clone)]
pub struct NotificationPorts {
    pub directory: Arc<dyn UserDirectory>,
    pub files: Arc<dyn FileStore>,
    pub mailer: Arc<dyn MailTransport>,
}

/// Escalation service implementing [`EscalationCommand`].
#[derive(Clone)]
pub struct EscalationService<R, A> {
    complaints: Arc<R>,
    attachments: Arc<A>,
    ports: NotificationPorts,
    clock: Arc<dyn Clock>,
}

impl<R, A> EscalationService<R, A> {
    pub fn new(
        complaints: Arc<R>,
        attachments: Arc<A>,
        ports: NotificationPorts,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            complaints,
            attachments,
            ports,
            clock,
        }
    }
}

/// Attachments that made it into the bundle, and how many were dropped.
struct Bundle {
    attachments: Vec<MailAttachment>,
    dropped: usize,
}

impl<R, A> EscalationService<R, A>
where
    R: ComplaintRepository,
    A: AttachmentRepository,
{
    async fn bundle_attachments(&self, id: ComplaintId, tokens: Vec<AttachmentToken>) -> Bundle {
        let files = &self.ports.files;
        let resolved = join_all(tokens.into_iter().map(|token| async move {
            let outcome = files.resolve(&token).await;
            (token, outcome)
        }))
        .await;

        let mut bundle = Bundle {
            attachments: Vec::with_capacity(resolved.len()),
            dropped: 0,
        };
        for (token, outcome) in resolved {
            match outcome {
                Ok(Some(content)) => bundle
                    .attachments
                    .push(ResolvedAttachment { token, content }.into()),
                Ok(None) => {
                    debug!(complaint_id = %id, token = %token, "attachment missing from storage");
                    bundle.dropped += 1;
                }
                Err(error) => {
                    warn!(complaint_id = %id, token = %token, %error, "attachment unreadable");
                    bundle.dropped += 1;
                }
            }
        }
        bundle
    }
}

/// Addressable emails in directory order, blanks and duplicates removed.
fn distinct_addresses(recipients: Vec<Recipient>) -> Vec<String> {
    let mut addresses: Vec<String> = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        let email = recipient.email.trim();
        if !email.is_empty() && !addresses.iter().any(|known| known.eq_ignore_ascii_case(email)) {
            addresses.push(email.to_owned());
        }
    }
    addresses
}

fn no_authorities(roles: &[Role]) -> Error {
    let labels: Vec<&str> = roles.iter().map(Role::as_str).collect();
    Error::not_found("no authority users found").with_details(json!({ "roles": labels }))
}

#[async_trait]
impl<R, A> EscalationCommand for EscalationService<R, A>
where
    R: ComplaintRepository,
    A: AttachmentRepository,
{
    async fn escalate(&self, request: EscalateRequest) -> Result<EscalationOutcome, Error> {
        let EscalateRequest {
            actor,
            complaint_id: id,
            target_role,
            notify_all,
        } = request;
        actor.require_staff()?;
        let target = EscalationTarget::from_request(target_role.as_deref(), notify_all)?;

        let record = self
            .complaints
            .find_by_id(id)
            .await
            .map_err(map_complaint_error)?
            .ok_or_else(|| complaint_not_found(id))?;

        let tokens = self
            .attachments
            .list_for(id)
            .await
            .map_err(map_attachment_error)?;
        let bundle = self.bundle_attachments(id, tokens).await;

        let roles = target.recipient_roles();
        let recipients = self
            .ports
            .directory
            .find_by_roles(&roles)
            .await
            .map_err(map_directory_error)?;
        let addresses = distinct_addresses(recipients);
        if addresses.is_empty() {
            info!(complaint_id = %id, roles = %target.escalated_to(), "no escalation recipients");
            return Err(no_authorities(&roles));
        }

        // Persist before sending: the record of escalation must survive a
        // transport outage.
        let escalated_to = target.escalated_to();
        self.complaints
            .mark_escalated(id, &escalated_to, self.clock.utc())
            .await
            .map_err(map_complaint_error)?
            .ok_or_else(|| complaint_not_found(id))?;

        let attachments_sent = bundle.attachments.len();
        let mail = OutboundMail::escalation(
            &record.complaint,
            &target,
            actor.username(),
            addresses,
            bundle.attachments,
        );
        let notification = match self.ports.mailer.send(&mail).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(error) => {
                warn!(complaint_id = %id, %error, "escalation notification not delivered");
                NotificationOutcome::Failed {
                    kind: DeliveryFailure::from(&error),
                }
            }
        };

        let outcome = EscalationOutcome {
            complaint_id: id,
            urgency: Urgency::High,
            escalated_to,
            recipients: mail.recipients,
            attachments_sent,
            attachments_dropped: bundle.dropped,
            notification,
        };
        info!(
            complaint_id = %id,
            actor_id = %actor.id(),
            recipient_count = outcome.recipients.len(),
            attachment_count = outcome.attachments_sent,
            dropped_attachments = outcome.attachments_dropped,
            delivered = outcome.delivered(),
            "complaint escalated"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "escalation_service_tests.rs"]
mod tests;
