//! Builders wiring outbound adapters into the domain services.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use grievance::domain::ports::MailTransport;
use grievance::domain::{ComplaintService, EscalationService, NotificationPorts, TransitionPolicy};
use grievance::inbound::http::state::HttpState;
use grievance::outbound::files::CapStdFileStore;
use grievance::outbound::mail::{DisabledMailTransport, SmtpMailTransport};
use grievance::outbound::persistence::{
    DbPool, DieselAttachmentRepository, DieselComplaintRepository, DieselThreadRepository,
    DieselUserDirectory,
};

use super::AppSettings;

/// Errors raised while assembling adapters at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("failed to open uploads directory {path}: {source}")]
    Uploads {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn build_mailer(settings: &AppSettings) -> Arc<dyn MailTransport> {
    let Some(smtp) = settings.smtp() else {
        warn!("no SMTP host configured; escalation mail is disabled");
        return Arc::new(DisabledMailTransport);
    };
    match SmtpMailTransport::new(&smtp) {
        Ok(transport) => {
            info!(host = %smtp.host, port = smtp.port, "SMTP transport configured");
            Arc::new(transport)
        }
        Err(error) => {
            warn!(%error, "SMTP transport rejected; escalation mail is disabled");
            Arc::new(DisabledMailTransport)
        }
    }
}

/// Build the HTTP state from a live pool and settings.
///
/// # Errors
/// Fails when the uploads directory cannot be opened.
pub fn build_http_state(pool: &DbPool, settings: &AppSettings) -> Result<HttpState, StateBuildError> {
    let uploads = settings.uploads_dir();
    let files = CapStdFileStore::open(&uploads).map_err(|source| StateBuildError::Uploads {
        path: uploads.display().to_string(),
        source,
    })?;

    let complaints = Arc::new(DieselComplaintRepository::new(pool.clone()));
    let attachments = Arc::new(DieselAttachmentRepository::new(pool.clone()));
    let threads = Arc::new(DieselThreadRepository::new(pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let complaint_service = Arc::new(
        ComplaintService::new(
            Arc::clone(&complaints),
            Arc::clone(&attachments),
            threads,
            Arc::clone(&clock),
        )
        .with_policy(TransitionPolicy::from_strict(settings.strict_transitions)),
    );
    let escalation_service = Arc::new(EscalationService::new(
        complaints,
        attachments,
        NotificationPorts {
            directory: Arc::new(DieselUserDirectory::new(pool.clone())),
            files: Arc::new(files),
            mailer: build_mailer(settings),
        },
        clock,
    ));

    Ok(HttpState::new(
        complaint_service.clone(),
        complaint_service,
        escalation_service,
    ))
}
