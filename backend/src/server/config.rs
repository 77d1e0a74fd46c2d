//! Application settings loaded via OrthoConfig.
//!
//! Every field can be set through a `GRIEVANCE_` environment variable, a CLI
//! flag, or a configuration file.

use std::path::PathBuf;

use grievance::outbound::mail::SmtpSettings;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOADS_DIR: &str = "uploads";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_FROM: &str = "Grievance Portal <noreply@localhost>";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Runtime settings for the grievance server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GRIEVANCE")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Directory holding uploaded complaint files.
    pub uploads_dir: Option<PathBuf>,
    /// SMTP relay host. Escalation mail is disabled when unset.
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Sender mailbox for escalation notices.
    pub mail_from: Option<String>,
    /// Reject status changes outside `Pending -> Under Process -> Resolved`.
    #[ortho_config(default = false)]
    pub strict_transitions: bool,
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR))
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// SMTP relay settings, or `None` when no host is configured.
    pub fn smtp(&self) -> Option<SmtpSettings> {
        let host = self.smtp_host.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
        Some(SmtpSettings {
            host: host.to_owned(),
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from: self
                .mail_from
                .clone()
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_owned()),
        })
    }
}
