//! Configuration Module
//!
//! Everything is read once at startup from the environment (after `.env`
//! has been loaded by `main`). Collaborators whose credentials are absent
//! are disabled rather than failing startup:
//!
//! - mail needs both `EMAIL_USER` and `EMAIL_PASS`
//! - AI assist needs `GEMINI_API_KEY`
//!
//! Empty values count as unset.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::{RegistryError, Result};
use crate::util::constants::{
    DEFAULT_GEMINI_MODEL, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PUBLIC_DIR, DEFAULT_SMTP_HOST,
    DEFAULT_VIEWS_DIR,
};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// `None` disables notifications
    pub mail: Option<MailConfig>,
    /// `None` disables the AI endpoints
    pub assist: Option<AssistConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
    pub views_dir: PathBuf,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// SMTP credentials and the operator address notifications go to
#[derive(Clone, PartialEq)]
pub struct MailConfig {
    pub user: String,
    pub password: String,
    pub smtp_host: String,
    pub notify_to: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("password", &mask_api_key(&self.password, 0))
            .field("smtp_host", &self.smtp_host)
            .field("notify_to", &self.notify_to)
            .finish()
    }
}

#[derive(Clone, PartialEq)]
pub struct AssistConfig {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for AssistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistConfig")
            .field("api_key", &mask_api_key(&self.api_key, 6))
            .field("model", &self.model)
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Lets tests build configs without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| RegistryError::Config {
                reason: format!("PORT '{}' is not a valid port: {}", raw, e),
            })?,
            None => DEFAULT_PORT,
        };

        let host_raw = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| RegistryError::Config {
                reason: format!("HOST '{}' is not an IP address: {}", host_raw, e),
            })?;

        let server = ServerConfig {
            host,
            port,
            public_dir: PathBuf::from(var("PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.into())),
            views_dir: PathBuf::from(var("VIEWS_DIR").unwrap_or_else(|| DEFAULT_VIEWS_DIR.into())),
        };

        let mail = match (var("EMAIL_USER"), var("EMAIL_PASS")) {
            (Some(user), Some(password)) => Some(MailConfig {
                notify_to: var("NOTIFY_TO").unwrap_or_else(|| user.clone()),
                smtp_host: var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.into()),
                user,
                password,
            }),
            (Some(_), None) => {
                tracing::warn!("EMAIL_USER is set but EMAIL_PASS is not; notifications disabled");
                None
            }
            _ => None,
        };

        let assist = var("GEMINI_API_KEY").map(|api_key| AssistConfig {
            api_key,
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
        });

        Ok(Self {
            server,
            mail,
            assist,
        })
    }

    pub fn mail_enabled(&self) -> bool {
        self.mail.is_some()
    }

    pub fn assist_enabled(&self) -> bool {
        self.assist.is_some()
    }

    /// Human-readable summary with secrets masked
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("listen", self.server.addr().to_string()),
            ("public_dir", self.server.public_dir.display().to_string()),
            ("views_dir", self.server.views_dir.display().to_string()),
        ];

        match &self.mail {
            Some(mail) => {
                lines.push(("mail.user", mail.user.clone()));
                lines.push(("mail.password", mask_api_key(&mail.password, 0)));
                lines.push(("mail.smtp_host", mail.smtp_host.clone()));
                lines.push(("mail.notify_to", mail.notify_to.clone()));
            }
            None => lines.push(("mail", "disabled".to_string())),
        }

        match &self.assist {
            Some(assist) => {
                lines.push(("assist.api_key", mask_api_key(&assist.api_key, 6)));
                lines.push(("assist.model", assist.model.clone()));
            }
            None => lines.push(("assist", "disabled".to_string())),
        }

        lines
    }
}

/// Mask a secret for display
///
/// Shows first N chars + asterisks, e.g. "AIzaSy***"
pub fn mask_api_key(key: &str, visible_chars: usize) -> String {
    if key.is_empty() {
        return String::new();
    }

    let visible: String = key.chars().take(visible_chars).collect();
    format!("{}***", visible)
}
