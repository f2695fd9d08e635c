//! Error types with stable codes and fix suggestions
//!
//! Code ranges:
//! - EVT-000-009: Submission errors
//! - EVT-010-019: Lookup errors
//! - EVT-020-029: Collaborator errors (mail, AI)
//! - EVT-030-039: Configuration errors
//! - EVT-040-049: Export errors
//! - EVT-090-099: IO errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// External services the registry calls out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Mail,
    Assist,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collaborator::Mail => write!(f, "mail"),
            Collaborator::Assist => write!(f, "assist"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    // ═══════════════════════════════════════════
    // SUBMISSION ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[EVT-001] Malformed submission at '{path}': {reason}")]
    MalformedSubmission { path: String, reason: String },

    // ═══════════════════════════════════════════
    // LOOKUP ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[EVT-010] Protocol '{protocol}' not found")]
    NotFound { protocol: String },

    // ═══════════════════════════════════════════
    // COLLABORATOR ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[EVT-020] {collaborator} collaborator failed: {message}")]
    Collaborator {
        collaborator: Collaborator,
        message: String,
    },

    #[error("[EVT-021] AI assist is not configured")]
    AssistNotConfigured,

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[EVT-030] Invalid configuration: {reason}")]
    Config { reason: String },

    // ═══════════════════════════════════════════
    // EXPORT ERRORS (040-049)
    // ═══════════════════════════════════════════
    #[error("[EVT-040] Spreadsheet export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    // ═══════════════════════════════════════════
    // IO ERRORS (090-099)
    // ═══════════════════════════════════════════
    #[error("[EVT-090] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSubmission {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn collaborator(collaborator: Collaborator, err: impl std::fmt::Display) -> Self {
        Self::Collaborator {
            collaborator,
            message: err.to_string(),
        }
    }

    /// Machine-readable kind, stable across releases
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedSubmission { .. } => "malformed_submission",
            Self::NotFound { .. } => "not_found",
            Self::Collaborator { .. } => "collaborator_failure",
            Self::AssistNotConfigured => "assist_not_configured",
            Self::Config { .. } => "config_error",
            Self::Export(_) => "export_failure",
            Self::Io(_) => "io_error",
        }
    }

    /// Stable error code, e.g. "EVT-001"
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedSubmission { .. } => "EVT-001",
            Self::NotFound { .. } => "EVT-010",
            Self::Collaborator { .. } => "EVT-020",
            Self::AssistNotConfigured => "EVT-021",
            Self::Config { .. } => "EVT-030",
            Self::Export(_) => "EVT-040",
            Self::Io(_) => "EVT-090",
        }
    }

    /// True for failures the client caused and can fix
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedSubmission { .. } | Self::NotFound { .. })
    }
}

impl FixSuggestion for RegistryError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            Self::MalformedSubmission { .. } => {
                Some("Send every section (cabecalho, informacoesGerais, dataLocal, publico, financeiro) with cabecalho.protocolo set")
            }
            Self::NotFound { .. } => {
                Some("Check the protocol; records are kept in memory and are lost when the server restarts")
            }
            Self::Collaborator {
                collaborator: Collaborator::Mail,
                ..
            } => Some("Check EMAIL_USER / EMAIL_PASS and SMTP_HOST"),
            Self::Collaborator {
                collaborator: Collaborator::Assist,
                ..
            } => Some("Check GEMINI_API_KEY and GEMINI_MODEL"),
            Self::AssistNotConfigured => Some("Set GEMINI_API_KEY to enable AI suggestions"),
            Self::Config { .. } => Some("Check environment variables (PORT, HOST, ...)"),
            Self::Export(_) => None,
            Self::Io(_) => Some("Check the bind address and file permissions"),
        }
    }
}
