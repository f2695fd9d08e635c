//! Centralized constants for runtime configuration
//!
//! All timeout and default values in one place for easy tuning.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════
// Collaborator Timeouts
// ═══════════════════════════════════════════════════════════════

/// Timeout for AI text generation calls
pub const INFER_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for establishing HTTP connections
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for one SMTP delivery
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

// ═══════════════════════════════════════════════════════════════
// Defaults
// ═══════════════════════════════════════════════════════════════

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_VIEWS_DIR: &str = "views";

// ═══════════════════════════════════════════════════════════════
// AI Assist
// ═══════════════════════════════════════════════════════════════

/// Output cap for the objective + theme suggestion
pub const IDEAS_MAX_TOKENS: u32 = 512;

/// Output cap for a social media caption
pub const CAPTION_MAX_TOKENS: u32 = 300;

// ═══════════════════════════════════════════════════════════════
// Event Log
// ═══════════════════════════════════════════════════════════════

/// Events kept in memory; the oldest are dropped past this
pub const MAX_EVENTS: usize = 10_000;

// ═══════════════════════════════════════════════════════════════
// Export
// ═══════════════════════════════════════════════════════════════

pub const EXPORT_SHEET_NAME: &str = "Eventos";
pub const EXPORT_FILE_NAME: &str = "Relatorio_IBR.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest text Excel accepts in one cell, in characters
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;
