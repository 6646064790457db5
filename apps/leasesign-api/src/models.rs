//! Data models for the lease signing API.
//!
//! The session-by-token GET body and the submission POST body are shared
//! with the engine crate (`SignSession` / `SubmitPayload`), so the wire
//! contract lives in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use leasesign_core::SignerRole;

/// Signing session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Completed,
    Expired,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Signing session stored in database
#[derive(Debug, Clone, FromRow)]
pub struct DbSignSession {
    pub token: String,
    pub lease_id: String,
    pub role: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub lease_html: String,
    pub document_hash: String,
    pub signed_html: Option<String>,
    /// Identity asserted at submission; null until the session completes.
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request to create a signing session (sender side)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub lease_id: String,
    pub role: SignerRole,
    pub recipient_name: String,
    pub recipient_email: String,
    pub lease_html: String,
    #[serde(default)]
    pub expires_in_hours: Option<i64>,
}

/// Response for session creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub token: String,
    pub document_hash: String,
    pub field_count: usize,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response for a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: Option<String>,
}
