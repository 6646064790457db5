//! HTTP handlers for the lease signing API

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use leasesign_core::{compositor, tokens, Focus, SignSession, SignerRole, SubmitPayload, TabKind};
use leasesign_stamp::encode;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Create a new signing session for a lease document
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    // A session with nothing to sign is a template bug; reject it here
    // rather than handing the signer an empty field list.
    let tabs = tokens::scan(&req.lease_html, req.role);
    if tabs.is_empty() {
        return Err(ApiError::InvalidRequest(format!(
            "lease markup contains no signable placeholder for role '{}'",
            req.role
        )));
    }
    // Every session must carry its role's signature token; otherwise the
    // document could complete with initials only and no signature.
    if !tabs.iter().any(|t| t.kind == TabKind::Signature) {
        return Err(ApiError::InvalidRequest(format!(
            "lease markup is missing the signature placeholder for role '{}'",
            req.role
        )));
    }

    let document_hash = hex::encode(Sha256::digest(req.lease_html.as_bytes()));
    let token = Uuid::new_v4().to_string();
    let now = Utc::now();
    let expires_at = req.expires_in_hours.map(|h| now + chrono::Duration::hours(h));

    sqlx::query(
        r#"
        INSERT INTO sign_sessions (token, lease_id, role, recipient_name, recipient_email, lease_html, document_hash, status, created_at, updated_at, expires_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?)
        "#,
    )
    .bind(&token)
    .bind(&req.lease_id)
    .bind(req.role.as_str())
    .bind(&req.recipient_name)
    .bind(&req.recipient_email)
    .bind(&req.lease_html)
    .bind(&document_hash)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .bind(expires_at.map(|e| e.to_rfc3339()))
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Created signing session {} for lease {} ({} fields, role {})",
        token,
        req.lease_id,
        tabs.len(),
        req.role
    );

    Ok(Json(CreateSessionResponse {
        token,
        document_hash,
        field_count: tabs.len(),
        status: SessionStatus::Pending,
        created_at: now,
        expires_at,
    }))
}

/// Get session by signing token: the signing UI's single fetch
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<SignSession>, ApiError> {
    let session = fetch_session(&state, &token).await?;
    let role = parse_role(&session.role)?;

    Ok(Json(SignSession {
        lease_id: session.lease_id,
        role,
        recipient_name: session.recipient_name,
        recipient_email: session.recipient_email,
        lease_html: session.lease_html,
    }))
}

/// Submit completed signature fields for a session
pub async fn submit_session(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(req): Json<SubmitPayload>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let session = fetch_session(&state, &token).await?;
    if session.status == "completed" {
        return Err(ApiError::AlreadySigned);
    }
    let role = parse_role(&session.role)?;

    if !req.consent {
        return Err(ApiError::InvalidRequest(
            "consent to sign electronically is required".into(),
        ));
    }
    if req.signer_name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("signer name is required".into()));
    }

    // Rebuild the field list from the stored markup and fill it from the
    // payload; any tab left without a value means an incomplete submission.
    let mut tabs = tokens::scan(&session.lease_html, role);
    let mut missing = Vec::new();
    for tab in &mut tabs {
        let value = match tab.kind {
            TabKind::Initial => req
                .initials_data
                .iter()
                .find(|entry| entry.id == tab.id)
                .map(|entry| entry.value.clone()),
            TabKind::Signature => req.signature_data_url.clone(),
        };
        match value {
            Some(value) => {
                encode::validate_png_data_uri(&value).map_err(|reason| {
                    ApiError::InvalidRequest(format!("field '{}': {}", tab.id, reason))
                })?;
                tab.complete(value);
            }
            None => missing.push(tab.id.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(ApiError::InvalidRequest(format!(
            "incomplete fields: {}",
            missing.join(", ")
        )));
    }

    // Every token resolved: persist the fully substituted document.
    let signed_html = compositor::compose(&session.lease_html, &tabs, Focus::None);

    sqlx::query(
        r#"
        UPDATE sign_sessions
        SET signed_html = ?, signer_name = ?, signer_email = ?, status = 'completed', updated_at = ?
        WHERE token = ?
        "#,
    )
    .bind(&signed_html)
    .bind(req.signer_name.trim())
    .bind(req.signer_email.trim())
    .bind(Utc::now().to_rfc3339())
    .bind(&token)
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Session {} signed by {} <{}> ({} fields)",
        token,
        req.signer_name,
        req.signer_email,
        tabs.len()
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: Some("Signing complete".into()),
    }))
}

async fn fetch_session(state: &AppState, token: &str) -> Result<DbSignSession, ApiError> {
    let session: Option<DbSignSession> = sqlx::query_as(
        r#"
        SELECT token, lease_id, role, recipient_name, recipient_email, lease_html,
               document_hash, signed_html, signer_name, signer_email, status,
               created_at, updated_at, expires_at
        FROM sign_sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(&state.db)
    .await?;

    let session = session.ok_or_else(|| ApiError::SessionNotFound(token.to_string()))?;

    if let Some(expires) = &session.expires_at {
        if expires < &Utc::now() {
            // Surface expiry in the stored status; completed sessions keep
            // their status.
            sqlx::query(
                r#"
                UPDATE sign_sessions SET status = 'expired', updated_at = ?
                WHERE token = ? AND status = 'pending'
                "#,
            )
            .bind(Utc::now().to_rfc3339())
            .bind(token)
            .execute(&state.db)
            .await?;
            return Err(ApiError::SessionExpired);
        }
    }

    Ok(session)
}

fn parse_role(role: &str) -> Result<SignerRole, ApiError> {
    SignerRole::parse(role).ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!("unknown signer role in database: {}", role))
    })
}
