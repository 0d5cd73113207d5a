//! HTTP request handlers.
//!
//! Request and response bodies use camelCase field names, matching what
//! the web client sends.

use crate::error::ApiError;
use crate::session::{clear_cookie, session_cookie, token_from_cookie_header, SESSION_COOKIE};
use crate::state::AppState;
use axum::extract::{Multipart, Query, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;
use veridoc_crypto::{checksummed, hash_password, verify_password};
use veridoc_pipeline::{DisclosureRequest, VerificationRequest};
use veridoc_types::{
    ContactMessage, EthAddress, QrId, Timestamp, User, UserId, UserSettings, VerificationStatus,
};

// ── Auth ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub wallet_address: Option<String>,
}

impl UserView {
    fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            wallet_address: user.wallet_address.as_ref().map(checksummed),
        }
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let full_name = req.full_name.trim();
    let email = req.email.trim().to_lowercase();
    if full_name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "fullName, email, and password are required".into(),
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("email is not valid".into()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    let user = User {
        user_id: UserId::generate(),
        full_name: full_name.into(),
        email,
        password_hash,
        phone: req.phone.filter(|p| !p.trim().is_empty()),
        wallet_address: None,
    };
    state.users.insert_user(&user).map_err(|e| match e {
        veridoc_store::StoreError::Duplicate(_) => {
            ApiError::BadRequest("email is already registered".into())
        }
        other => other.into(),
    })?;
    state
        .settings
        .upsert_settings(&UserSettings::defaults_for(user.user_id.clone()))?;

    state.metrics.user_count.inc();
    info!(email = %user.email, "user registered");

    let token = state.sessions.create(user.user_id.clone());
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Json(serde_json::json!({ "message": "Account created successfully!" })),
    ))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_lowercase();
    // Bad credentials are a 400, matching the client's expectations.
    let user = state
        .users
        .get_user_by_email(&email)?
        .ok_or_else(|| ApiError::BadRequest("Invalid email or password.".into()))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::BadRequest("Invalid email or password.".into()));
    }

    state.metrics.logins_total.inc();
    let token = state.sessions.create(user.user_id.clone());
    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Json(serde_json::json!({
            "message": "Signed in successfully!",
            "user": UserView::from_user(&user),
        })),
    ))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(token);
    }
    (
        AppendHeaders([(SET_COOKIE, clear_cookie())]),
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}

// ── Profile ──────────────────────────────────────────────────────────────

pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    let user = authenticate(&state, &headers)?;
    Ok(Json(UserView::from_user(&user)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let full_name = req.full_name.trim();
    let email = req.email.trim().to_lowercase();
    if full_name.is_empty() || email.is_empty() {
        return Err(ApiError::BadRequest("fullName and email are required".into()));
    }

    state
        .users
        .update_profile(
            &user.user_id,
            full_name.into(),
            email,
            req.phone.filter(|p| !p.trim().is_empty()),
        )
        .map_err(|e| match e {
            veridoc_store::StoreError::Duplicate(_) => {
                ApiError::BadRequest("email is already registered".into())
            }
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({ "message": "Profile updated successfully!" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWalletRequest {
    pub wallet_address: String,
}

pub async fn link_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LinkWalletRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let address: EthAddress = req
        .wallet_address
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid wallet address: {e}")))?;

    state
        .users
        .link_wallet(&user.user_id, address)
        .map_err(|e| match e {
            veridoc_store::StoreError::Duplicate(key) => {
                ApiError::BadRequest(format!("wallet already linked: {key}"))
            }
            other => other.into(),
        })?;

    info!(user = %user.user_id, wallet = %address, "wallet linked");
    Ok(Json(serde_json::json!({
        "message": "Wallet linked successfully!",
        "walletAddress": checksummed(&address),
    })))
}

// ── Settings ─────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBody {
    pub email_notifications: bool,
    pub sms_notifications: bool,
}

pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SettingsBody>, ApiError> {
    let user = authenticate(&state, &headers)?;
    let settings = state
        .settings
        .get_settings(&user.user_id)?
        .unwrap_or_else(|| UserSettings::defaults_for(user.user_id.clone()));
    Ok(Json(SettingsBody {
        email_notifications: settings.email_notifications,
        sms_notifications: settings.sms_notifications,
    }))
}

pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SettingsBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = authenticate(&state, &headers)?;
    state.settings.upsert_settings(&UserSettings {
        user_id: user.user_id,
        email_notifications: req.email_notifications,
        sms_notifications: req.sms_notifications,
    })?;
    Ok(Json(serde_json::json!({ "message": "Settings updated successfully!" })))
}

// ── Verification ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub message: String,
    pub verification_status: String,
    pub file_hash: String,
    pub transaction_hash: Option<String>,
    #[serde(rename = "documentCID")]
    pub document_cid: Option<String>,
    pub qr_code_link: Option<String>,
    pub qr_code_data_url: Option<String>,
}

/// Multipart upload: `document` (file), `docType`, `docNumber`.
///
/// A Verified outcome answers 200; a Rejected outcome answers 404 with
/// the same shape and null artifacts, so the client can still show the
/// file hash.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, &headers)?;

    let mut doc_type = None;
    let mut doc_number = None;
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("docType") => {
                doc_type = Some(field.text().await.map_err(bad_field)?);
            }
            Some("docNumber") => {
                doc_number = Some(field.text().await.map_err(bad_field)?);
            }
            Some("document") => {
                file = Some(field.bytes().await.map_err(bad_field)?.to_vec());
            }
            _ => {}
        }
    }

    let request = VerificationRequest {
        doc_type: doc_type.ok_or_else(|| ApiError::BadRequest("All fields are required.".into()))?,
        doc_number: doc_number
            .ok_or_else(|| ApiError::BadRequest("All fields are required.".into()))?,
        file: file.ok_or_else(|| ApiError::BadRequest("All fields are required.".into()))?,
    };

    let started = Instant::now();
    let outcome = state.orchestrator.verify(&user.user_id, request).await?;
    state
        .metrics
        .verification_time_ms
        .observe(started.elapsed().as_millis() as f64);
    state.metrics.verifications_total.inc();

    let (qr_code_link, qr_code_data_url) = match outcome.qr {
        Some(qr) => (Some(qr.link), Some(qr.png_data_url)),
        None => (None, None),
    };
    let body = VerifyResponse {
        message: outcome.message,
        verification_status: outcome.status.as_str().into(),
        file_hash: outcome.file_hash.as_str().into(),
        transaction_hash: outcome.transaction_id,
        document_cid: outcome.cid,
        qr_code_link,
        qr_code_data_url,
    };

    Ok(match outcome.status {
        VerificationStatus::Verified => {
            state.metrics.verifications_verified.inc();
            (StatusCode::OK, Json(body)).into_response()
        }
        _ => {
            state.metrics.verifications_rejected.inc();
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    })
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("malformed multipart field: {e}"))
}

// ── QR lookup and disclosure ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct QrCheckParams {
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCheckResponse {
    pub verification_status: String,
    pub doc_type: String,
    pub submitted_at: u64,
    pub message: String,
}

/// Public lookup: reveals existence and status, never record contents.
pub async fn qr_check(
    State(state): State<AppState>,
    Query(params): Query<QrCheckParams>,
) -> Result<Json<QrCheckResponse>, ApiError> {
    let record = state
        .gate
        .check_qr(&QrId::new(params.id))?
        .ok_or_else(|| ApiError::NotFound("Document not found or invalid.".into()))?;

    Ok(Json(QrCheckResponse {
        verification_status: record.status.as_str().into(),
        doc_type: record.doc_type,
        submitted_at: record.submitted_at.as_secs(),
        message: "Document Found and Verified!".into(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrSignatureRequest {
    pub qr_id: String,
    pub message: String,
    pub signature: String,
    pub wallet_address: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureResponse {
    pub message: String,
    pub doc_type: String,
    pub doc_number: String,
    pub file_hash: String,
    pub transaction_hash: Option<String>,
    #[serde(rename = "documentCID")]
    pub document_cid: Option<String>,
    pub verification_status: String,
}

pub async fn qr_verify_signature(
    State(state): State<AppState>,
    Json(req): Json<QrSignatureRequest>,
) -> Result<Json<DisclosureResponse>, ApiError> {
    let claimed_address: EthAddress = req
        .wallet_address
        .trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid wallet address: {e}")))?;

    let result = state.gate.disclose(&DisclosureRequest {
        qr_id: QrId::new(req.qr_id),
        message: req.message,
        signature: req.signature,
        claimed_address,
    });
    let disclosure = match result {
        Ok(d) => {
            state.metrics.disclosures_granted.inc();
            d
        }
        Err(e) => {
            state.metrics.disclosures_refused.inc();
            return Err(e.into());
        }
    };

    let record = disclosure.record;
    Ok(Json(DisclosureResponse {
        message: "Ownership verified. Full details unlocked.".into(),
        doc_type: record.doc_type,
        doc_number: record.doc_number,
        file_hash: record.file_hash.as_str().into(),
        transaction_hash: record.transaction_id,
        document_cid: record.cid,
        verification_status: record.status.as_str().into(),
    }))
}

// ── Stats and contact ────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_verified: u64,
    pub successful_verifications: u64,
    pub pending_requests: u64,
}

/// Per-user submission counts for the dashboard.
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, ApiError> {
    let user = authenticate(&state, &headers)?;
    Ok(Json(StatsResponse {
        total_verified: state.records.count_for_user(&user.user_id, None)?,
        successful_verifications: state
            .records
            .count_for_user(&user.user_id, Some(VerificationStatus::Verified))?,
        pending_requests: state
            .records
            .count_for_user(&user.user_id, Some(VerificationStatus::Pending))?,
    }))
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub subject: String,
    pub message: String,
}

pub async fn contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&state, &headers)?;
    if req.subject.trim().is_empty() || req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("subject and message are required".into()));
    }
    state.contacts.insert_message(&ContactMessage {
        subject: req.subject,
        message: req.message,
        submitted_by: user.user_id,
        submitted_at: Timestamp::now(),
    })?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Message received" })),
    ))
}

// ── Operational endpoints ────────────────────────────────────────────────

pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "extractionReady": state.orchestrator.extraction_ready(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}

// ── Session helpers ──────────────────────────────────────────────────────

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
}

/// Resolve the session cookie to a live user or fail with 401.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = session_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("authentication required".into()))?;
    let user_id = state
        .sessions
        .resolve(token)
        .ok_or_else(|| ApiError::Unauthorized("session expired".into()))?;
    state
        .users
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::Unauthorized(format!("no such user for {SESSION_COOKIE}")))
}
