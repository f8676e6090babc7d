//! Form-submission routes: validate, then relay to the admin mailbox.
//!
//! Validation is presence plus an email format check; everything else is
//! forwarded verbatim. A failed send is reported as a 500, not queued.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::mailer::{is_valid_email, ContactMessage, FormAnswer, MultiStepForm, SolutionRequest};
use crate::state::AppState;

const MISSING_FIELDS: &str = "missing required fields";
const INVALID_EMAIL: &str = "invalid email address";

#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SolutionPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MultiStepPayload {
    pub email: Option<String>,
    #[serde(default)]
    pub answers: Vec<FormAnswer>,
}

/// A field is present when it is set and non-blank.
fn required(field: Option<String>) -> Result<String, AppError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
    }
}

fn validated_email(field: Option<String>) -> Result<String, AppError> {
    let email = required(field)?;
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest(INVALID_EMAIL.to_string()));
    }
    Ok(email)
}

/// POST /api/contact
pub async fn contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> AppResult<Json<Value>> {
    let submission = ContactMessage {
        name: required(payload.name)?,
        email: validated_email(payload.email)?,
        message: required(payload.message)?,
    };

    state
        .mailer
        .send_contact(&submission)
        .await
        .map_err(AppError::Mail)?;

    Ok(Json(json!({ "ok": true })))
}

/// POST /api/solution
pub async fn solution(
    State(state): State<AppState>,
    Json(payload): Json<SolutionPayload>,
) -> AppResult<Json<Value>> {
    let request = SolutionRequest {
        name: required(payload.name)?,
        email: validated_email(payload.email)?,
        company: required(payload.company)?,
        message: required(payload.message)?,
    };

    state
        .mailer
        .send_solution(&request)
        .await
        .map_err(AppError::Mail)?;

    Ok(Json(json!({ "ok": true })))
}

/// POST /api/multi-step-form
pub async fn multi_step_form(
    State(state): State<AppState>,
    Json(payload): Json<MultiStepPayload>,
) -> AppResult<Json<Value>> {
    let form = MultiStepForm {
        email: validated_email(payload.email)?,
        answers: payload.answers,
    };

    state
        .mailer
        .send_multi_step(&form)
        .await
        .map_err(AppError::Mail)?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_present() {
        assert_eq!(required(Some("Ada".to_string())).unwrap(), "Ada");
    }

    #[test]
    fn test_required_missing() {
        let err = required(None).unwrap_err();
        assert!(err.to_string().contains(MISSING_FIELDS));
    }

    #[test]
    fn test_required_blank() {
        assert!(required(Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_validated_email_accepts_valid() {
        let email = validated_email(Some("ada@example.com".to_string())).unwrap();
        assert_eq!(email, "ada@example.com");
    }

    #[test]
    fn test_validated_email_rejects_format() {
        let err = validated_email(Some("not-an-email".to_string())).unwrap_err();
        assert!(err.to_string().contains(INVALID_EMAIL));
    }

    #[test]
    fn test_validated_email_missing_reports_missing() {
        let err = validated_email(None).unwrap_err();
        assert!(err.to_string().contains(MISSING_FIELDS));
    }

    #[test]
    fn test_multi_step_payload_defaults_answers() {
        let payload: MultiStepPayload =
            serde_json::from_str(r#"{"email": "ada@example.com"}"#).expect("Should deserialize");
        assert!(payload.answers.is_empty());
    }
}
