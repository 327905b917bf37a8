use serde::{Deserialize, Serialize};

use crate::domain::{ApiFailure, DeviceTypes, Notification, Push, PushResponse, Selector};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct PushJsonBody<'a> {
    audience: &'a Selector,
    notification: &'a Notification,
    device_types: &'a DeviceTypes,
}

#[derive(Debug, Clone, Deserialize)]
struct PushJsonResponse {
    ok: bool,
    #[serde(default)]
    operation_id: Option<String>,
    #[serde(default)]
    push_ids: Vec<String>,
    #[serde(default)]
    message_ids: Vec<String>,
    #[serde(default)]
    content_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    operation_id: Option<String>,
}

pub fn encode_push_json(request: &Push) -> Result<Vec<u8>, TransportError> {
    let body = PushJsonBody {
        audience: request.audience(),
        notification: request.notification(),
        device_types: request.device_types(),
    };
    Ok(serde_json::to_vec(&body)?)
}

pub fn decode_push_json_response(json: &str) -> Result<PushResponse, TransportError> {
    let parsed: PushJsonResponse = serde_json::from_str(json)?;
    Ok(PushResponse {
        ok: parsed.ok,
        operation_id: parsed.operation_id,
        push_ids: parsed.push_ids,
        message_ids: parsed.message_ids,
        content_urls: parsed.content_urls,
    })
}

pub fn decode_error_json_response(json: &str) -> Result<ApiFailure, TransportError> {
    let parsed: ErrorJsonResponse = serde_json::from_str(json)?;
    Ok(ApiFailure {
        error: parsed.error,
        error_code: parsed.error_code,
        details: parsed.details,
        operation_id: parsed.operation_id,
    })
}
