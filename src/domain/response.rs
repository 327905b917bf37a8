#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushResponse {
    pub ok: bool,
    pub operation_id: Option<String>,
    pub push_ids: Vec<String>,
    pub message_ids: Vec<String>,
    pub content_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Error body returned by the service for a rejected request.
pub struct ApiFailure {
    pub error: Option<String>,
    pub error_code: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub operation_id: Option<String>,
}
