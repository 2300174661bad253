//! Client Diagnostics Sink
//!
//! Accepts small diagnostic events from the WebApp frontend and writes
//! them to the server log. Fire-and-forget: the response carries no body
//! and the client never retries.

use axum::Json;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Diagnostic event reported by the frontend
#[derive(Debug, Deserialize)]
pub struct ClientEvent {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub ua: String,
    /// Client-side timestamp, milliseconds
    #[serde(default)]
    pub t: Option<i64>,
    #[serde(default)]
    pub extra: Option<Value>,
}

/// POST /diag/client
pub async fn client_event(Json(event): Json<ClientEvent>) -> StatusCode {
    tracing::info!(
        kind = %event.kind,
        detail = %event.detail,
        ua = %event.ua,
        t = event.t,
        extra = ?event.extra,
        "Client diagnostic event"
    );

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accepts_partial_payloads() {
        let event: ClientEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.kind, "");
        assert!(event.t.is_none());

        let event: ClientEvent = serde_json::from_str(
            r#"{"type":"ws-error","detail":"socket closed","ua":"TelegramWeb","t":1712345678901,"extra":{"attempt":2}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, "ws-error");
        assert_eq!(event.detail, "socket closed");
        assert_eq!(event.t, Some(1712345678901));
    }
}
