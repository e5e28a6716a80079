//! `POST /`: storage notifications delivered as Pub/Sub push messages.
//!
//! Envelope: `{"message": {"data": base64(json)}}` where the decoded JSON
//! describes the uploaded object (`bucket`, `name`, plus fields we ignore).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::store::WeeklyMenu;

/// The uploaded menu photo a notification points at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageObject {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub name: String,
}

/// Decode a push body. `Ok(None)` means a well-formed envelope whose
/// message carries no `data`.
pub fn parse_push(body: &[u8]) -> Result<Option<StorageObject>, ApiError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("no Pub/Sub message received".into()))?;

    let message = envelope
        .as_object()
        .and_then(|obj| obj.get("message"))
        .ok_or_else(|| ApiError::BadRequest("invalid Pub/Sub message format".into()))?;

    let Some(data) = message.as_object().and_then(|m| m.get("data")) else {
        return Ok(None);
    };

    let object = data
        .as_str()
        .and_then(|encoded| {
            base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .ok()
        })
        .and_then(|decoded| serde_json::from_slice::<StorageObject>(&decoded).ok())
        .ok_or_else(|| {
            ApiError::BadRequest("Data property is not valid base64 encoded JSON".into())
        })?;

    if object.bucket.is_empty() || object.name.is_empty() {
        return Err(ApiError::BadRequest(
            "name and bucket properties are required".into(),
        ));
    }
    Ok(Some(object))
}

/// Recognize the uploaded photo and store it as this week's menu.
pub async fn receive(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let object = parse_push(&body)?
        .ok_or_else(|| ApiError::Internal("Pub/Sub message carries no data".into()))?;

    tracing::info!(bucket = %object.bucket, name = %object.name, "Storage notification received");

    let ApiContext {
        recognizer,
        source,
        store,
        language,
        store_key,
    } = ctx;

    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        let menu = recognizer.recognize_source(&*source, &object.bucket, &object.name, &language)?;
        let weekly = WeeklyMenu::new(menu, &language, Utc::now());
        store.save(&store_key, &weekly)?;
        tracing::info!(
            key = %store_key,
            week = weekly.calendar_week,
            "Weekly menu saved"
        );
        Ok(())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Recognition task failed: {e}")))??;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(data: &str) -> Vec<u8> {
        serde_json::json!({ "message": { "data": data } })
            .to_string()
            .into_bytes()
    }

    fn encode(json: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(json)
    }

    fn bad_request(result: Result<Option<StorageObject>, ApiError>) -> bool {
        matches!(result, Err(ApiError::BadRequest(_)))
    }

    #[test]
    fn decodes_storage_notification() {
        let data = encode(r#"{"bucket": "kita-menus", "name": "kw12.jpg", "size": "1024"}"#);
        let object = parse_push(&envelope(&data)).unwrap().unwrap();
        assert_eq!(
            object,
            StorageObject {
                bucket: "kita-menus".into(),
                name: "kw12.jpg".into(),
            }
        );
    }

    #[test]
    fn empty_or_non_json_body_is_bad_request() {
        assert!(bad_request(parse_push(b"")));
        assert!(bad_request(parse_push(b"not json")));
    }

    #[test]
    fn envelope_without_message_is_bad_request() {
        assert!(bad_request(parse_push(br#"{"subscription": "x"}"#)));
        assert!(bad_request(parse_push(br#"["message"]"#)));
    }

    #[test]
    fn message_without_data_is_none() {
        assert_eq!(parse_push(br#"{"message": {"messageId": "1"}}"#).unwrap(), None);
        assert_eq!(parse_push(br#"{"message": "hello"}"#).unwrap(), None);
    }

    #[test]
    fn undecodable_data_is_bad_request() {
        assert!(bad_request(parse_push(&envelope("***"))));
        assert!(bad_request(parse_push(&envelope(&encode("not json")))));
        assert!(bad_request(parse_push(br#"{"message": {"data": 42}}"#)));
    }

    #[test]
    fn missing_bucket_or_name_is_bad_request() {
        assert!(bad_request(parse_push(&envelope(&encode(r#"{"bucket": "b"}"#)))));
        assert!(bad_request(parse_push(&envelope(&encode(r#"{"name": "n.jpg"}"#)))));
        assert!(bad_request(parse_push(&envelope(&encode(
            r#"{"bucket": "", "name": "n.jpg"}"#
        )))));
    }
}
