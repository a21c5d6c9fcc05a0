//! Extract a JSON object body, reporting any problem as malformed input.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde_json::{Map, Value};

/// Body parsed as a JSON object. An empty body reads as `{}` so field validation,
/// not the parser, reports what is missing.
#[derive(Clone, Debug, Default)]
pub struct JsonBody(pub Map<String, Value>);

impl JsonBody {
    pub fn parse(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody::default());
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?;
        match value {
            Value::Object(m) => Ok(JsonBody(m)),
            _ => Err(AppError::bad_request("Body must be a JSON object")),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(e.body_text())
            } else {
                AppError::bad_request(e.body_text())
            }
        })?;
        JsonBody::parse(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_an_empty_object() {
        assert!(JsonBody::parse(b"").unwrap().0.is_empty());
        assert!(JsonBody::parse(b"  \n").unwrap().0.is_empty());
    }

    #[test]
    fn objects_only() {
        assert_eq!(JsonBody::parse(br#"{"name":"Rust"}"#).unwrap().0["name"], "Rust");
        assert!(matches!(JsonBody::parse(b"[1]"), Err(AppError::BadRequest(_))));
        assert!(matches!(JsonBody::parse(b"{nope"), Err(AppError::BadRequest(_))));
    }
}
