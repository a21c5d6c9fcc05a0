//! Response helpers shared by the handlers. Bodies are bare rows or arrays, no envelope.

use crate::entity::EntityDef;
use crate::models::MessageBody;
use crate::store::Row;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn message(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<MessageBody>) {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
}

/// `{ "message": ..., "<response_key>": <row> }` for a removed row.
pub fn deleted(entity: &EntityDef, message: String, row: Row) -> Json<Value> {
    let mut body = Map::new();
    body.insert("message".into(), Value::String(message));
    body.insert(entity.response_key.into(), row);
    Json(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RESOURCES;
    use serde_json::json;

    #[test]
    fn deleted_body_names_the_row() {
        let Json(body) = deleted(&RESOURCES, "Resource 1 deleted".into(), json!({ "id": 1 }));
        assert_eq!(body, json!({ "message": "Resource 1 deleted", "resource": { "id": 1 } }));
    }
}
