//! Request validation: pure checks of path identifiers and JSON bodies, producing typed inputs.
//! Nothing here touches the store.

use crate::error::AppError;
use crate::models::{
    Patch, ResourceCreate, ResourceSkillCreate, ResourceType, ResourceUpdate, SkillCreate,
    SkillUpdate, ThemeCreate, ThemeUpdate,
};
use serde_json::{Map, Value};

pub const INVALID_ID: &str = "Invalid id";
pub const INVALID_IDS: &str = "Invalid ids";
pub const RESOURCE_SHAPE: &str =
    "Expected body: { title, url, description?, theme_id, type, is_ada }";
pub const INVALID_TYPE: &str = "type must be one of: guide, video, exercise, project";
pub const NAME_REQUIRED: &str = "name is required";
pub const INVALID_NAME: &str = "Invalid name";
pub const LINK_IDS_REQUIRED: &str = "resource_id and skill_id must be numbers";

/// Parse a path identifier. Surrounding whitespace is ignored; anything but an integer is rejected.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(INVALID_ID))
}

pub fn parse_link_ids(resource_id: &str, skill_id: &str) -> Result<(i64, i64), AppError> {
    match (resource_id.trim().parse(), skill_id.trim().parse()) {
        (Ok(r), Ok(s)) => Ok((r, s)),
        _ => Err(AppError::bad_request(INVALID_IDS)),
    }
}

/// Trimmed content of a string that is not blank.
fn non_empty_string(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Integer from a JSON number or a numeric string (`2`, `2.0`, `"2"`).
fn coerce_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn present<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// Read a nullable optional string used on create: missing and null both mean "no value".
fn optional_string(body: &Map<String, Value>, key: &str) -> Result<Option<String>, AppError> {
    match present(body, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::bad_request(format!("Invalid {}", key))),
    }
}

/// Read one field of a partial update, running `parse` only when a non-null value was sent.
fn patch_field<T>(
    body: &Map<String, Value>,
    key: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
    error: impl FnOnce() -> AppError,
) -> Result<Patch<T>, AppError> {
    match body.get(key) {
        None => Ok(Patch::Absent),
        Some(Value::Null) => Ok(Patch::Null),
        Some(v) => parse(v).map(Patch::Value).ok_or_else(error),
    }
}

fn parse_type(v: &Value) -> Option<ResourceType> {
    v.as_str().and_then(|s| s.parse().ok())
}

pub fn resource_create(body: &Map<String, Value>) -> Result<ResourceCreate, AppError> {
    let shape = || AppError::bad_request(RESOURCE_SHAPE);
    let title = present(body, "title")
        .and_then(non_empty_string)
        .ok_or_else(shape)?;
    let url = present(body, "url")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
        .ok_or_else(shape)?;
    let theme_id = present(body, "theme_id")
        .and_then(coerce_int)
        .ok_or_else(shape)?;
    let raw_type = present(body, "type")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(shape)?;
    let is_ada = present(body, "is_ada")
        .and_then(Value::as_bool)
        .ok_or_else(shape)?;
    let r#type = raw_type
        .parse::<ResourceType>()
        .map_err(|_| AppError::bad_request(INVALID_TYPE))?;
    let description = optional_string(body, "description")?;

    Ok(ResourceCreate {
        title,
        url,
        description,
        theme_id,
        r#type,
        is_ada,
    })
}

pub fn resource_update(body: &Map<String, Value>) -> Result<ResourceUpdate, AppError> {
    let invalid = |field: &str| AppError::bad_request(format!("Invalid {}", field));
    Ok(ResourceUpdate {
        title: patch_field(body, "title", non_empty_string, || invalid("title"))?,
        url: patch_field(
            body,
            "url",
            |v| v.as_str().filter(|s| !s.trim().is_empty()).map(String::from),
            || invalid("url"),
        )?,
        description: patch_field(
            body,
            "description",
            |v| v.as_str().map(String::from),
            || invalid("description"),
        )?,
        theme_id: patch_field(body, "theme_id", coerce_int, || invalid("theme_id"))?,
        r#type: patch_field(body, "type", parse_type, || {
            AppError::bad_request(INVALID_TYPE)
        })?,
        is_ada: patch_field(body, "is_ada", Value::as_bool, || invalid("is_ada"))?,
    })
}

pub fn theme_create(body: &Map<String, Value>) -> Result<ThemeCreate, AppError> {
    let name = present(body, "name")
        .and_then(non_empty_string)
        .ok_or_else(|| AppError::bad_request(NAME_REQUIRED))?;
    let description = optional_string(body, "description")?;
    Ok(ThemeCreate { name, description })
}

/// A sent name must be a non-blank string; unlike other fields, an explicit null is rejected.
fn name_patch(body: &Map<String, Value>) -> Result<Patch<String>, AppError> {
    match body.get("name") {
        None => Ok(Patch::Absent),
        Some(v) => non_empty_string(v)
            .map(Patch::Value)
            .ok_or_else(|| AppError::bad_request(INVALID_NAME)),
    }
}

pub fn theme_update(body: &Map<String, Value>) -> Result<ThemeUpdate, AppError> {
    Ok(ThemeUpdate {
        name: name_patch(body)?,
        description: patch_field(
            body,
            "description",
            |v| v.as_str().map(String::from),
            || AppError::bad_request("Invalid description"),
        )?,
    })
}

pub fn skill_create(body: &Map<String, Value>) -> Result<SkillCreate, AppError> {
    let name = present(body, "name")
        .and_then(non_empty_string)
        .ok_or_else(|| AppError::bad_request(NAME_REQUIRED))?;
    Ok(SkillCreate { name })
}

pub fn skill_update(body: &Map<String, Value>) -> Result<SkillUpdate, AppError> {
    Ok(SkillUpdate {
        name: name_patch(body)?,
    })
}

pub fn link_create(body: &Map<String, Value>) -> Result<ResourceSkillCreate, AppError> {
    let resource_id = present(body, "resource_id").and_then(coerce_int);
    let skill_id = present(body, "skill_id").and_then(coerce_int);
    match (resource_id, skill_id) {
        (Some(resource_id), Some(skill_id)) => Ok(ResourceSkillCreate {
            resource_id,
            skill_id,
        }),
        _ => Err(AppError::bad_request(LINK_IDS_REQUIRED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn message(err: AppError) -> String {
        assert!(matches!(err, AppError::BadRequest(_)), "unexpected {err:?}");
        err.to_string()
    }

    #[test]
    fn path_ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert_eq!(message(parse_id("abc").unwrap_err()), INVALID_ID);
        assert_eq!(message(parse_id("1.5").unwrap_err()), INVALID_ID);
        assert_eq!(message(parse_id("").unwrap_err()), INVALID_ID);
        assert_eq!(parse_link_ids("1", "5").unwrap(), (1, 5));
        assert_eq!(message(parse_link_ids("1", "x").unwrap_err()), INVALID_IDS);
    }

    #[test]
    fn resource_create_accepts_the_documented_example() {
        let input = resource_create(&obj(json!({
            "title": "  Guide Express ",
            "url": "https://expressjs.com",
            "theme_id": 2,
            "type": "guide",
            "is_ada": true
        })))
        .unwrap();
        assert_eq!(input.title, "Guide Express");
        assert_eq!(input.theme_id, 2);
        assert_eq!(input.r#type, ResourceType::Guide);
        assert_eq!(input.description, None);
    }

    #[test]
    fn resource_create_coerces_theme_id() {
        let input = resource_create(&obj(json!({
            "title": "t", "url": "u", "theme_id": "3", "type": "video", "is_ada": false
        })))
        .unwrap();
        assert_eq!(input.theme_id, 3);
    }

    #[test]
    fn resource_create_rejects_bad_shapes() {
        let cases = [
            json!({ "url": "u", "theme_id": 1, "type": "guide", "is_ada": true }),
            json!({ "title": "   ", "url": "u", "theme_id": 1, "type": "guide", "is_ada": true }),
            json!({ "title": "t", "theme_id": 1, "type": "guide", "is_ada": true }),
            json!({ "title": "t", "url": "u", "type": "guide", "is_ada": true }),
            json!({ "title": "t", "url": "u", "theme_id": "two", "type": "guide", "is_ada": true }),
            json!({ "title": "t", "url": "u", "theme_id": 1, "is_ada": true }),
            json!({ "title": "t", "url": "u", "theme_id": 1, "type": "guide", "is_ada": "yes" }),
        ];
        for case in cases {
            assert_eq!(message(resource_create(&obj(case)).unwrap_err()), RESOURCE_SHAPE);
        }
    }

    #[test]
    fn resource_type_outside_enum_is_rejected() {
        let err = resource_create(&obj(json!({
            "title": "t", "url": "u", "theme_id": 1, "type": "tutorial", "is_ada": true
        })))
        .unwrap_err();
        assert_eq!(message(err), INVALID_TYPE);

        let err = resource_update(&obj(json!({ "type": "tutorial" }))).unwrap_err();
        assert_eq!(message(err), INVALID_TYPE);
    }

    #[test]
    fn resource_update_only_checks_present_fields() {
        let update = resource_update(&obj(json!({ "description": "new text" }))).unwrap();
        assert!(update.title.is_absent());
        assert!(update.r#type.is_absent());
        assert_eq!(update.description, Patch::Value("new text".into()));

        let update = resource_update(&obj(json!({ "description": null, "title": null }))).unwrap();
        assert_eq!(update.description, Patch::Null);
        assert_eq!(update.title, Patch::Null);

        assert!(resource_update(&obj(json!({ "is_ada": "no" }))).is_err());
        assert!(resource_update(&obj(json!({ "title": "" }))).is_err());
    }

    #[test]
    fn theme_and_skill_names_are_trimmed_and_required() {
        assert_eq!(theme_create(&obj(json!({ "name": " Backend " }))).unwrap().name, "Backend");
        assert_eq!(message(theme_create(&obj(json!({}))).unwrap_err()), NAME_REQUIRED);
        assert_eq!(message(skill_create(&obj(json!({ "name": "" }))).unwrap_err()), NAME_REQUIRED);
        assert_eq!(skill_create(&obj(json!({ "name": " Rust" }))).unwrap().name, "Rust");

        assert_eq!(message(theme_update(&obj(json!({ "name": "  " }))).unwrap_err()), INVALID_NAME);
        assert_eq!(message(skill_update(&obj(json!({ "name": null }))).unwrap_err()), INVALID_NAME);
        assert!(skill_update(&obj(json!({}))).unwrap().name.is_absent());
    }

    #[test]
    fn link_ids_must_be_numbers() {
        let link = link_create(&obj(json!({ "resource_id": 1, "skill_id": "5" }))).unwrap();
        assert_eq!((link.resource_id, link.skill_id), (1, 5));
        assert_eq!(
            message(link_create(&obj(json!({ "resource_id": 1 }))).unwrap_err()),
            LINK_IDS_REQUIRED
        );
        assert_eq!(
            message(link_create(&obj(json!({ "resource_id": "a", "skill_id": 2 }))).unwrap_err()),
            LINK_IDS_REQUIRED
        );
    }
}
