//! Typed rows and typed create/update inputs. Rows are what the API returns; inputs are what
//! the validators produce from a request body before anything reaches the store.

use crate::entity::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Guide,
    Video,
    Exercise,
    Project,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Guide,
        ResourceType::Video,
        ResourceType::Exercise,
        ResourceType::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Guide => "guide",
            ResourceType::Video => "video",
            ResourceType::Exercise => "exercise",
            ResourceType::Project => "project",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// One field of a partial update. `Null` is kept apart from `Absent`: nullable columns
/// are cleared by an explicit null, while an omitted field always keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }
}

impl<T: Into<Value>> Patch<T> {
    /// Push this field into `changes`. For non-nullable columns an explicit null counts as omitted.
    fn push_into(self, changes: &mut Record, column: &'static str, nullable: bool) {
        match self {
            Patch::Absent => {}
            Patch::Null if nullable => changes.push((column, Value::Null)),
            Patch::Null => {}
            Patch::Value(v) => changes.push((column, v.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Resource {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Guide Express")]
    pub title: String,
    #[schema(example = "https://expressjs.com")]
    pub url: String,
    #[schema(example = "Official documentation")]
    pub description: Option<String>,
    #[schema(example = 2)]
    pub theme_id: i64,
    pub r#type: ResourceType,
    pub is_ada: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct ResourceCreate {
    #[schema(example = "Guide Express")]
    pub title: String,
    #[schema(example = "https://expressjs.com")]
    pub url: String,
    pub description: Option<String>,
    #[schema(example = 2)]
    pub theme_id: i64,
    pub r#type: ResourceType,
    pub is_ada: bool,
}

impl ResourceCreate {
    pub fn into_record(self) -> Record {
        vec![
            ("title", Value::from(self.title)),
            ("url", Value::from(self.url)),
            ("description", self.description.map_or(Value::Null, Value::from)),
            ("theme_id", Value::from(self.theme_id)),
            ("type", Value::from(self.r#type.as_str())),
            ("is_ada", Value::from(self.is_ada)),
        ]
    }
}

/// Partial update; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, ToSchema)]
pub struct ResourceUpdate {
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[schema(value_type = Option<String>)]
    pub url: Patch<String>,
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[schema(value_type = Option<i64>)]
    pub theme_id: Patch<i64>,
    #[schema(value_type = Option<ResourceType>)]
    pub r#type: Patch<ResourceType>,
    #[schema(value_type = Option<bool>)]
    pub is_ada: Patch<bool>,
}

impl ResourceUpdate {
    pub fn into_changes(self) -> Record {
        let mut changes = Record::new();
        self.title.push_into(&mut changes, "title", false);
        self.url.push_into(&mut changes, "url", false);
        self.description.push_into(&mut changes, "description", true);
        self.theme_id.push_into(&mut changes, "theme_id", false);
        self.r#type
            .map(|t| t.as_str())
            .push_into(&mut changes, "type", false);
        self.is_ada.push_into(&mut changes, "is_ada", false);
        changes
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Theme {
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "Backend")]
    pub name: String,
    #[schema(example = "APIs and servers")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct ThemeCreate {
    #[schema(example = "Backend")]
    pub name: String,
    pub description: Option<String>,
}

impl ThemeCreate {
    pub fn into_record(self) -> Record {
        vec![
            ("name", Value::from(self.name)),
            ("description", self.description.map_or(Value::Null, Value::from)),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, ToSchema)]
pub struct ThemeUpdate {
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
}

impl ThemeUpdate {
    pub fn into_changes(self) -> Record {
        let mut changes = Record::new();
        self.name.push_into(&mut changes, "name", false);
        self.description.push_into(&mut changes, "description", true);
        changes
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Skill {
    #[schema(example = 5)]
    pub id: i64,
    #[schema(example = "Node.js")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, ToSchema)]
pub struct SkillCreate {
    #[schema(example = "Node.js")]
    pub name: String,
}

impl SkillCreate {
    pub fn into_record(self) -> Record {
        vec![("name", Value::from(self.name))]
    }
}

#[derive(Clone, Debug, Default, PartialEq, ToSchema)]
pub struct SkillUpdate {
    #[schema(value_type = Option<String>, example = "TypeScript")]
    pub name: Patch<String>,
}

impl SkillUpdate {
    pub fn into_changes(self) -> Record {
        let mut changes = Record::new();
        self.name.push_into(&mut changes, "name", false);
        changes
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResourceSkill {
    #[schema(example = 1)]
    pub resource_id: i64,
    #[schema(example = 5)]
    pub skill_id: i64,
}

/// Body of `POST /resources-skills`.
#[derive(Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct ResourceSkillCreate {
    #[schema(example = 1)]
    pub resource_id: i64,
    #[schema(example = 5)]
    pub skill_id: i64,
}

impl ResourceSkillCreate {
    pub fn into_record(self) -> Record {
        vec![
            ("resource_id", Value::from(self.resource_id)),
            ("skill_id", Value::from(self.skill_id)),
        ]
    }
}

/// Confirmation returned by the delete endpoints and by an idempotent link creation.
#[derive(Serialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "Link already exists")]
    pub message: String,
}
