use super::{ColumnDef, Dependent, Entity, EntityDef, PgType, Record};
use crate::error::AppError;
use crate::service::validation;
use serde_json::{Map, Value};

pub const RESOURCES_TABLE: &str = "resources";
pub const THEMES_TABLE: &str = "themes";
pub const SKILLS_TABLE: &str = "skills";
pub const RESOURCES_SKILLS_TABLE: &str = "resources_skills";

const ID_KEY: &[&str] = &["id"];

pub const RESOURCES: EntityDef = EntityDef {
    table: RESOURCES_TABLE,
    label: "Resource",
    response_key: "resource",
    key: ID_KEY,
    columns: &[
        ColumnDef::new("id", PgType::Int).generated(),
        ColumnDef::new("title", PgType::Text),
        ColumnDef::new("url", PgType::Text),
        ColumnDef::new("description", PgType::Text).nullable(),
        ColumnDef::new("theme_id", PgType::Int).references(THEMES_TABLE),
        ColumnDef::new("type", PgType::Text),
        ColumnDef::new("is_ada", PgType::Bool),
        ColumnDef::new("created_at", PgType::Timestamptz).generated(),
        ColumnDef::new("updated_at", PgType::Timestamptz).generated(),
    ],
    timestamps: true,
    ignore_duplicates: false,
    dependents: &[Dependent {
        table: RESOURCES_SKILLS_TABLE,
        column: "resource_id",
    }],
};

pub const THEMES: EntityDef = EntityDef {
    table: THEMES_TABLE,
    label: "Theme",
    response_key: "theme",
    key: ID_KEY,
    columns: &[
        ColumnDef::new("id", PgType::Int).generated(),
        ColumnDef::new("name", PgType::Text),
        ColumnDef::new("description", PgType::Text).nullable(),
        ColumnDef::new("created_at", PgType::Timestamptz).generated(),
        ColumnDef::new("updated_at", PgType::Timestamptz).generated(),
    ],
    timestamps: true,
    ignore_duplicates: false,
    dependents: &[],
};

pub const SKILLS: EntityDef = EntityDef {
    table: SKILLS_TABLE,
    label: "Skill",
    response_key: "skill",
    key: ID_KEY,
    columns: &[
        ColumnDef::new("id", PgType::Int).generated(),
        ColumnDef::new("name", PgType::Text),
    ],
    timestamps: false,
    ignore_duplicates: false,
    dependents: &[],
};

pub const RESOURCES_SKILLS: EntityDef = EntityDef {
    table: RESOURCES_SKILLS_TABLE,
    label: "Link",
    response_key: "link",
    key: &["resource_id", "skill_id"],
    columns: &[
        ColumnDef::new("resource_id", PgType::Int).references(RESOURCES_TABLE),
        ColumnDef::new("skill_id", PgType::Int).references(SKILLS_TABLE),
    ],
    timestamps: false,
    ignore_duplicates: true,
    dependents: &[],
};

/// Every table, in creation order (referenced tables first).
pub static ALL_ENTITIES: [&EntityDef; 4] = [&THEMES, &SKILLS, &RESOURCES, &RESOURCES_SKILLS];

pub struct Resources;
pub struct Themes;
pub struct Skills;

impl Entity for Resources {
    const DEF: &'static EntityDef = &RESOURCES;

    fn validate_create(body: &Map<String, Value>) -> Result<Record, AppError> {
        Ok(validation::resource_create(body)?.into_record())
    }

    fn validate_update(body: &Map<String, Value>) -> Result<Record, AppError> {
        Ok(validation::resource_update(body)?.into_changes())
    }
}

impl Entity for Themes {
    const DEF: &'static EntityDef = &THEMES;

    fn validate_create(body: &Map<String, Value>) -> Result<Record, AppError> {
        Ok(validation::theme_create(body)?.into_record())
    }

    fn validate_update(body: &Map<String, Value>) -> Result<Record, AppError> {
        Ok(validation::theme_update(body)?.into_changes())
    }
}

impl Entity for Skills {
    const DEF: &'static EntityDef = &SKILLS;

    fn validate_create(body: &Map<String, Value>) -> Result<Record, AppError> {
        Ok(validation::skill_create(body)?.into_record())
    }

    fn validate_update(body: &Map<String, Value>) -> Result<Record, AppError> {
        Ok(validation::skill_update(body)?.into_changes())
    }
}
