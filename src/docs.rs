//! OpenAPI document served at `/api-docs/openapi.json`.

use crate::error::ErrorBody;
use crate::handlers;
use crate::models::{
    MessageBody, Resource, ResourceCreate, ResourceSkill, ResourceSkillCreate, ResourceType,
    ResourceUpdate, Skill, SkillCreate, SkillUpdate, Theme, ThemeCreate, ThemeUpdate,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Skills catalog API", description = "Learning resources, themes, skills and their links"),
    paths(
        handlers::list_resources,
        handlers::read_resource,
        handlers::create_resource,
        handlers::update_resource,
        handlers::delete_resource,
        handlers::list_themes,
        handlers::read_theme,
        handlers::create_theme,
        handlers::update_theme,
        handlers::delete_theme,
        handlers::list_skills,
        handlers::read_skill,
        handlers::create_skill,
        handlers::update_skill,
        handlers::delete_skill,
        handlers::list_links,
        handlers::read_link,
        handlers::create_link,
        handlers::delete_link,
    ),
    components(schemas(
        Resource,
        ResourceCreate,
        ResourceUpdate,
        ResourceType,
        Theme,
        ThemeCreate,
        ThemeUpdate,
        Skill,
        SkillCreate,
        SkillUpdate,
        ResourceSkill,
        ResourceSkillCreate,
        MessageBody,
        ErrorBody,
    )),
    tags(
        (name = "Resources", description = "Learning resources"),
        (name = "Themes", description = "Themes grouping resources"),
        (name = "Skills", description = "Skills taught by resources"),
        (name = "Resource skills", description = "Links between resources and skills"),
    )
)]
pub struct ApiDoc;
