//! CRUD routes for resources, themes, skills and resource-skill links.
//! A known path with an unsupported method answers like an unknown path.

use super::not_found;
use crate::handlers::{
    create_link, create_resource, create_skill, create_theme, delete_link, delete_resource,
    delete_skill, delete_theme, list_links, list_resources, list_skills, list_themes, read_link,
    read_resource, read_skill, read_theme, update_resource, update_skill, update_theme,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/resources",
            get(list_resources).post(create_resource).fallback(not_found),
        )
        .route(
            "/resources/:id",
            get(read_resource)
                .put(update_resource)
                .delete(delete_resource)
                .fallback(not_found),
        )
        .route(
            "/themes",
            get(list_themes).post(create_theme).fallback(not_found),
        )
        .route(
            "/themes/:id",
            get(read_theme)
                .put(update_theme)
                .delete(delete_theme)
                .fallback(not_found),
        )
        .route(
            "/skills",
            get(list_skills).post(create_skill).fallback(not_found),
        )
        .route(
            "/skills/:id",
            get(read_skill)
                .put(update_skill)
                .delete(delete_skill)
                .fallback(not_found),
        )
        .route(
            "/resources-skills",
            get(list_links).post(create_link).fallback(not_found),
        )
        .route(
            "/resources-skills/:resource_id/:skill_id",
            get(read_link).delete(delete_link).fallback(not_found),
        )
        .with_state(state)
}
