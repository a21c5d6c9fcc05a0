//! HTTP handlers. `entity` holds the generic CRUD flow; the per-resource modules are the
//! documented entry points wired into the router.

pub mod entity;
pub mod resources;
pub mod resources_skills;
pub mod skills;
pub mod themes;

pub use resources::*;
pub use resources_skills::*;
pub use skills::*;
pub use themes::*;
