//! CrudService: generic CRUD over any store, plus the request validators.

mod crud;
pub mod validation;
pub use crud::{Created, CrudService};
