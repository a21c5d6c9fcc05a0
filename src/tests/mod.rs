//! HTTP-level tests against the full router, backed by an in-memory store.

mod memory;
