//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `store` defines the catalog persistence seam with a Postgres
//! (`pg_store`) and an in-memory (`memory_store`) implementation. `jwks`
//! verifies bearer tokens against the identity provider's signing keys.

pub mod jwks;
pub mod memory_store;
pub mod pg_store;
pub mod store;
