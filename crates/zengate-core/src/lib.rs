//! Core contracts for zengate: the password record entity and the store
//! trait shared by storage backends and the vault service.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod record;
pub mod store;
