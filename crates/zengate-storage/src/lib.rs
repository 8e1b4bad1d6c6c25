//! File-backed implementation of the zengate record store contract.

pub mod json_file_store;
