//! Key handling and authenticated encryption for the zengate vault.
//! Everything sensitive stays inside this crate's types; key bytes are
//! never exposed through `Debug` and nothing here logs.

pub mod cipher;
pub mod key;
