//! Storage backend tests
//!
//! `notes` and `characters` run against SQLite, `json_store` runs the same
//! contract against the key-value backend, and `migrations` covers schema
//! upgrades on existing databases.

mod migrations;
