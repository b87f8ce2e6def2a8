//! Crate test suite
//!
//! - `common`: fixtures shared by the modules below
//! - `database`: both storage backends against the same contract
//! - `unit`: guild service and text-generation client
//! - `property`: proptest invariants for allocation and names

mod common;
mod database;
mod property;
mod unit;
