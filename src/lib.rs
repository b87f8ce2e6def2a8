/// Guildkeep - local guild notes and D&D 5e character generation.
///
/// Core library providing persistent notes, point-buy character
/// generation with racial bonuses, gendered name generation and a
/// client for a local text-generation endpoint.

pub mod config;
pub mod core;
pub mod database;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
