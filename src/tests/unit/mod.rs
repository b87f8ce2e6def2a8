//! Unit Tests
//!
//! ## Test Coverage
//!
//! ### Guild service (`guild_tests`)
//! - Blank note titles are ignored
//! - Race and class are required for characters
//! - Storage failures surface as fixed user messages with the source kept
//!
//! ### Text generation (`text_gen_tests`)
//! - Request body shape against a mock endpoint
//! - Non-2xx status and blank prompts

mod guild_tests;
mod text_gen_tests;
