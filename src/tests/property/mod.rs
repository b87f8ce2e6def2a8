//! Property-based tests
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `point_buy_props`: the 27-point allocator
//!   - Spent points never exceed the budget
//!   - Purchased scores stay within 8..=15
//!   - Final scores stay within 8..=20 for any race or class
//!   - Same seed, same scores
//!
//! - `name_generator_props`: the name generator
//!   - Names are exactly two words
//!   - Male and female requests draw from their own pools
//!   - Deterministic given same seed
