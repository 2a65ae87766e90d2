//! Wordle game engine.
//!
//! The evaluator is a pure two-pass comparison of a guess against the
//! secret word; a [`GameInstance`] owns one secret and the guesses
//! recorded against it, reaching the dictionary service only through
//! the [`Dictionary`] seam so the whole engine is testable without a
//! network.

pub mod constants;
pub mod evaluation;
pub mod instance;

pub use evaluation::{GuessStatus, evaluate, is_winning};
pub use instance::{Dictionary, GameInstance, GameRecord, GameSettings, GuessOutcome};
