use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    constants::{DEFAULT_GUESS_LIMIT, DEFAULT_WORD_LENGTH},
    evaluation::{self, GuessStatus},
};
use crate::net::errors::RelayError;

/// Fixed parameters for one game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    /// Number of characters in the secret word.
    pub word_length: usize,
    /// Number of recorded guesses allowed before the game is lost.
    pub guess_limit: usize,
}

impl GameSettings {
    #[must_use]
    pub const fn new(word_length: usize, guess_limit: usize) -> Self {
        Self {
            word_length,
            guess_limit,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_LENGTH, DEFAULT_GUESS_LIMIT)
    }
}

/// Access to the dictionary service backing a game.
///
/// The production implementation relays each call over TCP; tests
/// substitute an in-memory word list.
pub trait Dictionary {
    /// Picks a random known word with exactly `length` characters.
    fn random_word(&self, length: usize) -> Result<String, RelayError>;

    /// Whether `word` is a known dictionary word.
    fn validate_word(&self, word: &str) -> Result<bool, RelayError>;
}

/// What happened to one submitted guess.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GuessOutcome {
    /// The guess does not have the required number of characters. It is
    /// not recorded and the attempt is not spent.
    LengthMismatch,
    /// The dictionary does not know the word. Not recorded either.
    NotAWord,
    /// A well-formed, known word: recorded and evaluated letter by
    /// letter.
    Evaluated(Vec<GuessStatus>),
}

/// What gets reported to the account store when a game finishes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameRecord {
    pub win: bool,
    pub word: String,
    pub guesses: Vec<String>,
}

/// One player's active game: the secret word and the guesses recorded
/// against it so far.
///
/// A game is exclusively owned by the session playing it and is
/// discarded when it ends, so nothing here is shared or locked.
#[derive(Debug)]
pub struct GameInstance {
    secret: String,
    guesses: Vec<String>,
    settings: GameSettings,
}

impl GameInstance {
    /// Starts a new game with a secret word drawn from the dictionary.
    pub fn start(
        dictionary: &impl Dictionary,
        settings: GameSettings,
    ) -> Result<Self, RelayError> {
        let secret = dictionary.random_word(settings.word_length)?;
        debug!("new game with secret word {secret:?}");
        Ok(Self {
            secret,
            guesses: Vec::new(),
            settings,
        })
    }

    /// Submits one guess.
    ///
    /// Validation order is fixed: length first, so a wrong-length guess
    /// never costs a dictionary call, then the dictionary, then
    /// evaluation. Only guesses that reach evaluation are recorded and
    /// count against the guess limit. A dictionary failure propagates
    /// without recording anything.
    pub fn submit_guess(
        &mut self,
        dictionary: &impl Dictionary,
        guess: &str,
    ) -> Result<GuessOutcome, RelayError> {
        if guess.chars().count() != self.settings.word_length {
            return Ok(GuessOutcome::LengthMismatch);
        }
        if !dictionary.validate_word(guess)? {
            return Ok(GuessOutcome::NotAWord);
        }
        self.guesses.push(guess.to_string());
        Ok(GuessOutcome::Evaluated(evaluation::evaluate(
            &self.secret,
            guess,
        )))
    }

    /// Number of recorded guesses.
    #[must_use]
    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    /// True once every allowed guess has been spent.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.guesses.len() == self.settings.guess_limit
    }

    #[must_use]
    pub fn secret_word(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    /// Consumes the finished game into its history record.
    #[must_use]
    pub fn into_record(self, win: bool) -> GameRecord {
        GameRecord {
            win,
            word: self.secret,
            guesses: self.guesses,
        }
    }
}
