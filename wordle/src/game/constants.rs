/// Number of characters a secret word (and so every guess) must have.
pub const DEFAULT_WORD_LENGTH: usize = 5;

/// Number of recorded guesses a player gets before the game is lost.
pub const DEFAULT_GUESS_LIMIT: usize = 6;
