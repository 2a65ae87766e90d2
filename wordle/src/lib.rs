//! # Wordle
//!
//! A networked wordle session server: per-connection game sessions over
//! TCP, with accounts and dictionary lookups delegated to two external
//! services through a synchronous relay protocol.
//!
//! ## Architecture
//!
//! Every accepted connection owes a single register or login packet,
//! which the server forwards to the account store. Authenticated
//! connections are then served by their own OS thread running a small
//! session state machine:
//!
//! - **Authenticated**: idle, dispatching top-level commands (play,
//!   history, clear history, change password, logout)
//! - **InGame**: a game is running; the session prompts for guesses,
//!   evaluates them, and reports the finished game to the account store
//! - **Closed**: terminal, after a logout
//!
//! No state is shared between sessions. Everything that outlives a
//! connection (credentials, tokens, game history) lives behind the
//! account store, so concurrency is plain session replication.
//!
//! ## Core Modules
//!
//! - [`game`]: guess evaluation and per-game state
//! - [`net`]: framing, packet types, backend relay, the session engine,
//!   the acceptor, and a blocking test client
//!
//! ## Example
//!
//! ```
//! use wordle::{GuessStatus, evaluate, is_winning};
//!
//! let statuses = evaluate("crane", "crane");
//! assert!(is_winning(&statuses));
//! assert_eq!(statuses, vec![GuessStatus::CorrectLetterPosition; 5]);
//! ```

/// Networking components for client-server and backend communication.
pub mod net;
pub use net::{client::Client, messages, relay, server, session, utils};

/// Core game logic: evaluation and per-game state.
pub mod game;
pub use game::{
    Dictionary, GameInstance, GameRecord, GameSettings, GuessOutcome, GuessStatus,
    constants::{self, DEFAULT_GUESS_LIMIT, DEFAULT_WORD_LENGTH},
    evaluation::{evaluate, is_winning},
};
