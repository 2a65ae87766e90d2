//! The per-connection session engine.
//!
//! Each authenticated connection is served by one `Session` on its own
//! thread, cycling through a small state machine until the player logs
//! out or the connection drops. All reads block, so the ordering of the
//! result/ack/game-over exchange is enforced by the reads themselves
//! rather than by any shared state.

use log::{debug, info, warn};
use serde_json::Value;
use std::{
    io,
    net::{SocketAddr, TcpStream},
};

use super::{
    errors::RelayError,
    messages::{ClientPacket, ServerPacket, Token},
    relay::{AccountClient, DictionaryClient},
    utils,
};
use crate::game::{GameInstance, GameSettings, GuessOutcome, evaluation};

/// Sent with the closing `game_over` packet of a won game.
pub const WIN_MESSAGE: &str = "You win!";

/// Sent with the closing `game_over` packet of a lost game.
pub const LOSE_MESSAGE: &str = "You lose!";

/// Where a session stands between packets.
///
/// `InGame` owns the running game outright, so ending a game in any way
/// drops it and no stale game state can leak into the next command.
enum SessionState {
    /// Logged in and idle, waiting for a top-level command.
    Authenticated,
    /// A game is running and the next guess is awaited.
    InGame(GameInstance),
    /// Terminal: the player logged out.
    Closed,
}

/// One player's authenticated session.
pub(crate) struct Session {
    stream: TcpStream,
    peer: SocketAddr,
    token: Token,
    accounts: AccountClient,
    dictionary: DictionaryClient,
    settings: GameSettings,
}

impl Session {
    pub(crate) fn new(
        stream: TcpStream,
        peer: SocketAddr,
        token: Token,
        accounts: AccountClient,
        dictionary: DictionaryClient,
        settings: GameSettings,
    ) -> Self {
        Self {
            stream,
            peer,
            token,
            accounts,
            dictionary,
            settings,
        }
    }

    /// Runs the session to completion, consuming it. The socket closes
    /// on drop.
    pub(crate) fn run(mut self) {
        let peer = self.peer;
        match self.serve() {
            Ok(()) => info!("session {peer}: closed"),
            Err(error) => warn!("session {peer}: connection lost: {error}"),
        }
    }

    fn serve(&mut self) -> io::Result<()> {
        let mut state = SessionState::Authenticated;
        loop {
            state = match state {
                SessionState::Authenticated => self.next_command()?,
                SessionState::InGame(game) => self.next_guess(game)?,
                SessionState::Closed => return Ok(()),
            };
        }
    }

    /// Handles one top-level command while no game is running.
    ///
    /// History, clear-history, and password-change responses from the
    /// account store are relayed to the player verbatim; the session
    /// only authors packets of its own for game traffic and failures.
    fn next_command(&mut self) -> io::Result<SessionState> {
        let packet: ClientPacket = utils::read_prefixed(&mut self.stream)?;
        debug!("session {}: received {packet}", self.peer);
        match packet {
            ClientPacket::Play { .. } => self.start_game(),
            ClientPacket::History { .. } => {
                let response = self.accounts.get_history(&self.token);
                self.relay_to_player(response)?;
                Ok(SessionState::Authenticated)
            }
            ClientPacket::ClearHistory { .. } => {
                let response = self.accounts.clear_history(&self.token);
                self.relay_to_player(response)?;
                Ok(SessionState::Authenticated)
            }
            packet @ ClientPacket::ChangePassword { .. } => {
                // The whole packet doubles as the store request; forward
                // it untouched.
                let response = self.accounts.forward(&packet);
                self.relay_to_player(response)?;
                Ok(SessionState::Authenticated)
            }
            ClientPacket::Logout { .. } => {
                info!("session {}: player logged out", self.peer);
                Ok(SessionState::Closed)
            }
            packet => {
                debug!(
                    "session {}: rejected {packet} outside a game",
                    self.peer
                );
                self.send_error("invalid choice")?;
                Ok(SessionState::Authenticated)
            }
        }
    }

    fn start_game(&mut self) -> io::Result<SessionState> {
        match GameInstance::start(&self.dictionary, self.settings) {
            Ok(game) => {
                info!("session {}: game started", self.peer);
                Ok(SessionState::InGame(game))
            }
            Err(error) => {
                warn!("session {}: could not start a game: {error}", self.peer);
                self.send_error(&error.to_string())?;
                Ok(SessionState::Authenticated)
            }
        }
    }

    /// One round of the guess loop: prompt, receive, resolve.
    fn next_guess(&mut self, game: GameInstance) -> io::Result<SessionState> {
        let prompt = ServerPacket::WaitingForGuess {
            guess_number: game.guess_count() + 1,
        };
        utils::write_prefixed(&mut self.stream, &prompt)?;

        let packet: ClientPacket = utils::read_prefixed(&mut self.stream)?;
        match packet {
            ClientPacket::Guess { guess } => self.resolve_guess(game, &guess),
            ClientPacket::Logout { .. } => {
                info!("session {}: player quit mid-game", self.peer);
                Ok(SessionState::Closed)
            }
            packet => {
                debug!("session {}: rejected {packet} during a game", self.peer);
                self.send_error("expected a guess")?;
                Ok(SessionState::InGame(game))
            }
        }
    }

    fn resolve_guess(&mut self, mut game: GameInstance, guess: &str) -> io::Result<SessionState> {
        debug!("session {}: guess {guess:?}", self.peer);
        let statuses = match game.submit_guess(&self.dictionary, guess) {
            Err(error) => {
                warn!("session {}: dictionary call failed: {error}", self.peer);
                self.send_error(&error.to_string())?;
                return Ok(SessionState::InGame(game));
            }
            Ok(GuessOutcome::LengthMismatch) => {
                self.send_error(&format!(
                    "guess must be {} characters long, try again",
                    self.settings.word_length
                ))?;
                return Ok(SessionState::InGame(game));
            }
            Ok(GuessOutcome::NotAWord) => {
                self.send_error("invalid word, try again")?;
                return Ok(SessionState::InGame(game));
            }
            Ok(GuessOutcome::Evaluated(statuses)) => statuses,
        };

        utils::write_prefixed(
            &mut self.stream,
            &ServerPacket::WordleResult {
                response: statuses.clone(),
            },
        )?;
        // The player must confirm the result before a game-over packet
        // may follow; otherwise both could land in one client read.
        let ack: ClientPacket = utils::read_prefixed(&mut self.stream)?;
        match ack {
            ClientPacket::Ack => {}
            ClientPacket::Logout { .. } => {
                info!("session {}: player quit mid-game", self.peer);
                return Ok(SessionState::Closed);
            }
            packet => {
                debug!(
                    "session {}: treated {packet} as the result acknowledgment",
                    self.peer
                );
            }
        }

        if evaluation::is_winning(&statuses) {
            self.finish_game(game, true)?;
            Ok(SessionState::Authenticated)
        } else if game.is_exhausted() {
            self.finish_game(game, false)?;
            Ok(SessionState::Authenticated)
        } else {
            Ok(SessionState::InGame(game))
        }
    }

    /// Reveals the word, then reports the finished game to the account
    /// store.
    fn finish_game(&mut self, game: GameInstance, win: bool) -> io::Result<()> {
        let message = if win { WIN_MESSAGE } else { LOSE_MESSAGE };
        info!(
            "session {}: game over after {} guesses ({message})",
            self.peer,
            game.guess_count(),
        );
        utils::write_prefixed(
            &mut self.stream,
            &ServerPacket::GameOver {
                game_over_message: message.to_string(),
                word: game.secret_word().to_string(),
            },
        )?;

        // The outcome already reached the player. A failed history write
        // is a server-side problem and must not inject an unsolicited
        // packet into the command exchange.
        match self.accounts.add_history(&self.token, &game.into_record(win)) {
            Ok(reply) => debug!("session {}: history recorded: {reply}", self.peer),
            Err(error) => warn!(
                "session {}: failed to record game history: {error}",
                self.peer
            ),
        }
        Ok(())
    }

    /// Sends a relayed account-store response verbatim, or the relay
    /// failure as an error packet.
    fn relay_to_player(&mut self, response: Result<Value, RelayError>) -> io::Result<()> {
        match response {
            Ok(reply) => utils::write_prefixed(&mut self.stream, &reply),
            Err(error) => {
                warn!("session {}: account store call failed: {error}", self.peer);
                self.send_error(&error.to_string())
            }
        }
    }

    fn send_error(&mut self, message: &str) -> io::Result<()> {
        utils::write_prefixed(
            &mut self.stream,
            &ServerPacket::Error {
                response: message.to_string(),
            },
        )
    }
}
