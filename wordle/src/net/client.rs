//! A low-level TCP wordle client.
//!
//! This client is blocking and so is primarily used as a testing utility
//! rather than an actual player-facing client.

use anyhow::{Error, bail};
use serde_json::Value;
use std::{
    net::{SocketAddr, TcpStream},
    thread,
    time::Duration,
};

use super::{
    super::game::GuessStatus,
    messages::{ClientPacket, ServerPacket, StoreReply, Token},
    utils,
};

/// Default timeout for reading from the server.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for writing to the server.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// A blocking TCP client for connecting to a wordle session server.
///
/// This client provides a synchronous interface for the credential
/// hand-off, the top-level commands, and the in-game exchange.
/// Primarily used for testing and simple client implementations.
#[derive(Debug)]
pub struct Client {
    /// The session token issued by the account store on connect.
    pub token: Token,
    /// The underlying TCP stream.
    pub stream: TcpStream,
}

impl Client {
    /// Acknowledge a `wordle_result` packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet cannot be sent to the server.
    pub fn ack(&mut self) -> Result<(), Error> {
        utils::write_prefixed(&mut self.stream, &ClientPacket::Ack)?;
        Ok(())
    }

    /// Change the account password; returns the account store's reply
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange with the server fails.
    pub fn change_password(&mut self, new_password: &str) -> Result<Value, Error> {
        let msg = ClientPacket::ChangePassword {
            token: self.token.clone(),
            new_password: new_password.to_string(),
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(utils::read_prefixed(&mut self.stream)?)
    }

    /// Erase the player's game history; returns the account store's
    /// reply verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange with the server fails.
    pub fn clear_history(&mut self) -> Result<Value, Error> {
        let msg = ClientPacket::ClearHistory {
            token: self.token.clone(),
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(utils::read_prefixed(&mut self.stream)?)
    }

    /// Connect to a session server and perform the credential hand-off.
    ///
    /// This method attempts to connect with exponential backoff, trying
    /// three times with decreasing timeouts (1s, 500ms, 100ms).
    ///
    /// # Arguments
    ///
    /// * `addr` - The server socket address
    /// * `credentials` - A register or login packet
    ///
    /// # Returns
    ///
    /// Returns the connected client and the account store's verbatim
    /// auth reply on success.
    ///
    /// # Errors
    ///
    /// Returns an error if unable to connect or if the account store
    /// rejects the credentials.
    pub fn connect(addr: &SocketAddr, credentials: &ClientPacket) -> Result<(Self, Value), Error> {
        let mut connect_timeouts = vec![
            Duration::from_secs(1),
            Duration::from_millis(500),
            Duration::from_millis(100),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(mut stream) => {
                    stream.set_read_timeout(Some(READ_TIMEOUT))?;
                    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
                    utils::write_prefixed(&mut stream, credentials)?;
                    let reply: Value = utils::read_prefixed(&mut stream)?;
                    let verdict: StoreReply = serde_json::from_value(reply.clone())?;
                    if !verdict.is_success() {
                        bail!("authentication failed: {}", verdict.response);
                    }
                    let Some(token) = verdict.token else {
                        bail!("authentication succeeded without a token");
                    };
                    return Ok((Self { token, stream }, reply));
                }
                _ => thread::sleep(connect_timeout),
            }
        }
        bail!("couldn't connect to {addr}")
    }

    /// Fetch the player's game history; returns the account store's
    /// reply verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange with the server fails.
    pub fn get_history(&mut self) -> Result<Value, Error> {
        let msg = ClientPacket::History {
            token: self.token.clone(),
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(utils::read_prefixed(&mut self.stream)?)
    }

    /// Submit one guess.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet cannot be sent to the server.
    pub fn guess(&mut self, guess: &str) -> Result<(), Error> {
        let msg = ClientPacket::Guess {
            guess: guess.to_string(),
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(())
    }

    /// Connect and log into an existing account.
    ///
    /// # Errors
    ///
    /// Returns an error if unable to connect or if the account store
    /// rejects the credentials.
    pub fn login(addr: &SocketAddr, username: &str, password: &str) -> Result<(Self, Value), Error> {
        Self::connect(
            addr,
            &ClientPacket::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
        )
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet cannot be sent to the server.
    pub fn logout(&mut self) -> Result<(), Error> {
        let msg = ClientPacket::Logout {
            token: Some(self.token.clone()),
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(())
    }

    /// Ask the server to start a game.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet cannot be sent to the server.
    pub fn play(&mut self) -> Result<(), Error> {
        let msg = ClientPacket::Play {
            token: self.token.clone(),
        };
        utils::write_prefixed(&mut self.stream, &msg)?;
        Ok(())
    }

    pub fn recv(&mut self) -> Result<ServerPacket, Error> {
        match utils::read_prefixed::<ServerPacket, TcpStream>(&mut self.stream) {
            Ok(ServerPacket::Error { response }) => bail!(response),
            Ok(packet) => Ok(packet),
            Err(error) => bail!(error),
        }
    }

    pub fn recv_error(stream: &mut TcpStream) -> Result<String, Error> {
        match utils::read_prefixed::<ServerPacket, TcpStream>(stream) {
            Ok(ServerPacket::Error { response }) => Ok(response),
            Ok(response) => {
                bail!("invalid server response: {response}")
            }
            Err(error) => bail!(error),
        }
    }

    pub fn recv_game_over(stream: &mut TcpStream) -> Result<(String, String), Error> {
        match utils::read_prefixed::<ServerPacket, TcpStream>(stream) {
            Ok(ServerPacket::GameOver {
                game_over_message,
                word,
            }) => Ok((game_over_message, word)),
            Ok(ServerPacket::Error { response }) => bail!(response),
            Ok(response) => {
                bail!("invalid server response: {response}")
            }
            Err(error) => bail!(error),
        }
    }

    pub fn recv_result(stream: &mut TcpStream) -> Result<Vec<GuessStatus>, Error> {
        match utils::read_prefixed::<ServerPacket, TcpStream>(stream) {
            Ok(ServerPacket::WordleResult { response }) => Ok(response),
            Ok(ServerPacket::Error { response }) => bail!(response),
            Ok(response) => {
                bail!("invalid server response: {response}")
            }
            Err(error) => bail!(error),
        }
    }

    pub fn recv_waiting_for_guess(stream: &mut TcpStream) -> Result<usize, Error> {
        match utils::read_prefixed::<ServerPacket, TcpStream>(stream) {
            Ok(ServerPacket::WaitingForGuess { guess_number }) => Ok(guess_number),
            Ok(ServerPacket::Error { response }) => bail!(response),
            Ok(response) => {
                bail!("invalid server response: {response}")
            }
            Err(error) => bail!(error),
        }
    }

    /// Connect and register a fresh account.
    ///
    /// # Errors
    ///
    /// Returns an error if unable to connect or if the account store
    /// rejects the registration.
    pub fn register(
        addr: &SocketAddr,
        username: &str,
        password: &str,
    ) -> Result<(Self, Value), Error> {
        Self::connect(
            addr,
            &ClientPacket::Register {
                username: username.to_string(),
                password: password.to_string(),
            },
        )
    }
}
