//! Synchronous request/response calls to the backend services.
//!
//! Every call opens a fresh TCP connection, writes one request frame,
//! reads one response frame, and closes. There is no pooling and no
//! retry: a failed call is reported to the player as an error packet
//! and the session carries on.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    io,
    net::{SocketAddr, TcpStream},
    time::Duration,
};

use super::{
    errors::RelayError,
    messages::{ClientPacket, OracleRequest, StoreRequest, Token, ValidityReply, WordReply},
    utils,
};
use crate::game::{Dictionary, GameRecord};

/// Default deadline applied to connecting to a backend and to each of
/// the request and response halves of a call.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// One backend endpoint and the deadline applied to calls against it.
#[derive(Clone, Copy, Debug)]
pub struct Relay {
    addr: SocketAddr,
    timeout: Duration,
}

impl Relay {
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self::with_timeout(addr, RELAY_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(addr: SocketAddr, timeout: Duration) -> Self {
        Self { addr, timeout }
    }

    /// Performs one request/response exchange against the backend.
    pub fn call<Req, Resp>(&self, request: &Req) -> Result<Resp, RelayError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let mut stream =
            TcpStream::connect_timeout(&self.addr, self.timeout).map_err(|error| {
                match error.kind() {
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => self.timed_out(),
                    _ => self.unreachable(error),
                }
            })?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(|error| self.unreachable(error))?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(|error| self.unreachable(error))?;

        utils::write_prefixed(&mut stream, request)
            .map_err(|error| self.classify_send(error))?;
        utils::read_prefixed(&mut stream).map_err(|error| self.classify_receive(error))
    }

    fn classify_send(&self, error: io::Error) -> RelayError {
        match error.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => self.timed_out(),
            _ => self.unreachable(error),
        }
    }

    fn classify_receive(&self, error: io::Error) -> RelayError {
        match error.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => self.timed_out(),
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                RelayError::MalformedResponse { addr: self.addr }
            }
            _ => self.unreachable(error),
        }
    }

    fn timed_out(&self) -> RelayError {
        RelayError::Timeout {
            addr: self.addr,
            timeout: self.timeout,
        }
    }

    fn unreachable(&self, source: io::Error) -> RelayError {
        RelayError::Unreachable {
            addr: self.addr,
            source,
        }
    }
}

/// Relay-backed access to the dictionary service.
#[derive(Clone, Copy, Debug)]
pub struct DictionaryClient {
    relay: Relay,
}

impl DictionaryClient {
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            relay: Relay::new(addr),
        }
    }

    #[must_use]
    pub fn with_timeout(addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            relay: Relay::with_timeout(addr, timeout),
        }
    }
}

impl Dictionary for DictionaryClient {
    fn random_word(&self, length: usize) -> Result<String, RelayError> {
        let reply: WordReply = self.relay.call(&OracleRequest::GetRandomWord { length })?;
        Ok(reply.response)
    }

    fn validate_word(&self, word: &str) -> Result<bool, RelayError> {
        let reply: ValidityReply = self.relay.call(&OracleRequest::ValidateWord {
            word: word.to_string(),
        })?;
        Ok(reply.response)
    }
}

/// Relay-backed access to the account store.
///
/// Store responses come back as raw JSON values: the session forwards
/// most of them to the player verbatim and only peeks at the `response`
/// field, so nothing the store adds is ever dropped on the floor.
#[derive(Clone, Copy, Debug)]
pub struct AccountClient {
    relay: Relay,
}

impl AccountClient {
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            relay: Relay::new(addr),
        }
    }

    #[must_use]
    pub fn with_timeout(addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            relay: Relay::with_timeout(addr, timeout),
        }
    }

    /// Forwards a client credential or password-change packet unchanged.
    pub fn forward(&self, packet: &ClientPacket) -> Result<Value, RelayError> {
        self.relay.call(packet)
    }

    pub fn get_history(&self, token: &Token) -> Result<Value, RelayError> {
        self.relay.call(&StoreRequest::GetHistory {
            token: token.clone(),
        })
    }

    pub fn clear_history(&self, token: &Token) -> Result<Value, RelayError> {
        self.relay.call(&StoreRequest::ClearHistory {
            token: token.clone(),
        })
    }

    pub fn add_history(&self, token: &Token, data: &GameRecord) -> Result<Value, RelayError> {
        self.relay.call(&StoreRequest::AddHistory {
            token: token.clone(),
            data: data.clone(),
        })
    }
}
