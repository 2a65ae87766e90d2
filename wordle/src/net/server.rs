//! The connection acceptor.
//!
//! Accepts TCP connections, performs the credential hand-off against
//! the account store, and spawns one session thread per authenticated
//! player. The accept loop itself stays single-threaded; concurrency
//! comes from session replication, and nothing is shared between
//! sessions.

use log::{error, info, warn};
use serde_json::Value;
use std::{
    io,
    net::{SocketAddr, TcpListener, TcpStream},
    thread,
    time::Duration,
};

use super::{
    messages::{ClientPacket, ServerPacket, StoreReply},
    relay::{AccountClient, DictionaryClient, RELAY_TIMEOUT},
    session::Session,
    utils,
};
use crate::game::GameSettings;

/// Default deadline for the single credential packet a fresh connection
/// owes. Without one, an idle connection would wedge the accept loop.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the acceptor needs to serve players.
#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    /// Address of the external account store.
    pub accounts_addr: SocketAddr,
    /// Address of the external dictionary service.
    pub dictionary_addr: SocketAddr,
    /// Game parameters handed to every new game.
    pub settings: GameSettings,
    /// Deadline for each backend relay call.
    pub relay_timeout: Duration,
    /// Deadline for the credential packet on a fresh connection.
    pub handshake_timeout: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn new(accounts_addr: SocketAddr, dictionary_addr: SocketAddr) -> Self {
        Self {
            accounts_addr,
            dictionary_addr,
            settings: GameSettings::default(),
            relay_timeout: RELAY_TIMEOUT,
            handshake_timeout: HANDSHAKE_TIMEOUT,
        }
    }
}

/// A bound, not-yet-running session server.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Binds the listening socket.
    pub fn bind(addr: SocketAddr, config: ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, config })
    }

    /// The bound address; useful after binding to port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and serves connections until the process exits.
    pub fn run(self) -> io::Result<()> {
        info!("wordle server listening on {}", self.listener.local_addr()?);
        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(error) => {
                    error!("accept failed: {error}");
                    continue;
                }
            };
            info!("player connected from {peer}");
            match self.authenticate(stream, peer) {
                Ok(Some(session)) => {
                    if let Err(error) = thread::Builder::new()
                        .name(format!("session-{peer}"))
                        .spawn(move || session.run())
                    {
                        error!("could not spawn a session thread for {peer}: {error}");
                    }
                }
                Ok(None) => info!("connection from {peer} not authenticated"),
                Err(error) => warn!("handshake with {peer} failed: {error}"),
            }
        }
    }

    /// Reads the credential packet, relays it to the account store, and
    /// relays the verdict back.
    ///
    /// `Ok(Some)` hands over a session ready to run; `Ok(None)` means
    /// the hand-off was answered and the connection simply closes; `Err`
    /// means the player's transport failed.
    fn authenticate(&self, mut stream: TcpStream, peer: SocketAddr) -> io::Result<Option<Session>> {
        stream.set_read_timeout(Some(self.config.handshake_timeout))?;

        let packet: ClientPacket = utils::read_prefixed(&mut stream)?;
        let credentials = match packet {
            packet @ (ClientPacket::Register { .. } | ClientPacket::Login { .. }) => packet,
            packet => {
                warn!("{peer} opened with {packet} instead of credentials");
                send_error(&mut stream, "expected register or login")?;
                return Ok(None);
            }
        };

        let accounts =
            AccountClient::with_timeout(self.config.accounts_addr, self.config.relay_timeout);
        let reply: Value = match accounts.forward(&credentials) {
            Ok(reply) => reply,
            Err(error) => {
                // Auth is the one relay failure that costs the player the
                // connection: there is no session to fall back to yet.
                warn!("hand-off to the account store failed for {peer}: {error}");
                send_error(&mut stream, &error.to_string())?;
                return Ok(None);
            }
        };
        utils::write_prefixed(&mut stream, &reply)?;

        let verdict: StoreReply = match serde_json::from_value(reply) {
            Ok(verdict) => verdict,
            Err(_) => {
                warn!("account store sent an unusable auth verdict for {peer}");
                return Ok(None);
            }
        };
        if !verdict.is_success() {
            return Ok(None);
        }
        let Some(token) = verdict.token else {
            warn!("account store reported success without a token for {peer}");
            return Ok(None);
        };

        // Session reads block indefinitely; players are allowed to idle.
        stream.set_read_timeout(None)?;
        info!("player at {peer} authenticated");
        let dictionary =
            DictionaryClient::with_timeout(self.config.dictionary_addr, self.config.relay_timeout);
        Ok(Some(Session::new(
            stream,
            peer,
            token,
            accounts,
            dictionary,
            self.config.settings,
        )))
    }
}

fn send_error(stream: &mut TcpStream, message: &str) -> io::Result<()> {
    utils::write_prefixed(
        stream,
        &ServerPacket::Error {
            response: message.to_string(),
        },
    )
}

/// Binds and runs a server; the common entry point for the binary.
pub fn run(addr: SocketAddr, config: ServerConfig) -> io::Result<()> {
    Server::bind(addr, config)?.run()
}
