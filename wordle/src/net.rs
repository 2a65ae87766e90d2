//! Networking layer for client-server and backend communication.
//!
//! This module provides TCP-based networking with length-prefixed JSON
//! framing. The server uses blocking I/O with one thread per connection.

/// TCP client for connecting to a wordle session server.
pub mod client;

/// Error types for backend relay calls.
pub mod errors;

/// Message types for the client-server and backend protocols.
pub mod messages;

/// Synchronous request/response calls to the backend services.
pub mod relay;

/// Single-threaded acceptor that spawns per-connection sessions.
pub mod server;

/// The per-connection session state machine.
pub mod session;

/// Utilities for JSON message serialization and framing.
pub mod utils;
