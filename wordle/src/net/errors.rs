use std::{io, net::SocketAddr, time::Duration};

use thiserror::Error;

/// How one synchronous relay call to a backend service failed.
///
/// The taxonomy is closed on purpose: every I/O or decoding failure a
/// call can hit folds into one of these three, so sessions can report
/// backend trouble to the player uniformly without inspecting sources.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No connection could be established, or the peer vanished
    /// mid-call.
    #[error("backend {addr} unreachable: {source}")]
    Unreachable {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The backend accepted the connection but no complete response
    /// arrived within the deadline.
    #[error("backend {addr} timed out after {timeout:?}")]
    Timeout { addr: SocketAddr, timeout: Duration },

    /// The backend answered with something that is not one well-formed
    /// message of the expected shape.
    #[error("malformed response from backend {addr}")]
    MalformedResponse { addr: SocketAddr },
}
