use serde::{Serialize, de::DeserializeOwned};
use std::io::{self, Read, Write};

/// Maximum allowed message size (1MB) to prevent unbounded allocation
/// from a bad length prefix.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

// A blocking read that trips its deadline surfaces as `WouldBlock` on
// Unix and `TimedOut` on Windows; fold them so callers can match one
// kind.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<()> {
    reader.read_exact(buf).map_err(|error| match error.kind() {
        io::ErrorKind::WouldBlock => io::ErrorKind::TimedOut.into(),
        _ => error,
    })
}

/// Reads one length-prefixed JSON message from a reader.
///
/// The prefix is a little-endian `u32` byte count for the JSON payload
/// that follows. A payload that fails to parse as `T` is reported as
/// `InvalidData`; a read that hits its timeout as `TimedOut`.
pub fn read_prefixed<T: DeserializeOwned, R: Read>(reader: &mut R) -> io::Result<T> {
    // Read the size as a u32
    let mut len_bytes = [0; 4];
    read_full(reader, &mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message size {len} exceeds maximum allowed size of {MAX_MESSAGE_SIZE} bytes"),
        ));
    }

    let mut buf = vec![0; len];
    read_full(reader, &mut buf)?;

    match serde_json::from_slice(&buf) {
        Ok(value) => Ok(value),
        Err(error) if error.is_io() => Err(error.into()),
        Err(_) => Err(io::ErrorKind::InvalidData.into()),
    }
}

/// Writes one length-prefixed JSON message to a writer.
pub fn write_prefixed<T: Serialize, W: Write>(writer: &mut W, value: &T) -> io::Result<()> {
    let serialized = match serde_json::to_vec(value) {
        Ok(serialized) => serialized,
        Err(error) if error.is_io() => return Err(error.into()),
        Err(_) => return Err(io::ErrorKind::InvalidData.into()),
    };
    if serialized.len() > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "serialized message size {} exceeds maximum allowed size of {MAX_MESSAGE_SIZE} bytes",
                serialized.len()
            ),
        ));
    }

    // Write the size of the serialized data and the serialized data all
    // in one chunk to prevent read-side race conditions.
    let size = serialized.len() as u32;
    let mut buf = Vec::from(size.to_le_bytes());
    buf.extend(serialized);
    writer.write_all(&buf)
}
