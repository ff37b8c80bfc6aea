//! Protocol messages for client-server communication
//!
//! Uses a simple length-prefixed JSON protocol:
//! - 4 bytes (little-endian u32): message length
//! - N bytes: JSON-encoded message

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Largest message either side will accept
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Request from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Search one work; an empty work or "all" searches the whole corpus
    ///
    /// `offset` and `limit` page through the matches (`limit` 0 = all).
    Search {
        #[serde(default)]
        work: String,
        query: String,
        #[serde(default)]
        offset: usize,
        #[serde(default)]
        limit: usize,
    },

    /// List the registered works
    Works,

    /// Check server health and get stats
    Status,

    /// Graceful shutdown request
    Shutdown,

    /// Ping for connection testing
    Ping,
}

/// Response from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Snippets around every match
    Results(SearchResponse),

    /// The requested work is not registered
    NotFound { work: String },

    /// The request cannot be served as given (e.g. missing query)
    BadRequest { message: String },

    /// Registered work names
    Works { names: Vec<String> },

    /// Server status
    Status(StatusResponse),

    /// Shutdown acknowledged
    ShuttingDown,

    /// Pong response
    Pong,

    /// Error response
    Error { message: String },
}

/// Search results response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub snippets: Vec<String>,
    /// Matches in the work, before paging
    pub total: usize,
    /// Time taken in milliseconds
    pub duration_ms: f64,
    /// Whether results came from cache
    pub cached: bool,
}

/// Server status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Corpus size in bytes
    pub corpus_bytes: usize,
    /// Corpus line count
    pub corpus_lines: usize,
    /// Number of registered works
    pub works: usize,
    /// Total queries served
    pub queries_served: u64,
    /// Cache hit rate (0.0 - 1.0)
    pub cache_hit_rate: f32,
}

/// Write a message to a stream with length prefix
pub fn write_message<W: Write>(writer: &mut W, msg: &impl Serialize) -> std::io::Result<()> {
    write_message_limited(writer, msg, MAX_MESSAGE_SIZE)
}

/// Write a message, refusing bodies over `max_size` bytes
///
/// Nothing is written when the message is refused, so the stream stays in
/// sync and another message can follow.
pub fn write_message_limited<W: Write>(
    writer: &mut W,
    msg: &impl Serialize,
    max_size: usize,
) -> std::io::Result<()> {
    let json = serde_json::to_vec(msg).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })?;

    if json.len() > max_size.min(MAX_MESSAGE_SIZE) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("message of {} bytes is too large", json.len()),
        ));
    }

    writer.write_all(&(json.len() as u32).to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()
}

/// Read a message from a stream with length prefix
pub fn read_message<R: Read, T: for<'de> Deserialize<'de>>(reader: &mut R) -> std::io::Result<T> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    if len > MAX_MESSAGE_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Message too large",
        ));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;

    serde_json::from_slice(&buf).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })
}
