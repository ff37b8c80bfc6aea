//! Search server for warm queries
//!
//! Building the suffix array over a multi-megabyte anthology takes seconds;
//! the daemon pays that once and then answers `(work, query)` requests.
//!
//! Architecture:
//! - `daemon`: Builds the registry, listens on a Unix socket, serves requests
//! - `client`: Connects to the socket, sends queries, receives snippets
//! - `protocol`: Length-prefixed JSON messages shared by both sides

pub mod client;
pub mod daemon;
pub mod protocol;

pub use client::{ClientError, SearchClient};
pub use daemon::{SearchServer, ServerOptions};

use std::path::PathBuf;

/// Get the socket path for the search server
/// Uses a per-user runtime directory for security
pub fn get_socket_path() -> PathBuf {
    // Try XDG_RUNTIME_DIR first (most secure, tmpfs-backed)
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join("shakesearch.sock");
    }

    // Fall back to user's home directory
    if let Some(home) = dirs::home_dir() {
        return home.join(".local").join("run").join("shakesearch.sock");
    }

    // Last resort: /tmp with user ID
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/shakesearch-{}.sock", uid))
}

/// Check if a daemon answers on `socket_path`
pub fn is_server_running(socket_path: &std::path::Path) -> bool {
    SearchClient::connect(socket_path)
        .and_then(|mut client| client.ping())
        .is_ok()
}
