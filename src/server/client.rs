//! Client for connecting to the search server daemon

use crate::server::protocol::{
    Request, Response, SearchResponse, StatusResponse, read_message, write_message,
};
use std::io::{BufReader, BufWriter};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Read/write timeout
const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("search server is not running")]
    NotRunning,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("work '{0}' does not exist")]
    UnknownWork(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("invalid response from server")]
    InvalidResponse,
}

/// Client for the search server
pub struct SearchClient {
    reader: BufReader<UnixStream>,
    writer: BufWriter<UnixStream>,
}

impl SearchClient {
    /// Try to connect to a running daemon at `socket_path`
    pub fn connect(socket_path: &Path) -> ClientResult<Self> {
        if !socket_path.exists() {
            return Err(ClientError::NotRunning);
        }

        let stream = UnixStream::connect(socket_path).map_err(|_| ClientError::NotRunning)?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;

        let reader = BufReader::new(stream.try_clone()?);
        let writer = BufWriter::new(stream);

        Ok(Self { reader, writer })
    }

    fn call(&mut self, request: &Request) -> ClientResult<Response> {
        write_message(&mut self.writer, request)?;
        match read_message(&mut self.reader)? {
            Response::Error { message } => Err(ClientError::Server(message)),
            response => Ok(response),
        }
    }

    /// Search `work` ("" or "all" for everything)
    pub fn search(&mut self, work: &str, query: &str) -> ClientResult<SearchResponse> {
        self.search_page(work, query, 0, 0)
    }

    /// Search `work`, returning at most `limit` matches after skipping
    /// `offset` (`limit` 0 = no limit)
    pub fn search_page(
        &mut self,
        work: &str,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> ClientResult<SearchResponse> {
        let request = Request::Search {
            work: work.to_string(),
            query: query.to_string(),
            offset,
            limit,
        };

        match self.call(&request)? {
            Response::Results(results) => Ok(results),
            Response::NotFound { work } => Err(ClientError::UnknownWork(work)),
            Response::BadRequest { message } => Err(ClientError::BadRequest(message)),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Names of the registered works
    pub fn works(&mut self) -> ClientResult<Vec<String>> {
        match self.call(&Request::Works)? {
            Response::Works { names } => Ok(names),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Get server status
    pub fn status(&mut self) -> ClientResult<StatusResponse> {
        match self.call(&Request::Status)? {
            Response::Status(status) => Ok(status),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Request graceful shutdown
    pub fn shutdown(&mut self) -> ClientResult<()> {
        match self.call(&Request::Shutdown)? {
            Response::ShuttingDown => Ok(()),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Ping the server
    pub fn ping(&mut self) -> ClientResult<()> {
        match self.call(&Request::Ping)? {
            Response::Pong => Ok(()),
            _ => Err(ClientError::InvalidResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Corpus;
    use crate::query::{Registry, WorkRange, WorkTable};
    use crate::server::daemon::{SearchServer, ServerOptions};
    use std::sync::Arc;
    use std::thread::JoinHandle;

    /// Serve `text` with one work covering its first line
    fn spawn_server(
        socket: &Path,
        text: &str,
        options: ServerOptions,
    ) -> JoinHandle<anyhow::Result<()>> {
        let corpus = Corpus::from_bytes(text).unwrap();
        let mut works = WorkTable::new();
        works.insert("first".to_string(), WorkRange::new(0, 1));
        let registry = Arc::new(Registry::new(corpus, &works, 250));

        let server = SearchServer::with_options(registry, socket.to_path_buf(), options);
        let listener = server.bind().unwrap();
        std::thread::spawn(move || server.serve(listener))
    }

    #[test]
    fn test_connect_when_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let result = SearchClient::connect(&dir.path().join("missing.sock"));
        assert!(matches!(result, Err(ClientError::NotRunning)));
    }

    #[test]
    fn test_client_server_session() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("shakesearch.sock");

        let corpus = Corpus::from_bytes("MACBETH. Is this a dagger?\nLADY MACBETH. Out, damned spot!\n")
            .unwrap();
        let mut works = WorkTable::new();
        works.insert("macbeth".to_string(), WorkRange::new(0, 1));
        let registry = Arc::new(Registry::new(corpus, &works, 250));

        let server = SearchServer::new(registry, socket.clone());
        let listener = server.bind().unwrap();
        let handle = std::thread::spawn(move || server.serve(listener));

        let mut client = SearchClient::connect(&socket).unwrap();
        client.ping().unwrap();
        assert_eq!(client.works().unwrap(), vec!["macbeth"]);

        assert_eq!(client.search("all", "MACBETH").unwrap().snippets.len(), 2);
        assert_eq!(client.search("macbeth", "spot").unwrap().snippets.len(), 0);
        assert!(matches!(
            client.search("hamlet", "spot"),
            Err(ClientError::UnknownWork(w)) if w == "hamlet"
        ));
        assert!(matches!(client.search("", ""), Err(ClientError::BadRequest(_))));

        let status = client.status().unwrap();
        assert_eq!(status.corpus_lines, 2);

        client.shutdown().unwrap();
        handle.join().unwrap().unwrap();
        assert!(!socket.exists());
    }

    #[test]
    fn test_oversized_results_answer_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("shakesearch.sock");
        let text = format!("{}\n{}", "e".repeat(2000), "x".repeat(10));
        let options = ServerOptions {
            max_response_size: 16 * 1024,
            ..ServerOptions::default()
        };
        let handle = spawn_server(&socket, &text, options);

        let mut client = SearchClient::connect(&socket).unwrap();

        // ~2000 snippets of ~500 bytes each
        match client.search("", "e") {
            Err(ClientError::Server(message)) => assert!(message.contains("too large"), "{message}"),
            other => panic!("unexpected result: {:?}", other.map(|r| r.total)),
        }

        // The connection is still usable, and paging fits
        client.ping().unwrap();
        let page = client.search_page("", "e", 100, 10).unwrap();
        assert_eq!(page.total, 2000);
        assert_eq!(page.snippets.len(), 10);
        assert!(page.cached);

        client.shutdown().unwrap();
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_idle_connection_is_closed_without_reply() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("shakesearch.sock");
        let options = ServerOptions {
            idle_timeout: Duration::from_millis(100),
            ..ServerOptions::default()
        };
        let handle = spawn_server(&socket, "To be, or not to be\nthat is the question\n", options);

        let mut idle = SearchClient::connect(&socket).unwrap();
        idle.ping().unwrap();
        std::thread::sleep(Duration::from_millis(400));

        // A stale error must not be waiting in place of the reply
        assert!(matches!(idle.ping(), Err(ClientError::Io(_))));

        let mut client = SearchClient::connect(&socket).unwrap();
        assert_eq!(client.search("first", "TO BE").unwrap().total, 2);
        client.shutdown().unwrap();
        handle.join().unwrap().unwrap();
    }
}
