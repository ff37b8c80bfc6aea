//! Search server daemon
//!
//! Holds the registry in memory and answers requests over a Unix socket,
//! one thread per connection.

use crate::query::Registry;
use crate::server::protocol::{
    MAX_MESSAGE_SIZE, Request, Response, SearchResponse, StatusResponse, read_message,
    write_message_limited,
};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use lru::LruCache;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::num::NonZeroUsize;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// LRU cache size for search results
const CACHE_SIZE: usize = 256;

/// Connection timeout
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-connection limits
#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// A connection with no request for this long is closed
    pub idle_timeout: Duration,
    /// Largest response body; bigger results are answered with an error
    pub max_response_size: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            idle_timeout: CONNECTION_TIMEOUT,
            max_response_size: MAX_MESSAGE_SIZE,
        }
    }
}

/// Cache key: (work, query)
type CacheKey = (String, String);

/// Statistics for the server
struct ServerStats {
    start_time: Instant,
    queries_served: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            start_time: Instant::now(),
            queries_served: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        }
    }

    fn cache_hit_rate(&self) -> f32 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f32 / total as f32
        }
    }
}

/// The search server
pub struct SearchServer {
    registry: Arc<Registry>,
    socket_path: PathBuf,
    /// Results by (work, query); the only mutable state in the server
    cache: Mutex<LruCache<CacheKey, Arc<Vec<String>>>>,
    stats: ServerStats,
    options: ServerOptions,
    shutdown: AtomicBool,
}

impl SearchServer {
    /// Create a new server wrapped in Arc
    pub fn new(registry: Arc<Registry>, socket_path: PathBuf) -> Arc<Self> {
        Self::with_options(registry, socket_path, ServerOptions::default())
    }

    pub fn with_options(
        registry: Arc<Registry>,
        socket_path: PathBuf,
        options: ServerOptions,
    ) -> Arc<Self> {
        let cache_size = NonZeroUsize::new(CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Arc::new(Self {
            registry,
            socket_path,
            cache: Mutex::new(LruCache::new(cache_size)),
            stats: ServerStats::new(),
            options,
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Bind the socket, replacing a stale one, readable by this user only
    pub fn bind(&self) -> Result<UnixListener> {
        if let Some(parent) = self.socket_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.socket_path.exists() {
            fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)
            .with_context(|| format!("Failed to bind to {}", self.socket_path.display()))?;

        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.socket_path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(listener)
    }

    /// Bind and serve until a shutdown request arrives (blocking)
    pub fn run(self: &Arc<Self>) -> Result<()> {
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Accept connections on an already bound listener until shutdown
    pub fn serve(self: &Arc<Self>, listener: UnixListener) -> Result<()> {
        info!("listening on {}", self.socket_path.display());

        for stream in listener.incoming() {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            match stream {
                Ok(stream) => {
                    let _ = stream.set_read_timeout(Some(self.options.idle_timeout));
                    let _ = stream.set_write_timeout(Some(CONNECTION_TIMEOUT));

                    let server = Arc::clone(self);
                    thread::spawn(move || {
                        if let Err(e) = server.handle_connection(stream) {
                            error!("connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }

        let _ = fs::remove_file(&self.socket_path);
        info!("server stopped");

        Ok(())
    }

    /// Handle a single client connection
    fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = BufWriter::new(stream);

        loop {
            let request: Request = match read_message(&mut reader) {
                Ok(req) => req,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    // Client disconnected
                    break;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    debug!("closing idle connection");
                    break;
                }
                Err(e) => {
                    let resp = Response::Error {
                        message: format!("Invalid request: {}", e),
                    };
                    self.send(&mut writer, &resp)?;
                    continue;
                }
            };

            let response = self.handle_request(request);
            if let Err(e) = self.send(&mut writer, &response) {
                if e.kind() != std::io::ErrorKind::InvalidData {
                    return Err(e.into());
                }
                // Nothing was written; the client still expects one reply
                warn!("response refused: {}", e);
                let resp = Response::Error {
                    message: format!("{}; narrow the query or page with offset/limit", e),
                };
                self.send(&mut writer, &resp)?;
            }

            if matches!(response, Response::ShuttingDown) {
                self.wake_listener();
                break;
            }
        }

        Ok(())
    }

    fn send<W: std::io::Write>(&self, writer: &mut W, response: &Response) -> std::io::Result<()> {
        write_message_limited(writer, response, self.options.max_response_size)
    }

    /// Handle a single request
    pub fn handle_request(&self, request: Request) -> Response {
        match request {
            Request::Search {
                work,
                query,
                offset,
                limit,
            } => self.handle_search(work, query, offset, limit),

            Request::Works => Response::Works {
                names: self
                    .registry
                    .work_names()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            },

            Request::Status => self.handle_status(),

            Request::Shutdown => {
                info!("shutdown requested");
                self.shutdown.store(true, Ordering::Relaxed);
                Response::ShuttingDown
            }

            Request::Ping => Response::Pong,
        }
    }

    fn handle_search(&self, work: String, query: String, offset: usize, limit: usize) -> Response {
        let start = Instant::now();
        debug!("query={:?} work={:?} offset={} limit={}", query, work, offset, limit);

        if query.is_empty() {
            return Response::BadRequest {
                message: "missing search query".to_string(),
            };
        }

        let Some(view) = self.registry.view(&work) else {
            warn!("requested work '{}' does not exist", work);
            return Response::NotFound { work };
        };

        self.stats.queries_served.fetch_add(1, Ordering::Relaxed);
        let key = (work, query);

        let cached = match self.cache.lock() {
            Ok(mut cache) => cache.get(&key).cloned(),
            Err(_) => None,
        };

        let (snippets, cached) = match cached {
            Some(snippets) => {
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                (snippets, true)
            }
            None => {
                self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

                // Search outside the cache lock
                let snippets = Arc::new(view.search(&key.1));
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(key, Arc::clone(&snippets));
                }
                (snippets, false)
            }
        };

        let take = if limit == 0 { usize::MAX } else { limit };
        Response::Results(SearchResponse {
            snippets: snippets.iter().skip(offset).take(take).cloned().collect(),
            total: snippets.len(),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            cached,
        })
    }

    fn handle_status(&self) -> Response {
        let corpus = self.registry.corpus();
        Response::Status(StatusResponse {
            uptime_secs: self.stats.start_time.elapsed().as_secs(),
            corpus_bytes: corpus.len(),
            corpus_lines: corpus.lines().line_count(),
            works: self.registry.work_names().len(),
            queries_served: self.stats.queries_served.load(Ordering::Relaxed),
            cache_hit_rate: self.stats.cache_hit_rate(),
        })
    }

    /// Unblock the accept loop so it can observe the shutdown flag
    fn wake_listener(&self) {
        let _ = UnixStream::connect(&self.socket_path);
    }
}
