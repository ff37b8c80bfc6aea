use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use shakesearch::index::Corpus;
use shakesearch::output;
use shakesearch::query::Registry;
use shakesearch::utils::{AppConfig, get_config_path, progress};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use termcolor::ColorChoice;

#[derive(Parser)]
#[command(name = "shakesearch")]
#[command(about = "Case-insensitive substring search over a text anthology")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the one in the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus file, overriding the config
    #[arg(short, long, global = true)]
    corpus: Option<PathBuf>,

    /// Only log warnings and errors, no spinner
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus directly (builds the index in-process)
    Search {
        /// Text to find (case-insensitive)
        #[arg(required = true)]
        query: Vec<String>,

        /// Restrict to one work ("all" for everything)
        #[arg(short, long, default_value = "")]
        work: String,

        /// Bytes of context on each side of a match
        #[arg(short = 'C', long)]
        context: Option<usize>,

        /// Show at most this many matches (0 = all)
        #[arg(short, long, default_value_t = 0)]
        limit: usize,

        /// Only print the number of matches
        #[arg(long)]
        count: bool,

        /// When to use colors
        #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
        color: ColorWhen,
    },
    /// Search through a running server
    #[cfg(unix)]
    Query {
        #[arg(required = true)]
        query: Vec<String>,

        #[arg(short, long, default_value = "")]
        work: String,

        /// Skip this many matches
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Show at most this many matches (0 = all)
        #[arg(short, long, default_value_t = 0)]
        limit: usize,

        /// Server socket
        #[arg(long)]
        socket: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
        color: ColorWhen,
    },
    /// Run the search server in the foreground
    #[cfg(unix)]
    Serve {
        #[arg(long)]
        socket: Option<PathBuf>,
    },
    /// Stop a running search server
    #[cfg(unix)]
    Stop {
        #[arg(long)]
        socket: Option<PathBuf>,
    },
    /// List configured works and whether they fit the corpus
    Works,
    /// Show corpus and index statistics
    Stats,
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the app data directory
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    fn choice(self) -> ColorChoice {
        match self {
            ColorWhen::Auto if std::io::stdout().is_terminal() => ColorChoice::Auto,
            ColorWhen::Auto | ColorWhen::Never => ColorChoice::Never,
            ColorWhen::Always => ColorChoice::Always,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env();
            config
        }
        None => AppConfig::load()?,
    };
    if let Some(corpus) = &cli.corpus {
        config.corpus_path = corpus.clone();
    }

    match cli.command {
        Commands::Search {
            query,
            work,
            context,
            limit,
            count,
            color,
        } => {
            if let Some(context) = context {
                config.context_width = context;
            }
            let registry = load_registry(&config, cli.quiet)?;
            run_search(&registry, &work, &query.join(" "), limit, count, color.choice())?;
        }
        #[cfg(unix)]
        Commands::Query {
            query,
            work,
            offset,
            limit,
            socket,
            color,
        } => {
            let socket = socket_path(socket, &config);
            run_query(&socket, &work, &query.join(" "), offset, limit, color.choice())?;
        }
        #[cfg(unix)]
        Commands::Serve { socket } => {
            let socket = socket_path(socket, &config);
            if shakesearch::server::is_server_running(&socket) {
                bail!("a server is already listening on {}", socket.display());
            }
            let registry = Arc::new(load_registry(&config, cli.quiet)?);
            shakesearch::server::SearchServer::new(registry, socket).run()?;
        }
        #[cfg(unix)]
        Commands::Stop { socket } => {
            let socket = socket_path(socket, &config);
            match shakesearch::server::SearchClient::connect(&socket) {
                Ok(mut client) => {
                    client.shutdown()?;
                    println!("Server stopped");
                }
                Err(shakesearch::server::ClientError::NotRunning) => {
                    println!("Server is not running");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Works => {
            let registry = load_registry(&config, cli.quiet)?;
            show_works(&config, &registry);
        }
        Commands::Stats => {
            let registry = load_registry(&config, cli.quiet)?;
            show_stats(&config, &registry);
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                let path = config.save()?;
                println!("Saved to {}", path.display());
            } else {
                debug!("config path: {}", get_config_path()?.display());
            }
        }
    }

    Ok(())
}

/// Load the corpus and build one view per configured work
fn load_registry(config: &AppConfig, quiet: bool) -> Result<Registry> {
    let threads = config.effective_index_threads();
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        debug!("keeping existing thread pool: {}", e);
    }

    let spinner = progress::spinner("Indexing corpus...", quiet);
    let corpus = Corpus::load(&config.corpus_path);
    spinner.finish_and_clear();

    let corpus = corpus.with_context(|| {
        format!(
            "Failed to load corpus (set --corpus or {})",
            shakesearch::utils::CORPUS_ENV
        )
    })?;

    let registry = Registry::new(corpus, &config.works, config.context_width);
    info!(
        "{} of {} works registered",
        registry.work_names().len(),
        config.works.len()
    );
    Ok(registry)
}

fn run_search(
    registry: &Registry,
    work: &str,
    query: &str,
    limit: usize,
    count: bool,
    choice: ColorChoice,
) -> Result<()> {
    if query.is_empty() {
        bail!("missing search query");
    }

    let Some(view) = registry.view(work) else {
        bail!("work '{}' does not exist (see `shakesearch works`)", work);
    };

    let work_label = if work.is_empty() { shakesearch::query::ALL_WORKS } else { work };

    if count {
        output::print_count(work_label, view.count(query), choice)?;
        return Ok(());
    }

    let mut snippets = view.search_snippets(query);
    info!("{} matches for {:?} in {}", snippets.len(), query, work_label);
    if limit > 0 {
        snippets.truncate(limit);
    }

    output::print_snippets(&snippets, query.len(), Some(view.corpus().lines()), choice)?;
    Ok(())
}

#[cfg(unix)]
fn socket_path(flag: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    flag.or_else(|| config.socket_path.clone())
        .unwrap_or_else(shakesearch::server::get_socket_path)
}

#[cfg(unix)]
fn run_query(
    socket: &std::path::Path,
    work: &str,
    query: &str,
    offset: usize,
    limit: usize,
    choice: ColorChoice,
) -> Result<()> {
    let mut client = shakesearch::server::SearchClient::connect(socket)
        .with_context(|| format!("No server on {}; start one with `shakesearch serve`", socket.display()))?;

    let results = client.search_page(work, query, offset, limit)?;
    info!(
        "{} of {} matches in {:.2}ms{}",
        results.snippets.len(),
        results.total,
        results.duration_ms,
        if results.cached { " (cached)" } else { "" }
    );
    output::print_texts(&results.snippets, choice)?;
    Ok(())
}

fn show_works(config: &AppConfig, registry: &Registry) {
    println!("Works");
    println!("=====");
    println!();

    for (name, range) in &config.works {
        let status = match registry.view(name) {
            Some(view) => format!("bytes {}..{}", view.bound().start, view.bound().end),
            None => "[does not fit corpus]".to_string(),
        };
        println!(
            "  {:24} lines {:>7}..{:<7} {}",
            name, range.start_line, range.end_line, status
        );
    }

    for (name, err) in registry.rejected() {
        debug!("{}: {}", name, err);
    }
}

fn show_stats(config: &AppConfig, registry: &Registry) {
    let stats = registry.corpus().stats();

    println!("Corpus Statistics");
    println!("=================");
    println!();
    println!("Corpus file:      {}", config.corpus_path.display());
    println!("Size:             {}", format_size(stats.bytes));
    println!("Lines:            {}", stats.lines);
    println!("Memory mapped:    {}", stats.memory_mapped);
    println!("Suffixes:         {}", stats.suffix_array.suffix_count);
    println!("Doubling rounds:  {}", stats.suffix_array.doubling_rounds);
    println!("Works:            {}", registry.work_names().len());
    println!("Context width:    {} bytes", config.context_width);
}

fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes)
    }
}
