use clap::{Parser, Subcommand};
use folio_ui::config;
use folio_ui::interactivity::Interactivity;
use folio_ui::output;
use folio_ui::page::Environment;
use folio_ui::render;
use folio_ui::simulate::{self, Session};
use folio_ui::store::{JsonFileStore, KeyValueStore, MemoryStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that replay events on a page.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Page description (JSON)
    #[arg(long)]
    page: PathBuf,

    /// Event script to replay (JSON array)
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "folio-ui")]
#[command(about = "Headless interactivity engine for portfolio pages")]
#[command(long_about = "\
Headless interactivity engine for portfolio pages

Binds the behaviors of a single-page portfolio (nav toggle, smooth scroll,
copyright year, contact form, reveal on scroll, active section, and the
optional dark mode and project filter) to a page described in JSON, then
replays visitor events against it.

Page description:

  {
    \"title\": \"Jane Doe\",
    \"viewport\": { \"scroll_y\": 0, \"width\": 1280, \"height\": 800 },
    \"elements\": [
      { \"tag\": \"button\", \"class\": \"nav-toggle\" },
      { \"tag\": \"section\", \"id\": \"about\", \"rect\": { \"top\": 800, \"height\": 600 } }
    ]
  }

Event script:

  [
    { \"type\": \"click\", \"target\": \".nav-toggle\" },
    { \"type\": \"scroll\", \"y\": 900 },
    { \"type\": \"submit\", \"target\": \".contact-form\", \"fields\": { \"name\": \"A\" } }
  ]

Run 'folio-ui gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// JSON file backing persisted preferences (in memory when omitted)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Report a system preference for the dark color scheme
    #[arg(long, global = true)]
    prefers_dark: bool,

    /// Year written into the copyright element (defaults to the current year)
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay an event script and print every effect
    Simulate(PageArgs),
    /// Replay an event script and print the resulting HTML
    Render(PageArgs),
    /// List which behaviors bind to a page
    Check {
        /// Page description (JSON)
        #[arg(long)]
        page: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let env = Environment {
        current_year: cli.year.unwrap_or_else(|| Environment::detect().current_year),
        prefers_dark: cli.prefers_dark,
    };

    match &cli.command {
        Command::Simulate(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let (session, steps) = replay(args, open_store(cli.store.as_deref())?, &config, &env)?;
            output::print_simulation(
                session.document(),
                session.initial(),
                &steps,
                &session.summary(),
            );
        }
        Command::Render(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let (session, _) = replay(args, open_store(cli.store.as_deref())?, &config, &env)?;
            println!("{}", render::render_document(session.document()).into_string());
        }
        Command::Check { page } => {
            let config = config::load_config(&cli.config_dir)?;
            let spec = simulate::load_page(page)?;
            let doc = folio_ui::dom::MemoryDocument::from_spec(&spec);
            let store = open_store(cli.store.as_deref())?;
            let setup = Interactivity::setup(&doc, store.as_ref(), &config, &env)?;
            let bound: Vec<_> = setup.handles.iter().map(|h| h.behavior()).collect();
            output::print_check(&bound);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn replay(
    args: &PageArgs,
    store: Box<dyn KeyValueStore>,
    config: &config::UiConfig,
    env: &Environment,
) -> Result<(Session, Vec<simulate::Step>), simulate::PageError> {
    let spec = simulate::load_page(&args.page)?;
    let script = match &args.events {
        Some(path) => simulate::load_script(path)?,
        None => Vec::new(),
    };
    let mut session = Session::start(&spec, store, config, env)?;
    let steps = session.run(&script)?;
    Ok((session, steps))
}

fn open_store(path: Option<&Path>) -> Result<Box<dyn KeyValueStore>, folio_ui::store::StoreError> {
    let store: Box<dyn KeyValueStore> = match path {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };
    Ok(store)
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
