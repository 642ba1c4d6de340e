//! CLI entry point for portfolio-ssg

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_ssg::commands::new::EntryKind;
use portfolio_ssg::Portfolio;

#[derive(Parser)]
#[command(name = "portfolio-ssg")]
#[command(author = "Jack Luo")]
#[command(version)]
#[command(about = "A static site generator for a CMS-backed developer portfolio", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new portfolio site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Scaffold a new blog post, project or toy
    New {
        /// Kind of entry
        #[arg(value_enum)]
        kind: EntryKind,

        /// File name, also used in the URL
        slug: String,

        /// Title (derived from the slug when omitted)
        title: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Serve the existing public folder without rebuilding or watching
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site content
    List {
        /// Type of content (posts, projects, toys, experience, education, skills, settings)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Search the command palette
    Palette {
        /// Search text; empty lists every command
        #[arg(default_value = "")]
        query: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "portfolio_ssg=debug,info"
    } else {
        "portfolio_ssg=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing portfolio in {:?}", target_dir);
            portfolio_ssg::commands::init::init_site(&target_dir)?;
            println!("Initialized portfolio in {:?}", target_dir);
        }

        Commands::New { kind, slug, title } => {
            let portfolio = Portfolio::new(&base_dir)?;
            let path = portfolio.new_entry(kind, &slug, title.as_deref())?;
            println!("Created {}", path.display());
        }

        Commands::Generate { watch } => {
            let portfolio = Portfolio::new(&base_dir)?;
            tracing::info!("Generating static files...");

            portfolio.generate().await?;
            println!("Generated successfully!");

            if watch {
                portfolio_ssg::commands::generate::watch(&portfolio).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let portfolio = Portfolio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            portfolio_ssg::server::start(&portfolio, &ip, port, r#static, open).await?;
        }

        Commands::Clean => {
            let portfolio = Portfolio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            portfolio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let portfolio = Portfolio::new(&base_dir)?;
            portfolio_ssg::commands::list::run(&portfolio, &r#type).await?;
        }

        Commands::Palette { query } => {
            let portfolio = Portfolio::new(&base_dir)?;
            portfolio_ssg::commands::palette::run(&portfolio, &query).await?;
        }

        Commands::Version => {
            println!("portfolio-ssg version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
