//! CLI entry point for platform-host

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "platform-host")]
#[command(version)]
#[command(about = "Serve a pre-built HTML platform inside a host page", long_about = None)]
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
    /// Write a default _platform.yml
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,

        /// Single calculator page with no fallback document
        #[arg(long)]
        basic: bool,
    },

    /// Render the host page once
    #[command(alias = "r")]
    Render {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which document would be embedded
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the host server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Disable live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "platform_host=debug,info"
    } else {
        "platform_host=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder, basic } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing host directory {:?}", target_dir);
            platform_host::commands::init::init_site(&target_dir, basic)?;
            println!("Initialized platform host in {:?}", target_dir);
        }

        Commands::Render { output } => {
            let platform = platform_host::Platform::new(&base_dir)?;
            platform_host::commands::render::run(&platform, output.as_deref())?;
        }

        Commands::Check { json } => {
            let platform = platform_host::Platform::new(&base_dir)?;
            if !platform_host::commands::check::run(&platform, json)? {
                std::process::exit(1);
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let platform = platform_host::Platform::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            platform_host::server::start(&platform, &ip, port, !r#static, open).await?;
        }

        Commands::Version => {
            println!("platform-host version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
