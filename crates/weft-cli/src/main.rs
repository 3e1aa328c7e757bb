use clap::{Parser, Subcommand};
use weft::{
    commands::{cache, config, generate, init, manifests, patch},
    logger, GlobalOpts,
};

#[derive(Parser)]
#[command(name = "weft")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Declarative UI compiler",
    long_about = "Weft compiles component manifests, page ASTs, and a project config into loadable Vue components, with incremental patch-driven rebuilds."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new weft project (manifests, project config, starter pages)
    Init {
        /// Target directory (default: current directory)
        dir: Option<String>,
    },
    /// Compile the project into loadable artifacts
    Generate {
        /// Project directory (default: current directory)
        #[arg(long)]
        project: Option<String>,
        /// Ignore the cache and rebuild everything
        #[arg(long)]
        force: bool,
    },
    /// Apply a patch batch to a stored document, then regenerate
    Patch {
        /// Project directory (default: current directory)
        #[arg(long)]
        project: Option<String>,
        /// Patch the named page's AST
        #[arg(long, conflicts_with = "config")]
        page: Option<String>,
        /// Patch the project config
        #[arg(long)]
        config: bool,
        /// Patch file (JSON array of operations); reads stdin when omitted
        file: Option<String>,
    },
    /// List loaded component manifests
    Manifests {
        /// Project directory (default: current directory)
        #[arg(long)]
        project: Option<String>,
    },
    /// Inspect or clean the generation cache
    #[command(subcommand_required = true)]
    Cache {
        #[command(subcommand)]
        action: cache::CacheAction,
    },
    /// Configure the weft tool
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<config::ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    // library diagnostics go through tracing; opt in with WEFT_LOG=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("WEFT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let outcome = match cli.command {
        Commands::Init { dir } => init::handle_init(dir, &cli.global),
        Commands::Generate { project, force } => {
            generate::handle_generate(project.as_deref(), force, &cli.global)
        }
        Commands::Patch {
            project,
            page,
            config,
            file,
        } => patch::handle_patch(
            project.as_deref(),
            page.as_deref(),
            config,
            file.as_deref(),
            &cli.global,
        ),
        Commands::Manifests { project } => {
            manifests::handle_manifests(project.as_deref(), &cli.global)
        }
        Commands::Cache { action } => cache::handle_cache(&action, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = outcome {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
