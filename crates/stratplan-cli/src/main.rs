mod config;
mod doc_cmds;
mod phase_cmds;
mod store;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use config::{SeedStrategy, StratplanConfig};
use store::DocumentStore;

#[derive(Parser)]
#[command(name = "stratplan", about = "Strategic plan authoring engine")]
struct Cli {
    /// Documents directory (overrides STRATPLAN_DOCUMENTS_DIR env var)
    #[arg(long, global = true)]
    documents_dir: Option<PathBuf>,

    /// Identity seed: clock, random, or an integer (overrides STRATPLAN_ID_SEED)
    #[arg(long, global = true)]
    seed: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a stratplan config file from --documents-dir and --seed
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create a new, empty plan document
    New {
        /// Plan title
        title: String,
    },
    /// List the planning phases (marks completed ones when given a document)
    Phases {
        /// Document ID or snapshot path
        document: Option<String>,
    },
    /// Print the generation prompt for a phase
    Prompt {
        /// Document ID or snapshot path
        document: String,
        /// Phase id, canonical key, or number
        phase: String,
    },
    /// Print the advisory reply schema for a phase
    Schema {
        /// Phase id, canonical key, or number
        phase: String,
    },
    /// Normalize a saved reply and apply it to a document
    Apply {
        /// Document ID or snapshot path
        document: String,
        /// Phase id, canonical key, or number
        phase: String,
        /// File holding the raw reply (JSON, or text with a fenced JSON block)
        #[arg(long)]
        reply: PathBuf,
        /// Print the normalized update without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a document, or one branch of it, as JSON
    Show {
        /// Document ID or snapshot path
        document: String,
        /// Only this branch (phase id, canonical key, or number)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Show phase progress (omit document to list all documents)
    Status {
        /// Document ID or snapshot path
        document: Option<String>,
    },
    /// List the branches that differ between two documents
    Diff {
        /// Document ID or snapshot path
        left: String,
        /// Document ID or snapshot path
        right: String,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

/// Execute the `stratplan init` command: write config file.
fn cmd_init(documents_dir: Option<PathBuf>, seed: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let seed: SeedStrategy = match seed {
        Some(s) => s.parse()?,
        None => SeedStrategy::default(),
    };
    let documents_dir = documents_dir.unwrap_or_else(config::default_documents_dir);

    let cfg = config::ConfigFile {
        storage: config::StorageSection {
            documents_dir: Some(documents_dir.clone()),
        },
        identity: config::IdentitySection {
            seed: seed.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  storage.documents_dir = {}", documents_dir.display());
    println!("  identity.seed = {seed}");
    println!();
    println!("Next: run `stratplan new <title>` to start a plan.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that need no resolved config.
    match &cli.command {
        Commands::Init { force } => {
            return cmd_init(cli.documents_dir.clone(), cli.seed.as_deref(), *force);
        }
        Commands::Schema { phase } => return phase_cmds::run_schema(phase),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "stratplan", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let resolved = StratplanConfig::resolve(cli.documents_dir.as_deref(), cli.seed.as_deref())?;
    let store = DocumentStore::new(&resolved.documents_dir);

    match cli.command {
        Commands::New { title } => doc_cmds::run_new(&store, &title)?,
        Commands::Phases { document } => {
            let document = match document {
                Some(doc_ref) => Some(store.resolve(&doc_ref)?.document),
                None => None,
            };
            phase_cmds::run_phases(document.as_ref())?;
        }
        Commands::Prompt { document, phase } => phase_cmds::run_prompt(&store, &document, &phase)?,
        Commands::Apply {
            document,
            phase,
            reply,
            dry_run,
        } => {
            let options = phase_cmds::ApplyOptions {
                reply: &reply,
                dry_run,
            };
            phase_cmds::run_apply(&store, &document, &phase, resolved.seed.seed(), &options)
                .await?;
        }
        Commands::Show { document, branch } => {
            doc_cmds::run_show(&store, &document, branch.as_deref())?
        }
        Commands::Status { document } => doc_cmds::run_status(&store, document.as_deref())?,
        Commands::Diff { left, right } => doc_cmds::run_diff(&store, &left, &right)?,
        Commands::Init { .. } | Commands::Schema { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
