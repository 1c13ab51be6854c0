mod display;
mod export;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use penwise_ai::{AiConfig, OpenAiClient, RemoteChecker};
use penwise_check::ApplyOutcome;
use penwise_core::{
    AcademicStyle, CheckingMode, Document, DocumentUpdate, LanguageVariant, WritingMode,
    WritingSettings,
};
use penwise_editor::EditorSession;
use penwise_store::{DocumentStore, FileStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "penwise", version)]
#[command(about = "Grammar, style and readability checks for your writing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding stored documents and feedback
    #[arg(long, global = true, env = "PENWISE_DATA_DIR", default_value = ".penwise")]
    data_dir: PathBuf,

    /// Owner id for stored documents and feedback
    #[arg(long, global = true, env = "PENWISE_USER", default_value = "local")]
    user: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the local rule checker over a file (`-` for stdin)
    Check {
        file: PathBuf,
        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply every local suggestion to a file
    Fix {
        file: PathBuf,
        /// Overwrite the file instead of printing the result
        #[arg(long)]
        write: bool,
    },

    /// Statistics, scores and tone for a file
    Analyze {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Ask a hosted language model for suggestions
    AiCheck {
        file: PathBuf,
        #[command(flatten)]
        settings: SettingsArgs,
        #[command(flatten)]
        ai: AiArgs,
        #[arg(long)]
        json: bool,
    },

    /// Manage stored documents
    #[command(subcommand)]
    Doc(DocCommand),

    /// Write a stored document, or its report, as plain text
    Export {
        id: Uuid,
        /// Export the analysis report instead of the text
        #[arg(long)]
        report: bool,
        /// Output path; defaults to a name derived from the title
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum DocCommand {
    /// Create a document, optionally seeded from a file
    New {
        title: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List your documents, most recently updated first
    #[command(alias = "ls")]
    List,
    Show {
        id: Uuid,
    },
    /// Change a document's title or replace its content from a file
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    #[command(alias = "rm")]
    Delete {
        id: Uuid,
    },
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// none, mla, apa, chicago, harvard
    #[arg(long, default_value = "none")]
    academic_style: AcademicStyle,
    /// american, british, canadian, australian
    #[arg(long, default_value = "american")]
    language: LanguageVariant,
    /// speed, standard, comprehensive
    #[arg(long, default_value = "standard")]
    checking_mode: CheckingMode,
    /// academic, business, casual, creative, technical
    #[arg(long, default_value = "business")]
    writing_mode: WritingMode,
    /// Only report high-severity grammar and spelling errors
    #[arg(long)]
    critical_only: bool,
}

impl From<&SettingsArgs> for WritingSettings {
    fn from(args: &SettingsArgs) -> Self {
        Self {
            academic_style: args.academic_style,
            language_variant: args.language,
            checking_mode: args.checking_mode,
            writing_mode: args.writing_mode,
            critical_errors_only: args.critical_only,
        }
    }
}

#[derive(Args, Debug)]
struct AiArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "PENWISE_MODEL", default_value = penwise_ai::DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "PENWISE_API_BASE", default_value = penwise_ai::DEFAULT_BASE_URL)]
    api_base: String,
    /// Seconds before the request is abandoned
    #[arg(long, env = "PENWISE_AI_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

impl AiArgs {
    fn config(&self) -> anyhow::Result<AiConfig> {
        let Some(api_key) = self.api_key.clone() else {
            bail!("no API key: pass --api-key or set OPENAI_API_KEY");
        };
        Ok(AiConfig {
            base_url: self.api_base.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..AiConfig::new(api_key)
        })
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn open_store(cli: &Cli) -> anyhow::Result<FileStore> {
    FileStore::open(&cli.data_dir)
        .with_context(|| format!("opening store at {}", cli.data_dir.display()))
}

/// Apply every local suggestion, last first so earlier offsets stay valid.
fn fix_text(owner: &str, name: &str, text: &str) -> (String, usize) {
    let mut doc = Document::new(owner, name);
    doc.content = text.to_string();
    let mut session = EditorSession::new(doc, WritingSettings::default(), Default::default());
    let ids: Vec<String> = session
        .run_local_check()
        .iter()
        .rev()
        .map(|s| s.id.clone())
        .collect();

    let mut applied = 0;
    for id in ids {
        if let Ok(ApplyOutcome::Applied { .. }) = session.apply_suggestion(&id) {
            applied += 1;
        }
    }
    (session.document().content.clone(), applied)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check { file, json } => {
            let text = read_input(file)?;
            let suggestions = penwise_check::check(&text);
            if *json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                display::print_suggestions(&text, &suggestions);
            }
        }

        Commands::Fix { file, write } => {
            let text = read_input(file)?;
            let (fixed, applied) = fix_text(&cli.user, &file.display().to_string(), &text);
            if *write && file.as_os_str() != "-" {
                std::fs::write(file, &fixed)
                    .with_context(|| format!("writing {}", file.display()))?;
                eprintln!("Applied {applied} fix(es) to {}", file.display());
            } else {
                print!("{fixed}");
                eprintln!("Applied {applied} fix(es)");
            }
        }

        Commands::Analyze { file, json } => {
            let text = read_input(file)?;
            let report = penwise_check::analyze(&text);
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_report(&report);
            }
        }

        Commands::AiCheck {
            file,
            settings,
            ai,
            json,
        } => {
            let text = read_input(file)?;
            let config = ai.config()?;
            let timeout = config.timeout;
            let client = OpenAiClient::new(config).context("building completion client")?;
            let checker = RemoteChecker::with_timeout(client, timeout);

            // Feedback only biases the prompt; a missing store is not an error.
            let feedback = FileStore::open(&cli.data_dir)
                .and_then(|store| store.feedback(&cli.user))
                .ok()
                .filter(|f| !f.is_empty());
            debug!(has_feedback = feedback.is_some(), "loaded feedback");

            let settings = WritingSettings::from(settings);
            let suggestions = checker.check(&text, &settings, feedback.as_ref()).await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                display::print_suggestions(&text, &suggestions);
            }
        }

        Commands::Doc(cmd) => {
            let mut store = open_store(&cli)?;
            match cmd {
                DocCommand::New { title, file } => {
                    let doc = store.create_document(&cli.user, title)?;
                    let doc = match file {
                        Some(path) => {
                            let content = read_input(path)?;
                            store.update_document(doc.id, &DocumentUpdate::content(content))?
                        }
                        None => doc,
                    };
                    info!(id = %doc.id, "document created");
                    println!("{}", doc.id);
                }
                DocCommand::List => {
                    display::print_document_list(&store.list_documents(&cli.user)?);
                }
                DocCommand::Show { id } => {
                    display::print_document(&store.get_document(*id)?);
                }
                DocCommand::Edit { id, title, file } => {
                    let update = DocumentUpdate {
                        title: title.clone(),
                        content: file.as_deref().map(read_input).transpose()?,
                    };
                    if update.is_empty() {
                        bail!("nothing to change: pass --title and/or --file");
                    }
                    let doc = store.update_document(*id, &update)?;
                    println!("Updated {} ({})", doc.title, doc.id);
                }
                DocCommand::Delete { id } => {
                    store.delete_document(*id)?;
                    println!("Deleted {id}");
                }
            }
        }

        Commands::Export { id, report, out } => {
            let store = open_store(&cli)?;
            let doc = store.get_document(*id)?;
            let body = if *report {
                export::render_report(&doc.title, &penwise_check::analyze(&doc.content))
            } else {
                export::render_document(&doc.title, &doc.content)
            };
            let path = out
                .clone()
                .unwrap_or_else(|| export::default_file_name(&doc.title, *report));
            export::write_export(&path, &body)?;
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!("penwise v{}", env!("CARGO_PKG_VERSION"));

    run(Cli::parse()).await
}
