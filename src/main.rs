mod display;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oeuvreguard::api::types::{GENRES, LANGUES};
use oeuvreguard::api::{
    ApiClient, ApiError, Credentials, NewUser, OeuvreApi, PlagiarismInput, UploadForm,
};
use oeuvreguard::config::{Config, API_URL_ENV};
use oeuvreguard::listing::{self, Paginator};
use oeuvreguard::receipts::{self, ArtifactStore, Receipt, ReceiptIndex, ReceiptKind, Submission};
use oeuvreguard::session::{SessionContext, SessionStore};
use oeuvreguard::users::UserDirectory;

/// Most receipts a search returns before client-side paging.
const RECEIPT_SEARCH_LIMIT: usize = 500;

#[derive(Parser)]
#[command(name = "oeuvreguard", version, about = "Register creative works and check them for plagiarism")]
struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and OEUVREGUARD_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the current session
    Whoami,
    /// Ask for a password-reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Register a work and obtain its fingerprint and certificate
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// texte, musique, art, video, logiciel, autre
        #[arg(long)]
        genre: String,
        /// fr, en, moore, dioula, fulfulde, autre
        #[arg(long)]
        language: String,
        file: PathBuf,
        /// Download the certificate into the artifacts directory
        #[arg(long)]
        save_certificate: bool,
    },
    /// Run a plagiarism check on text or a file
    #[command(group(ArgGroup::new("input").required(true).args(["text", "file"])))]
    Check {
        /// Text to check; `-` reads standard input
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Download the report into the artifacts directory
        #[arg(long)]
        save_report: bool,
    },
    /// List registered works
    Works {
        /// Case-insensitive match on title or author
        #[arg(long, default_value = "")]
        search: String,
        /// Exact work type, e.g. Musique or Texte
        #[arg(long = "type")]
        type_filter: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Also print totals per type
        #[arg(long)]
        stats: bool,
    },
    /// List prior plagiarism analyses
    Analyses {
        #[arg(long, default_value = "")]
        search: String,
        /// Exact author name
        #[arg(long)]
        author: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Also print the AI score distribution
        #[arg(long)]
        histogram: bool,
        /// Print the distinct authors instead of the table
        #[arg(long)]
        authors: bool,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Uploads and analyses made from this machine
    Receipts {
        /// Show every field of one receipt
        #[arg(long, value_name = "ID", conflicts_with_all = ["search", "kind"])]
        show: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        kind: Option<ReceiptKind>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
enum UserCommand {
    List {
        /// Case-insensitive match on name or email
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print the JSON schema of config.toml
    Schema,
}

struct App {
    config: Config,
    session: SessionContext,
}

impl App {
    fn open(config: Config) -> Result<Self> {
        let store = SessionStore::new(config.session_path()?);
        let session = SessionContext::open(store, config.session_ttl())?;
        Ok(Self { config, session })
    }

    fn anonymous_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config.api.base_url, self.config.timeout())
            .context("Failed to build HTTP client")
    }

    /// Sends the session token when there is one.
    fn client(&mut self) -> Result<ApiClient> {
        let client = self.anonymous_client()?;
        let client = match self.session.current() {
            Some(s) => client.with_token(&s.token_type, &s.token),
            None => client,
        };
        if !client.is_authenticated() {
            info!("no session, request goes out without a token");
        }
        Ok(client)
    }

    /// For the administration views: a live session is mandatory.
    fn privileged_client(&mut self) -> Result<ApiClient> {
        let client = self.anonymous_client()?;
        let session = self.session.require()?;
        Ok(client.with_token(&session.token_type, &session.token))
    }

    fn receipts(&self) -> Result<ReceiptIndex> {
        ReceiptIndex::new(&self.config.data_dir()?)
    }

    fn artifacts(&self) -> Result<ArtifactStore> {
        let dir = self.config.artifacts_dir()?;
        Ok(ArtifactStore::new(&dir.to_string_lossy()))
    }

    async fn save_artifact(&self, client: &ApiClient, locator: &str, what: &str) -> Result<()> {
        let bytes = client.download(locator).await?;
        let (_, path) = self.artifacts()?.store(locator, &bytes).await?;
        println!("  {what} enregistré: {}", path.display());
        Ok(())
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ApiError>() {
            Some(api) => display::error(api.user_message()),
            None => display::error(&format!("{e:#}")),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "oeuvreguard", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?
        .with_overrides(std::env::var(API_URL_ENV).ok(), cli.api_url);
    let mut app = App::open(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("Mot de passe")
                    .interact()?,
            };
            let resp = app
                .anonymous_client()?
                .login(&Credentials { email, password })
                .await?;
            match app.session.establish(&resp)? {
                Some(session) => println!(
                    "{} Connecté{}",
                    style("✔").green(),
                    session
                        .email
                        .as_deref()
                        .map(|e| format!(" ({e})"))
                        .unwrap_or_default()
                ),
                None => println!(
                    "{} Connecté, mais le serveur n'a renvoyé aucun jeton",
                    style("!").yellow()
                ),
            }
        }

        Commands::Logout => {
            app.session.clear()?;
            println!("{} Déconnecté", style("✔").green());
        }

        Commands::Whoami => match app.session.current() {
            Some(s) => {
                println!("Email:       {}", s.email.as_deref().unwrap_or("-"));
                println!("Utilisateur: {}", s.user_id.as_deref().unwrap_or("-"));
                println!("Depuis:      {}", s.issued_at.to_rfc3339());
            }
            None => println!("Non connecté"),
        },

        Commands::ForgotPassword { email } => {
            let resp = app.anonymous_client()?.forgot_password(&email).await?;
            if resp.message.is_some() {
                println!(
                    "{} Un lien de réinitialisation a été envoyé à votre adresse email.",
                    style("✔").green()
                );
            } else {
                println!("{}", style("Demande transmise, aucune confirmation reçue.").dim());
            }
        }

        Commands::Upload {
            title,
            author,
            genre,
            language,
            file,
            save_certificate,
        } => {
            if !GENRES.contains(&genre.as_str()) {
                warn!(genre = %genre, "genre is not one of the form choices");
            }
            if !LANGUES.contains(&language.as_str()) {
                warn!(langue = %language, "language is not one of the form choices");
            }
            let attachment = receipts::load_attachment(&file).await?;
            let submission = Submission::of_attachment(&attachment);
            let form = UploadForm {
                titre: title,
                auteur: author.clone(),
                genre,
                langue: language,
                fichier: attachment,
            };

            let client = app.client()?;
            let result = client.upload_work(form).await?;
            let certificate_url = client.artifact_url(&result.certificat_url);

            let recorded = app.receipts().and_then(|index| {
                index.record_upload(&submission, &author, &result, &certificate_url)
            });
            let fingerprint_match = match recorded {
                Ok(receipt) => receipt.fingerprint_matches_local(),
                Err(e) => {
                    warn!(error = %e, "could not record upload receipt");
                    None
                }
            };
            display::upload_result(&result, &certificate_url, fingerprint_match);

            if save_certificate {
                app.save_artifact(&client, &result.certificat_url, "Certificat")
                    .await?;
            }
        }

        Commands::Check {
            text,
            file,
            save_report,
        } => {
            let input = match (text, file) {
                (Some(t), None) if t == "-" => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read standard input")?;
                    PlagiarismInput::Text(buf)
                }
                (Some(t), None) => PlagiarismInput::Text(t),
                (None, Some(path)) => PlagiarismInput::File(receipts::load_attachment(&path).await?),
                _ => bail!("Choisissez --text ou --file"),
            };
            let submission = Submission::of_input(&input);

            let client = app.client()?;
            let result = client.check_plagiarism(input).await?;
            let report_url = client.artifact_url(&result.rapport_pdf);

            if let Err(e) = app
                .receipts()
                .and_then(|index| index.record_analysis(&submission, &result, &report_url))
            {
                warn!(error = %e, "could not record analysis receipt");
            }
            display::analysis_result(&result, &report_url);

            if save_report {
                app.save_artifact(&client, &result.rapport_pdf, "Rapport")
                    .await?;
            }
        }

        Commands::Works {
            search,
            type_filter,
            page,
            stats,
        } => {
            let client = app.privileged_client()?;
            let works = client.list_works().await?;
            let filtered =
                listing::filter_works(&works, &search, type_filter.as_deref().unwrap_or(""));
            let pager =
                Paginator::new(filtered.len(), app.config.listing.works_page_size).at_page(page);
            print!("{}", display::works_table(pager.slice(&filtered)));
            println!("{}", display::pagination_footer(&pager));
            if stats {
                println!();
                print!("{}", display::work_stats(&listing::work_stats(&works)));
            }
        }

        Commands::Analyses {
            search,
            author,
            page,
            histogram,
            authors,
        } => {
            let client = app.privileged_client()?;
            let records = client.list_plagiarism_records().await?;
            if authors {
                for a in listing::distinct_authors(&records) {
                    println!("{a}");
                }
                return Ok(());
            }
            let filtered = listing::filter_plagiarism_records(
                &records,
                &search,
                author.as_deref().unwrap_or(""),
            );
            let pager = Paginator::new(filtered.len(), app.config.listing.plagiarism_page_size)
                .at_page(page);
            print!("{}", display::plagiarism_table(pager.slice(&filtered)));
            println!("{}", display::pagination_footer(&pager));
            if histogram {
                println!();
                print!("{}", display::histogram(&listing::ai_score_histogram(&records)));
            }
        }

        Commands::Users { action } => {
            let client = app.privileged_client()?;
            let mut directory = UserDirectory::new(&client);
            match action {
                UserCommand::List { search, page } => {
                    let users = directory.load().await?;
                    let filtered = listing::filter_users(users, &search);
                    let pager = Paginator::new(filtered.len(), app.config.listing.users_page_size)
                        .at_page(page);
                    print!("{}", display::users_table(pager.slice(&filtered)));
                    println!("{}", display::pagination_footer(&pager));
                }
                UserCommand::Add { name, email, role } => {
                    let created = directory.create(NewUser { name, email, role }).await?;
                    print!("{}", display::users_table(&[created]));
                }
                UserCommand::Update {
                    id,
                    name,
                    email,
                    role,
                } => {
                    directory.load().await?;
                    let mut user = directory
                        .get(id)
                        .cloned()
                        .with_context(|| format!("Utilisateur {id} introuvable"))?;
                    if let Some(name) = name {
                        user.name = name;
                    }
                    if let Some(email) = email {
                        user.email = email;
                    }
                    if let Some(role) = role {
                        user.role = role;
                    }
                    let updated = directory.update(&user).await?;
                    print!("{}", display::users_table(&[&updated]));
                }
                UserCommand::Delete { id } => {
                    directory.remove(id).await?;
                    println!("{} Utilisateur {id} supprimé", style("✔").green());
                }
            }
        }

        Commands::Receipts {
            show,
            search,
            kind,
            page,
        } => {
            let index = app.receipts()?;
            if let Some(id) = show {
                let receipt = index
                    .get(&id)?
                    .with_context(|| format!("Reçu {id} introuvable"))?;
                print!("{}", display::receipt_detail(&receipt));
                return Ok(());
            }
            let page_size = app.config.listing.receipts_page_size;
            match search {
                Some(term) => {
                    let hits = index.search(&term, RECEIPT_SEARCH_LIMIT)?;
                    let hits: Vec<&Receipt> = hits
                        .iter()
                        .filter(|r| kind.is_none_or(|k| r.kind == k))
                        .collect();
                    let pager = Paginator::new(hits.len(), page_size).at_page(page);
                    print!("{}", display::receipts_table(pager.slice(&hits)));
                    println!("{}", display::pagination_footer(&pager));
                }
                None => {
                    let total = index.list(0, 0, kind)?.total;
                    let pager = Paginator::new(total, page_size).at_page(page);
                    let range = pager.range();
                    let listed = index.list(range.start, range.len(), kind)?;
                    let rows: Vec<&Receipt> = listed.receipts.iter().collect();
                    print!("{}", display::receipts_table(&rows));
                    println!("{}", display::pagination_footer(&pager));
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigCommand::Show => print!("{}", app.config.to_toml()?),
            ConfigCommand::Schema => {
                println!("{}", serde_json::to_string_pretty(&Config::json_schema())?)
            }
        },

        Commands::Completions { .. } => unreachable!("handled before config is loaded"),
    }

    Ok(())
}
