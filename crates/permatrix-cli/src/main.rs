//! CLI entry point for permatrix.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `permatrix-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use permatrix_app::{
    CapabilityService, EditError, GateRequest, PolicyEditor, RawIdentity, RecordRef, RequestGate,
    StaticIdentities, decision_exit_code, load_config,
};
use permatrix_settings::{DIAGNOSTICS_ENV, Overrides, ResolvedConfig};
use permatrix_store::{FileStore, PolicyStore};
use permatrix_types::{Decision, Requirement, Triple, all_operation_ids, lookup_operation};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Credential the CLI hands to its own identity table for `--role`.
const CLI_CREDENTIAL: &str = "cli";

#[derive(Parser, Debug)]
#[command(
    name = "permatrix",
    version,
    about = "Role x page x tab x action authorization matrix"
)]
struct Cli {
    /// Path to permatrix config TOML. A missing file means built-in defaults.
    #[arg(long, default_value = "permatrix.toml")]
    config: Utf8PathBuf,

    /// Path to the policy matrix JSON document.
    #[arg(long, default_value = "permatrix.json")]
    store: Utf8PathBuf,

    /// Override the config preset (default|minimal).
    #[arg(long)]
    preset: Option<String>,

    /// Include role and requirement detail in denials.
    #[arg(long)]
    diagnostics: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(clap::Args, Debug, Clone)]
struct Caller {
    /// Raw role as the identity provider reports it. Omit for an anonymous caller.
    #[arg(long)]
    role: Option<String>,

    /// Subject id of the caller.
    #[arg(long)]
    subject: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical role for a raw role string.
    Normalize {
        /// Raw role; omitted means no role at all.
        raw: Option<String>,
    },

    /// Evaluate a requirement. Several triples form an OR-requirement.
    Check {
        #[command(flatten)]
        caller: Caller,

        /// One or more `page/tab:action` triples.
        #[arg(required = true)]
        triples: Vec<Triple>,
    },

    /// Gate a catalog operation by id.
    Operation {
        #[command(flatten)]
        caller: Caller,

        /// Operation id (see `permatrix operations`).
        id: String,
    },

    /// Show what the presentation layer may display for a caller.
    Capabilities {
        #[command(flatten)]
        caller: Caller,

        /// Ask about one action instead of listing visible pages.
        #[arg(long)]
        action: Option<Triple>,

        /// Resource family of the record the action touches.
        #[arg(long, requires = "owner")]
        family: Option<String>,

        /// Owner id of the record the action touches.
        #[arg(long, requires = "family")]
        owner: Option<String>,
    },

    /// Print the stored matrix.
    Show,

    /// Replace the stored matrix with a JSON document.
    Apply {
        /// Path to the replacement matrix.
        file: Utf8PathBuf,
    },

    /// Write the built-in seed matrix if the store is empty.
    Seed,

    /// List catalog operations and their requirements.
    Operations,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = resolve(&cli)?;
    let store: Arc<dyn PolicyStore> = Arc::new(FileStore::new(cli.store.clone()));

    match cli.cmd {
        Commands::Normalize { raw } => {
            println!("{}", config.normalizer.normalize(raw.as_deref()));
            Ok(())
        }
        Commands::Check { caller, triples } => {
            let requirement = match <[Triple; 1]>::try_from(triples) {
                Ok([single]) => Requirement::Single(single),
                Err(many) => Requirement::any_of(many),
            };
            let gate = gate(store, &config, &caller);
            let outcome = gate.authorize(&request(&caller), &requirement);
            emit_decision(outcome.decision())
        }
        Commands::Operation { caller, id } => {
            let gate = gate(store, &config, &caller);
            let outcome = gate.authorize_operation(&request(&caller), &id);
            emit_decision(outcome.decision())
        }
        Commands::Capabilities {
            caller,
            action,
            family,
            owner,
        } => cmd_capabilities(store, &config, &caller, action, family, owner),
        Commands::Show => {
            let matrix = PolicyEditor::new(store).current().context("read policy store")?;
            println!("{}", to_pretty(&matrix.to_json())?);
            Ok(())
        }
        Commands::Apply { file } => cmd_apply(store, &file),
        Commands::Seed => {
            let editor = PolicyEditor::new(store);
            match editor.seed_if_absent(permatrix_settings::seed_matrix()) {
                Ok(Some(receipt)) => println!("{}", to_pretty(&receipt)?),
                Ok(None) => eprintln!("permatrix: {} already holds a matrix", cli.store),
                Err(err) => return Err(err).context("seed policy store"),
            }
            Ok(())
        }
        Commands::Operations => {
            let listing: Vec<serde_json::Value> = all_operation_ids()
                .iter()
                .filter_map(|id| lookup_operation(id))
                .map(|op| {
                    serde_json::json!({
                        "id": op.id,
                        "summary": op.summary,
                        "requirement": op.requirement,
                        "family": op.family,
                    })
                })
                .collect();
            println!("{}", to_pretty(&listing)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "permatrix=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    // Missing config file is allowed (defaults apply).
    let cfg_text = match std::fs::read_to_string(&cli.config) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(|| format!("read {}", cli.config)),
    };
    let env_diagnostics = std::env::var(DIAGNOSTICS_ENV)
        .ok()
        .map(|v| permatrix_settings::diagnostics_flag(&v));
    let overrides = Overrides {
        preset: cli.preset.clone(),
        diagnostics: if cli.diagnostics {
            Some(true)
        } else {
            env_diagnostics
        },
    };
    load_config(&cfg_text, overrides)
}

fn gate(store: Arc<dyn PolicyStore>, config: &ResolvedConfig, caller: &Caller) -> RequestGate {
    let mut identities = StaticIdentities::new();
    if let Some(role) = &caller.role {
        identities = identities.with_token(
            CLI_CREDENTIAL,
            RawIdentity {
                role: Some(role.clone()),
                subject_id: caller.subject.clone(),
            },
        );
    }
    RequestGate::from_config(store, Arc::new(identities), config)
}

fn request(caller: &Caller) -> GateRequest {
    match caller.role {
        Some(_) => GateRequest::with_credential(CLI_CREDENTIAL),
        None => GateRequest::anonymous(),
    }
}

fn cmd_capabilities(
    store: Arc<dyn PolicyStore>,
    config: &ResolvedConfig,
    caller: &Caller,
    action: Option<Triple>,
    family: Option<String>,
    owner: Option<String>,
) -> anyhow::Result<()> {
    let identity = gate(store.clone(), config, caller).resolve_identity(&request(caller));
    let service = CapabilityService::from_config(store, config);

    let Some(triple) = action else {
        let listing = serde_json::json!({
            "role": identity.role,
            "pages": service.visible_pages(&identity),
        });
        println!("{}", to_pretty(&listing)?);
        return Ok(());
    };

    let record = match (&family, &owner) {
        (Some(family), Some(owner)) => Some(RecordRef {
            family: family.as_str(),
            owner_id: owner.as_str(),
        }),
        _ => None,
    };
    let allowed =
        service.action_allowed(&identity, &triple.page, &triple.tab, &triple.action, record);
    println!(
        "{}",
        to_pretty(&serde_json::json!({ "role": identity.role, "allowed": allowed }))?
    );
    exit_with(if allowed { 0 } else { 2 })
}

fn cmd_apply(store: Arc<dyn PolicyStore>, file: &Utf8PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("read {file}"))?;
    let document: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse {file}"))?;

    match PolicyEditor::new(store).replace_json(&document) {
        Ok(receipt) => {
            println!("{}", to_pretty(&receipt)?);
            Ok(())
        }
        Err(err @ (EditError::InvariantViolation { .. } | EditError::NotAMatrix)) => {
            eprintln!("permatrix: {err}");
            exit_with(1)
        }
        Err(err) => Err(err).context("write policy store"),
    }
}

fn emit_decision(decision: &Decision) -> anyhow::Result<()> {
    println!("{}", to_pretty(decision)?);
    exit_with(decision_exit_code(decision))
}

fn exit_with(code: i32) -> anyhow::Result<()> {
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn to_pretty<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("serialize output")
}
