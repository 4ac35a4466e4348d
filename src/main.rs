//! Linkgate CLI for checking, opening and listing trusted external links.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use linkgate::config::{self, Config, CONFIG_FILE_NAME};
use linkgate::gate::confirmation::render_prompt;
use linkgate::gate::domain::extract_domain;
use linkgate::gate::static_list::static_trusted_domains;
use linkgate::gate::{AllowReason, Decision, GatedLink, LinkEvent, NavigationGate, PromptOutcome};
use linkgate::logging;
use linkgate::opener::{ExternalOpener, SystemOpener, OPEN_FEATURES, OPEN_TARGET};
use linkgate::registry::{TrustRegistry, TRUSTED_KEY};
use linkgate::settings::GeneralSettings;
use linkgate::storage::{storage_ns, KeyValueStore, SqliteStore};

/// Linkgate: confirm before leaving for untrusted domains.
#[derive(Debug, Parser)]
#[command(name = "linkgate", version, about)]
struct Cli {
    /// Path to config.toml (default: ~/.linkgate/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the trust database (default: ~/.linkgate).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Also write rotated JSON logs to this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Skip confirmation for this invocation.
    #[arg(long, global = true)]
    no_warn: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a default config.toml to the config directory.
    Init,
    /// Print the gate decision for a link without prompting.
    Check {
        /// Link target.
        href: String,
    },
    /// Open a link, asking for confirmation if its domain is untrusted.
    Open {
        /// Link target.
        href: String,
        /// Pre-check "Trust this domain".
        #[arg(long)]
        remember: bool,
    },
    /// List trusted domains.
    Trusted,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = config::config_dir()?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join(CONFIG_FILE_NAME));
    let config = config::load_or_default(&config_path)?;

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.dir.clone());
    let _log_guard = match log_dir {
        Some(dir) => Some(logging::init_production(&dir)?),
        None => {
            logging::init_cli();
            None
        }
    };

    if let Command::Init = cli.command {
        return cmd_init(&config_path);
    }

    let data_dir = cli.data_dir.clone().unwrap_or(config_dir);
    let db_path = config.storage.database_path(&data_dir);
    let store = SqliteStore::open(&db_path)
        .await
        .with_context(|| format!("failed to open trust database {}", db_path.display()))?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(store.clone());
    let registry = Arc::new(
        TrustRegistry::load(kv, storage_ns(&config.storage.namespace, TRUSTED_KEY)).await,
    );

    let settings = GeneralSettings::from_config(&config.general);
    if cli.no_warn {
        settings.set_jump_out_link_warn(false);
    }

    let opener: Arc<dyn ExternalOpener> = Arc::new(SystemOpener);
    let gate = NavigationGate::new(Arc::clone(&registry), Arc::clone(&opener));

    let result = match cli.command {
        Command::Init => Ok(()),
        Command::Check { href } => {
            cmd_check(&gate, &settings, &href);
            Ok(())
        }
        Command::Open { href, remember } => {
            cmd_open(&gate, &settings, opener.as_ref(), href, remember).await
        }
        Command::Trusted => {
            cmd_trusted(&registry);
            Ok(())
        }
    };

    registry.flush().await;
    store.close().await;
    result
}

fn cmd_init(config_path: &std::path::Path) -> Result<()> {
    if config_path.exists() {
        println!("config already exists at {}", config_path.display());
        return Ok(());
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let rendered = config::render_config(&Config::default())?;
    std::fs::write(config_path, rendered)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    info!(path = %config_path.display(), "config written");
    println!("wrote {}", config_path.display());
    Ok(())
}

fn cmd_check(gate: &NavigationGate, settings: &GeneralSettings, href: &str) {
    let decision = gate.evaluate(Some(href), settings);
    println!("{}", describe(&decision));
}

async fn cmd_open(
    gate: &NavigationGate,
    settings: &GeneralSettings,
    opener: &dyn ExternalOpener,
    href: String,
    remember: bool,
) -> Result<()> {
    let mut link = GatedLink::new(Some(href));
    let mut event = LinkEvent::new();
    let decision = link.activate(gate, settings, &mut event);

    if !event.is_default_prevented() {
        // Terminal hosts have no anchor to follow; the default action is
        // opening the target directly when it is a real URL.
        match decision {
            Decision::Allowed(AllowReason::MissingHref | AllowReason::Unparseable) => {
                println!("{}", describe(&decision));
            }
            _ => match link.href() {
                Some(href) if extract_domain(href).is_some() => {
                    opener.open(href, OPEN_TARGET, OPEN_FEATURES)?;
                    println!("opened {href}");
                }
                // Warning disabled skips extraction; non-URLs are still left alone.
                Some(_) => println!("{}", describe(&Decision::Allowed(AllowReason::Unparseable))),
                None => println!("{}", describe(&Decision::Allowed(AllowReason::MissingHref))),
            },
        }
        return Ok(());
    }

    link.set_remember(remember);
    if let Some(prompt) = link.prompt() {
        eprintln!("{}\n", render_prompt(&prompt));
    }

    let go = ask("Go? [y/N] ").await?;
    if !go {
        link.dismiss();
        println!("cancelled");
        return Ok(());
    }
    if !remember {
        let trust = ask("Trust this domain? [y/N] ").await?;
        link.set_remember(trust);
    }

    match link.confirm(gate) {
        PromptOutcome::Navigated { remembered } => {
            let href = link.href().unwrap_or_default();
            if remembered {
                println!("opened {href} (domain trusted)");
            } else {
                println!("opened {href}");
            }
        }
        PromptOutcome::OpenFailed { .. } => {
            warn!("external opener failed");
            anyhow::bail!("could not open link");
        }
        other => println!("{other:?}"),
    }
    Ok(())
}

fn cmd_trusted(registry: &TrustRegistry) {
    println!("built-in:");
    for domain in static_trusted_domains() {
        println!("  {domain}");
    }
    println!("remembered:");
    for domain in registry.domains() {
        println!("  {domain}");
    }
}

/// Read a yes/no answer from stdin. Anything but `y`/`yes` is no.
async fn ask(question: &'static str) -> Result<bool> {
    tokio::task::spawn_blocking(move || -> Result<bool> {
        let mut stderr = std::io::stderr();
        stderr.write_all(question.as_bytes())?;
        stderr.flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    })
    .await
    .context("prompt task failed")?
}

fn describe(decision: &Decision) -> String {
    match decision {
        Decision::Allowed(AllowReason::WarningDisabled) => "allowed: warning disabled".to_owned(),
        Decision::Allowed(AllowReason::MissingHref) => "allowed: no link target".to_owned(),
        Decision::Allowed(AllowReason::Unparseable) => "allowed: not an external link".to_owned(),
        Decision::Allowed(AllowReason::StaticTrust) => "allowed: built-in trusted domain".to_owned(),
        Decision::Allowed(AllowReason::Remembered) => "allowed: remembered domain".to_owned(),
        Decision::AwaitingConfirmation(domain) => format!("confirm: {domain} is not trusted"),
    }
}
