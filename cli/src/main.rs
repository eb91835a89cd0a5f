//! mnvote: vote on budget proposals with every masternode you control

mod config;
mod ui;

use clap::Parser;
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mnvote_crypto::{Ed25519MessageSigner, OsEntropy};
use mnvote_engine::{load_ballot, Orchestrator, Session, SystemClock};
use mnvote_masternode::{resolve_identities, DirectoryLookup, HttpDirectory};
use mnvote_node::DashCli;

use config::{Cli, Settings};

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or("MNVOTE_LOG", "warn"));
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(cli.log_file.as_deref())?;
    let settings = Settings::resolve(&cli)?;

    println!("{}", "Masternode Budget Voting".cyan().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black()
    );

    // Identities
    let signer = Ed25519MessageSigner::new();
    let directory = if settings.directory.enabled {
        Some(HttpDirectory::new(
            settings.directory.url.clone(),
            settings.directory.timeout(),
        )?)
    } else {
        None
    };
    let load = resolve_identities(
        &settings.identity_sources(),
        &signer,
        directory.as_ref().map(|d| d as &dyn DirectoryLookup),
    )?;
    for record in &load.malformed {
        println!("{} Skipped masternode.conf {}", "⚠".yellow(), record);
    }
    println!(
        "{} {} masternode(s) loaded",
        "✓".green(),
        load.identities.len()
    );

    // Ballot
    let node = DashCli::new(
        settings.node.cli_path.clone(),
        settings.node.extra_args.clone(),
    );
    let loaded = load_ballot(&node, &load.identities)?;
    for rejected in &loaded.rejected {
        println!(
            "{} Ignoring proposal {}: {}",
            "⚠".yellow(),
            rejected.name,
            rejected.reason
        );
    }
    println!(
        "{} {} proposal(s) open for voting",
        "✓".green(),
        loaded.ballot.len()
    );

    let mut session = Session::new();
    session.finish_loading(loaded.ballot, load.identities)?;

    if !ui::run_ballot(&mut session)? {
        println!("No votes submitted.");
        return Ok(());
    }

    // Submission runs outside raw mode, so Ctrl+C arrives as a signal
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    let clock = SystemClock;
    let orchestrator = Orchestrator::new(&node, &signer, &clock)
        .with_success_marker(settings.node.success_marker.clone())
        .with_cancel_flag(cancel);

    println!("{}", "🚀 Submitting votes...".green().bold());
    // An aborted batch still leaves the votes already sent on the session
    let result = session
        .submit(&orchestrator, &mut OsEntropy, &mut ui::ProgressPrinter)
        .map(|_| ());
    if let Some(report) = session.report() {
        ui::render_summary(report);
    }
    result?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
