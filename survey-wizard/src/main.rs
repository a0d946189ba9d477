//! survey-wizard - Multi-step survey in the terminal
//!
//! Walks the respondent through the survey one section at a time, keeps a
//! local draft, and delivers the finished submission to survey-sink.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use survey_wizard::{Delivery, DraftStore, FormState, SinkClient, Survey};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{Outcome, Session};

/// Command-line arguments for survey-wizard
#[derive(Parser, Debug)]
#[command(name = "survey-wizard")]
#[command(about = "Multi-step survey form")]
#[command(version)]
struct Args {
    /// Survey definition (TOML); the built-in survey when omitted
    #[arg(short, long)]
    survey: Option<PathBuf>,

    /// Submit endpoint of survey-sink, e.g. http://127.0.0.1:5780/submit
    #[arg(long, env = "SURVEY_SINK_URL")]
    sink_url: Option<String>,

    /// Directory for the local draft
    #[arg(long, env = "SURVEY_DRAFT_DIR")]
    draft_dir: Option<PathBuf>,

    /// Do not read or write a local draft
    #[arg(long)]
    no_draft: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout belongs to the form
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    info!("Starting survey-wizard v{}", env!("CARGO_PKG_VERSION"));

    let survey = match &args.survey {
        Some(path) => Survey::load(path)
            .with_context(|| format!("Failed to load survey from {}", path.display()))?,
        None => Survey::standard(),
    };
    survey.validate_definition().context("Invalid survey definition")?;

    if survey.is_closed(Utc::now()) {
        print_closed(&survey);
        return Ok(());
    }

    let drafts = (!args.no_draft)
        .then(|| DraftStore::new(&args.draft_dir.clone().unwrap_or_else(DraftStore::default_dir)));
    let form = match drafts.as_ref().and_then(|d| d.restore(&survey)) {
        Some(form) => {
            println!("Restored your saved answers.");
            form
        }
        None => FormState::new(),
    };

    let client = SinkClient::new(args.sink_url.clone())?;
    if client.url().is_none() {
        warn!("No sink URL configured; the submission will only be logged");
    }

    let stdin = io::stdin();
    let outcome = Session::new(&survey, drafts.as_ref(), stdin.lock(), io::stdout()).run(form)?;

    let submission = match outcome {
        Outcome::Submitted(submission) => submission,
        Outcome::Quit => {
            if drafts.is_some() {
                println!("Your answers are saved. Run survey-wizard again to continue.");
            }
            return Ok(());
        }
        Outcome::Closed => {
            warn!("Deadline passed during the session; nothing was submitted");
            print_closed(&survey);
            return Ok(());
        }
    };

    let delivery = client.deliver(&submission).await;
    match &delivery {
        Delivery::Confirmed(_) => info!("Submission confirmed by sink"),
        Delivery::NotConfigured => info!("Submission logged locally"),
        Delivery::Rejected(message) => error!("Sink rejected submission: {}", message),
        Delivery::Unconfirmed(reason) => error!("Submission not confirmed: {}", reason),
    }

    if let Some(drafts) = &drafts {
        if delivery.should_clear_draft() {
            if let Err(e) = drafts.clear() {
                warn!("Failed to clear draft: {}", e);
            }
        } else {
            info!("Keeping draft at {}", drafts.path().display());
        }
    }

    println!();
    println!("Thank you! Your responses have been submitted.");
    Ok(())
}

fn print_closed(survey: &Survey) {
    if let Some(deadline) = survey.deadline {
        println!();
        println!(
            "{} closed on {}. Thank you for your interest.",
            survey.title,
            deadline.format("%Y-%m-%d %H:%M UTC")
        );
    }
}
