//! Run one submission from the command line and print what came back.
//!
//! Usage:
//!   cargo run --bin speak -- "Hello world"
//!   cargo run --bin speak -- --languages 5 Good morning everyone
//!
//! Required environment variables:
//! - GROQ_API_KEY
//!
//! Clips are written to OUTPUT_DIR (defaults to translations/) and are not
//! cleaned up by this binary.

use anyhow::{bail, Context, Result};
use multilingual_speaker::{config::Config, i18n::LanguageCatalog, service::TranslationService};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, PartialEq)]
struct Args {
    language_count: Option<usize>,
    sentence: String,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut language_count = None;
    let mut words = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--languages" || arg == "-n" {
            let value = iter.next().context("--languages needs a number")?;
            language_count = Some(
                value
                    .parse()
                    .with_context(|| format!("Invalid language count: {}", value))?,
            );
        } else if let Some(value) = arg.strip_prefix("--languages=") {
            language_count = Some(
                value
                    .parse()
                    .with_context(|| format!("Invalid language count: {}", value))?,
            );
        } else {
            words.push(arg.as_str());
        }
    }

    if words.is_empty() {
        bail!("Usage: speak [--languages N] <sentence...>");
    }

    Ok(Args {
        language_count,
        sentence: words.join(" "),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilingual_speaker=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;

    info!("Loading configuration...");
    let config = Arc::new(Config::from_env()?);
    let output_dir = config.output_dir.clone();
    let service = TranslationService::from_config(config, Arc::new(LanguageCatalog::default()));
    let count = args
        .language_count
        .unwrap_or_else(|| service.limits().default);

    println!("Translating \"{}\" into {} languages...", args.sentence, count);

    let outcome = service
        .submit_with_progress(&args.sentence, count, |progress| {
            println!(
                "  [{:>3.0}%] {}/{} {}",
                progress.fraction() * 100.0,
                progress.completed,
                progress.total,
                progress.language_code
            );
        })
        .await?;

    if !outcome.results.is_empty() {
        println!(
            "\nTranslations generated for {} languages!\n",
            outcome.results.len()
        );
    }
    for result in &outcome.results {
        println!(
            "{} ({}): {}\n    {}",
            result.language_name,
            result.language_code,
            result.translated_text,
            output_dir.join(result.audio_artifact_ref.as_str()).display()
        );
    }

    if !outcome.failures.is_empty() {
        println!();
        for failure in &outcome.failures {
            eprintln!("{}", failure.error_message);
        }
    }

    if outcome.attempted() == 0 {
        println!("Nothing to do: language count below the minimum.");
    }

    Ok(())
}
