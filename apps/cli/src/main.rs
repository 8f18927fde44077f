use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use basepath::{Basepath, BasepathConfig};
use clap::Parser;
use serde::Serialize;
use tracing::{dispatcher, info};
use tracing_subscriber::prelude::*;

const LOG_JSON_ENV: &str = "BASEPATH_LOG_JSON";

/// Check untrusted relative paths against a trusted base directory
#[derive(Debug, Parser)]
#[command(name = "basepath")]
#[command(version)]
#[command(about = "Check untrusted relative paths against a trusted base directory")]
struct Args {
    #[arg(long, help = "Print one JSON report per relative path")]
    json: bool,

    #[arg(help = "Trusted base directory (an empty string means no base)")]
    base: String,

    #[arg(required = true, num_args = 1.., help = "Untrusted relative paths to check")]
    relatives: Vec<String>,
}

impl Args {
    fn base(&self) -> Option<&Path> {
        (!self.base.is_empty()).then(|| Path::new(self.base.as_str()))
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    relative_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    combined: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn check<'a>(guard: &Basepath, base: Option<&Path>, relative_path: &'a str) -> Report<'a> {
    match guard.combine(base, relative_path) {
        Ok(combined) => Report {
            relative_path,
            combined: Some(combined),
            error: None,
        },
        Err(violation) => Report {
            relative_path,
            combined: None,
            error: Some(violation.to_string()),
        },
    }
}

fn run() -> anyhow::Result<bool> {
    let args = Args::parse();
    let config = BasepathConfig::from_env().context("invalid basepath configuration")?;
    let guard = Basepath::new(config.separators);
    info!(separators = %config.separators, "checking relative paths");

    let mut all_inside = true;
    for relative in &args.relatives {
        let report = check(&guard, args.base(), relative);
        all_inside &= report.error.is_none();
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else if let Some(combined) = &report.combined {
            println!("{}", combined.display());
        } else if let Some(error) = &report.error {
            eprintln!("{error}");
        }
    }
    Ok(all_inside)
}

fn init_tracing() -> anyhow::Result<()> {
    if dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let registry = tracing_subscriber::registry().with(env_filter);
    if std::env::var_os(LOG_JSON_ENV).is_some() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialise logging: {err:#}");
    }

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}
