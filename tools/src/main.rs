//! insight-runner: command-line front end for the offer influence analysis.
//!
//! Usage:
//!   insight-runner --portfolio portfolio.json --transcript transcript.json --profile profile.json
//!   insight-runner --data-dir ./data --backend sqlite --db staging.db
//!   insight-runner --config analysis.json --json
//!   insight-runner --synthetic 2000 --seed 7

use anyhow::Result;
use offer_insight_core::{
    config::{AnalysisConfig, DataPaths, TimelineBackend},
    ingest::Dataset,
    pipeline::InfluenceAnalysis,
    synth::{self, SyntheticConfig},
};
use std::env;

const USAGE: &str = "\
Please provide the filepaths of the portfolio, transcript and profile datasets.

  insight-runner --portfolio <file> --transcript <file> --profile <file>
  insight-runner --data-dir <dir>            (portfolio.json, transcript.json, profile.json)
  insight-runner --config <analysis.json>
  insight-runner --synthetic <customers> [--seed <n>]

Options:
  --backend memory|sqlite    where customer timelines are read from (default memory)
  --db <path>                SQLite staging database for --backend sqlite (default :memory:)
  --json                     print the report as JSON";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let synthetic = parse_arg::<usize>(&args, "--synthetic")?;
    let seed = parse_arg(&args, "--seed")?.unwrap_or(42u64);

    let config = match (resolve_config(&args)?, synthetic) {
        (Some(config), _) => config,
        (None, Some(_)) => AnalysisConfig::default_for("."),
        (None, None) => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    run(config, &args, synthetic, seed, json)
}

fn run(
    mut config: AnalysisConfig,
    args: &[String],
    synthetic: Option<usize>,
    seed: u64,
    json: bool,
) -> Result<()> {
    if let Some(backend) = flag_value(args, "--backend") {
        config.timeline_backend = backend.parse()?;
    }
    if let Some(db) = flag_value(args, "--db") {
        config.store_path = db.to_string();
        if config.timeline_backend == TimelineBackend::Memory {
            log::warn!("--db given without --backend sqlite; timelines stay in memory");
        }
    }

    let dataset = match synthetic {
        Some(customers) => {
            let synth_config = SyntheticConfig { customers, ..SyntheticConfig::default() };
            synth::generate(seed, &synth_config)?
        }
        None => {
            if !json {
                println!("Loading data...");
                println!("  PORTFOLIO:  {}", config.data.portfolio.display());
                println!("  TRANSCRIPT: {}", config.data.transcript.display());
                println!("  PROFILE:    {}", config.data.profile.display());
                println!();
            }
            Dataset::load(&config.data)?
        }
    };

    let analysis = InfluenceAnalysis::new(config);
    let report = analysis.run(&dataset)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Config file, then data directory, then the three explicit paths.
fn resolve_config(args: &[String]) -> Result<Option<AnalysisConfig>> {
    if let Some(path) = flag_value(args, "--config") {
        return Ok(Some(AnalysisConfig::load(path)?));
    }
    if let Some(dir) = flag_value(args, "--data-dir") {
        return Ok(Some(AnalysisConfig::default_for(dir)));
    }
    let paths = (
        flag_value(args, "--portfolio"),
        flag_value(args, "--transcript"),
        flag_value(args, "--profile"),
    );
    match paths {
        (Some(portfolio), Some(transcript), Some(profile)) => {
            let mut config = AnalysisConfig::default_for(".");
            config.data = DataPaths {
                portfolio:  portfolio.into(),
                transcript: transcript.into(),
                profile:    profile.into(),
            };
            Ok(Some(config))
        }
        _ => Ok(None),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// `Ok(None)` when the flag is absent; an error when its value does not parse.
fn parse_arg<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    flag_value(args, flag)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid value '{v}' for {flag}: {e}"))
        })
        .transpose()
}
