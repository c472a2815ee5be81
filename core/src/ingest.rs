//! Ingestion — JSON-lines readers for portfolio, transcript and profiles.
//!
//! Readers accept any `BufRead`, so tests feed them string literals and
//! the runner feeds them files. Blank lines are skipped; every other line
//! must hold exactly one JSON object.

use crate::{
    catalog::{Offer, OfferCatalog},
    config::DataPaths,
    error::{AnalysisError, AnalysisResult},
    event::{Event, RawTranscriptRecord},
    profile::Profile,
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse one record per non-blank line, keeping the 1-based line number.
pub fn read_json_lines<T, R>(reader: R) -> AnalysisResult<Vec<(usize, T)>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| AnalysisError::io(format!("line {line_no}"), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| AnalysisError::malformed(line_no, e.to_string()))?;
        records.push((line_no, record));
    }
    Ok(records)
}

pub fn read_catalog<R: BufRead>(reader: R) -> AnalysisResult<OfferCatalog> {
    let offers = read_json_lines::<Offer, _>(reader)?
        .into_iter()
        .map(|(_, offer)| offer)
        .collect();
    OfferCatalog::new(offers)
}

pub fn read_transcript<R: BufRead>(reader: R) -> AnalysisResult<Vec<Event>> {
    read_json_lines::<RawTranscriptRecord, _>(reader)?
        .into_iter()
        .map(|(line, raw)| raw.into_event(line))
        .collect()
}

pub fn read_profiles<R: BufRead>(reader: R) -> AnalysisResult<Vec<Profile>> {
    Ok(read_json_lines::<Profile, _>(reader)?
        .into_iter()
        .map(|(_, profile)| profile)
        .collect())
}

fn open(path: &Path) -> AnalysisResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path.display().to_string(), e))?;
    Ok(BufReader::new(file))
}

/// All inputs of one analysis, fully materialized.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub catalog:  OfferCatalog,
    pub events:   Vec<Event>,
    pub profiles: Vec<Profile>,
}

impl Dataset {
    pub fn load(paths: &DataPaths) -> AnalysisResult<Self> {
        let catalog = read_catalog(open(&paths.portfolio)?)?;
        log::info!("ingest: portfolio {} -> {} offers", paths.portfolio.display(), catalog.len());

        let events = read_transcript(open(&paths.transcript)?)?;
        log::info!("ingest: transcript {} -> {} events", paths.transcript.display(), events.len());

        let profiles = read_profiles(open(&paths.profile)?)?;
        log::info!("ingest: profile {} -> {} profiles", paths.profile.display(), profiles.len());

        Ok(Self { catalog, events, profiles })
    }
}
