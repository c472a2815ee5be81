//! The analysis pipeline.
//!
//! STAGE ORDER (fixed):
//!   1. Clean profiles          (drop null gender/income, sentinel age)
//!   2. Select the segment      (demographic thresholds)
//!   3. Mark transacted         (has_transacted from the transcript)
//!   4. Population filter       (match influence, drop the uninfluenced)
//!   5. Aggregate               (per-offer counts in catalog order)
//!   6. Rank                    (top offer and runner-up)
//!
//! RULES:
//!   - Each stage returns a new value; nothing is mutated in place.
//!   - Aggregation starts only after every customer has been matched.
//!   - The same inputs always produce the same influence, counts and ranking.

use crate::{
    aggregate::count_influence,
    config::{AnalysisConfig, TimelineBackend},
    error::AnalysisResult,
    ingest::Dataset,
    population::analyze_population,
    ranking::{rank, RankingOutcome},
    report::{AnalysisReport, PopulationStats},
    segment::{clean_profiles, mark_transacted},
    store::EventStore,
    timeline::{EventLog, TimelineSource},
    types::RunId,
};

pub struct InfluenceAnalysis {
    pub run_id: RunId,
    config:     AnalysisConfig,
}

impl InfluenceAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            config,
        }
    }

    /// Run against the configured timeline backend.
    pub fn run(&self, dataset: &Dataset) -> AnalysisResult<AnalysisReport> {
        match self.config.timeline_backend {
            TimelineBackend::Memory => {
                let event_log = EventLog::new(&dataset.events);
                log::info!(
                    "run={} indexed {} events for {} customers",
                    self.run_id,
                    dataset.events.len(),
                    event_log.customer_count()
                );
                self.run_with_source(dataset, &event_log)
            }
            TimelineBackend::Sqlite => {
                let mut store = EventStore::open(&self.config.store_path)?;
                store.migrate()?;
                store.stage_events(&dataset.events)?;
                log::info!(
                    "run={} staged {} events in {}",
                    self.run_id,
                    store.event_count()?,
                    self.config.store_path
                );
                self.run_with_source(dataset, &store)
            }
        }
    }

    /// Run with timelines read from `source`. The profiles and catalog
    /// still come from `dataset`.
    pub fn run_with_source<S>(&self, dataset: &Dataset, source: &S) -> AnalysisResult<AnalysisReport>
    where
        S: TimelineSource + ?Sized,
    {
        let run_id = &self.run_id;
        let segment = &self.config.segment;

        let cleaned = clean_profiles(&dataset.profiles, self.config.age_sentinel);
        log::info!("run={run_id} clean: {} of {} profiles kept", cleaned.len(), dataset.profiles.len());

        let in_segment = segment.select(&cleaned);
        log::info!("run={run_id} segment: {} profiles ({segment})", in_segment.len());

        let transacted = source.transacted_customers()?;
        let customers = mark_transacted(&in_segment, &transacted);

        let population = analyze_population(&customers, source)?;

        let counts = count_influence(&dataset.catalog, &population.analyzed);
        let ranking = rank(&counts);
        match &ranking {
            RankingOutcome::Ranked(r) => log::info!(
                "run={run_id} rank: top={} ({}) runner_up={}",
                r.top.offer_id,
                r.top.customers,
                r.runner_up
                    .as_ref()
                    .map(|o| format!("{} ({})", o.offer_id, o.customers))
                    .unwrap_or_else(|| "none".to_string())
            ),
            RankingOutcome::Unavailable { reason } => {
                log::warn!("run={run_id} rank: no ranking available ({reason:?})")
            }
        }

        let stats = PopulationStats {
            profiles_loaded:  dataset.profiles.len(),
            profiles_cleaned: cleaned.len(),
            in_segment:       in_segment.len(),
            transacted:       population.transacted_count(),
            not_transacted:   population.not_transacted.len(),
            analyzed:         population.analyzed_count(),
            excluded:         population.excluded_count(),
        };

        Ok(AnalysisReport {
            run_id:       run_id.clone(),
            generated_at: chrono::Utc::now(),
            segment:      segment.to_string(),
            stats,
            influence:    AnalysisReport::influence_from(&population),
            counts,
            ranking,
        })
    }
}
