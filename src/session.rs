use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Instant;

use crate::api_models::{Entity, ResolvedEntity};
use crate::cli::entity_progress_bar;
use crate::tools::{
    harvest_entity, read_entities, select_best_url, LinkSource, ResultsWriter, RunConfig,
    ScoutResult,
};

/// What happened to one entity.
#[derive(Debug, Clone)]
pub struct EntityOutcome {
    pub result: ResolvedEntity,
    pub failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub found: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &EntityOutcome) {
        self.processed += 1;
        if outcome.result.is_found() {
            self.found += 1;
        }
        if outcome.failed {
            self.failed += 1;
        }
    }
}

pub struct EnrichmentSession {
    source: Arc<dyn LinkSource>,
    config: RunConfig,
}

impl EnrichmentSession {
    pub fn new(source: Arc<dyn LinkSource>, config: RunConfig) -> Self {
        Self { source, config }
    }

    /// Resolve one entity. A harvest failure yields an empty URL, never an error.
    pub async fn resolve_entity(&self, entity: Entity) -> EntityOutcome {
        match harvest_entity(self.source.as_ref(), &entity).await {
            Ok(links) => {
                let url = select_best_url(&entity.name, &links);
                let result = ResolvedEntity::new(entity, url);
                log::info!("{}", result.display_line());
                EntityOutcome {
                    result,
                    failed: false,
                }
            }
            Err(e) => {
                if e.is_per_entity() {
                    log::warn!("{}: {}", entity.name, e.to_user_message());
                } else {
                    log::error!("{}: {}", entity.name, e.to_user_message());
                }
                EntityOutcome {
                    result: ResolvedEntity::new(entity, String::new()),
                    failed: true,
                }
            }
        }
    }

    /// Resolve all entities with at most `max_concurrency` in flight.
    ///
    /// Outcomes come back in completion order.
    pub async fn resolve_all(&self, entities: Vec<Entity>, progress: &ProgressBar) -> Vec<EntityOutcome> {
        stream::iter(entities)
            .map(|entity| self.resolve_entity(entity))
            .buffer_unordered(self.config.max_concurrency)
            .inspect(|outcome| {
                progress.set_message(outcome.result.name.clone());
                progress.inc(1);
            })
            .collect()
            .await
    }

    pub async fn run(&self) -> ScoutResult<RunSummary> {
        self.config.validate()?;
        let started = Instant::now();
        log::info!("Starting URL enrichment");

        let mut writer = ResultsWriter::create(&self.config.output_path)?;
        let entities = read_entities(&self.config.input_path)?;
        log::info!(
            "Dispatching {} entities ({} at a time)",
            entities.len(),
            self.config.max_concurrency
        );

        let progress = entity_progress_bar(entities.len() as u64, self.config.show_progress);
        let outcomes = self.resolve_all(entities, &progress).await;
        progress.finish_and_clear();
        log::info!("All entities resolved");

        let mut summary = RunSummary::default();
        for outcome in &outcomes {
            writer.append(&outcome.result)?;
            summary.record(outcome);
        }
        writer.finish()?;

        log::info!(
            "Wrote {} rows to {} in {:.1}s",
            summary.processed,
            self.config.output_path.display(),
            started.elapsed().as_secs_f64()
        );
        Ok(summary)
    }
}
