//! Harvest orchestrator sequencing the pipeline stages.
//!
//! This module provides the `HarvestOrchestrator` which runs a search in the
//! browser, walks every result page, classifies the decrees and enriches the
//! classified ones from their documents.

use crate::classifier;
use crate::enrichment::EnrichmentEngine;
use crate::error::Result;
use crate::http::DocumentFetcher;
use crate::pagination::Paginator;
use crate::search;
use decree_browser::BrowserActions;
use decree_core::{AppConfig, DateRange, Decree};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Classified and enriched decrees, ascending by number
    pub decrees: Vec<Decree>,
    /// Decrees read from the result pages
    pub total_found: usize,
    /// Time spent submitting the search and reading the result count
    pub search_time: Duration,
    /// Time spent walking the result pages
    pub collect_time: Duration,
    /// Time spent fetching decree documents
    pub enrich_time: Duration,
}

impl HarvestReport {
    /// Number of decrees that belong to a program.
    #[must_use]
    pub fn classified(&self) -> usize {
        self.decrees.len()
    }

    /// Number of decrees whose CNPJ was found.
    #[must_use]
    pub fn with_cnpj(&self) -> usize {
        self.decrees.iter().filter(|d| d.cnpj.is_some()).count()
    }

    /// Number of decrees whose framing was found.
    #[must_use]
    pub fn with_framing(&self) -> usize {
        self.decrees.iter().filter(|d| d.framing.is_some()).count()
    }
}

/// Runs the full harvest: search, pagination, classification, enrichment.
pub struct HarvestOrchestrator<B: ?Sized, F: ?Sized> {
    /// Browser session owned by the pagination stage
    browser: Arc<B>,
    /// Document source shared by enrichment workers
    fetcher: Arc<F>,
    config: AppConfig,
    /// Enrichment pool size
    workers: usize,
}

impl<B, F> HarvestOrchestrator<B, F>
where
    B: BrowserActions + ?Sized,
    F: DocumentFetcher + ?Sized + 'static,
{
    /// Create a new orchestrator.
    #[must_use]
    pub fn new(browser: Arc<B>, fetcher: Arc<F>, config: AppConfig, workers: usize) -> Self {
        Self {
            browser,
            fetcher,
            config,
            workers,
        }
    }

    /// Harvest the decrees published in `range`.
    ///
    /// Only traversal failures (a page that never becomes active, a broken
    /// browser session) are returned as errors; enrichment failures leave the
    /// affected decrees without `cnpj`/`framing`.
    pub async fn run(&self, range: &DateRange) -> Result<HarvestReport> {
        let search_config = &self.config.search;

        let started = Instant::now();
        search::setup_search(self.browser.as_ref(), search_config, range).await?;
        let total_pages = search::configure_page_size(self.browser.as_ref(), search_config).await?;
        let search_time = started.elapsed();
        tracing::info!("Search ready in {:.2}s", search_time.as_secs_f64());

        let started = Instant::now();
        let paginator = Paginator::new(self.browser.as_ref(), search_config)?;
        let decrees = paginator.scrape_all_pages(total_pages).await?;
        let collect_time = started.elapsed();
        let total_found = decrees.len();
        tracing::info!(
            "Collected {} decrees in {:.2}s",
            total_found,
            collect_time.as_secs_f64()
        );

        let classified = classifier::classify(decrees);

        let started = Instant::now();
        let engine =
            EnrichmentEngine::new(Arc::clone(&self.fetcher), &search_config.base_url, self.workers)?;
        let mut decrees = engine.enrich_all(classified).await;
        let enrich_time = started.elapsed();
        tracing::info!("Enrichment finished in {:.2}s", enrich_time.as_secs_f64());

        sort_by_number(&mut decrees);

        Ok(HarvestReport {
            decrees,
            total_found,
            search_time,
            collect_time,
            enrich_time,
        })
    }
}

/// Order decrees by number, then by id for equal numbers.
pub fn sort_by_number(decrees: &mut [Decree]) {
    decrees.sort_by_key(|d| (d.number, d.id));
}
