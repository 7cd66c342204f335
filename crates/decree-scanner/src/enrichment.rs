//! Concurrent enrichment of classified decrees from their linked documents.
//!
//! Every decree is fetched on its own task, bounded by a worker semaphore.
//! The document yields the company CNPJ and, for original PRODEPE grants,
//! the framing category. When the first document carries no framing but links
//! to a related norm, that norm is fetched for framing only.
//!
//! Failures never leave this module: a decree whose fetch fails is returned
//! with its enrichment fields untouched.

use crate::error::{Result, ScanError};
use crate::http::DocumentFetcher;
use crate::parser::resolve_link;
use decree_core::{Decree, EnrichmentConfig, Framing};
use futures::FutureExt;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

static CNPJ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}").expect("valid regex"));

/// Framing markers in priority order.
static FRAMING_MARKERS: Lazy<Vec<(Regex, Framing)>> = Lazy::new(|| {
    [
        (
            r"(?i)agrupamentos?\s+industria(l|is)|atividade\s+industrial",
            Framing::I,
        ),
        (r"(?i)centra(l|is)\s+de\s+distribuição", Framing::C),
        (r"(?i)comércio\s+importador\s+atacadista", Framing::P),
    ]
    .into_iter()
    .map(|(pattern, framing)| (Regex::new(pattern).expect("valid regex"), framing))
    .collect()
});

/// Relative link to a related norm text.
static SECONDARY_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^/?texto\.aspx\?tiponorma=\d+&numero=\d+").expect("valid regex")
});

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Fields found in one fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentScan {
    pub cnpj: Option<String>,
    pub framing: Option<Framing>,
    pub secondary_link: Option<String>,
}

/// Scan a decree document.
///
/// Text comes from the `<p>` elements, or the whole document when it has
/// none. Framing is only searched when `search_framing` is set.
pub fn scan_document(html: &str, search_framing: bool) -> DocumentScan {
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect();
    let text = if paragraphs.is_empty() {
        document.root_element().text().collect::<String>()
    } else {
        paragraphs.join("\n")
    };

    let secondary_link = document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| SECONDARY_LINK.is_match(href.trim()))
        .map(|href| href.trim().to_string());

    DocumentScan {
        cnpj: find_cnpj(&text),
        framing: if search_framing {
            find_framing(&text)
        } else {
            None
        },
        secondary_link,
    }
}

/// First tax identifier in `text`, verbatim.
pub fn find_cnpj(text: &str) -> Option<String> {
    CNPJ.find(text).map(|m| m.as_str().to_string())
}

/// Highest-priority framing category whose marker occurs in `text`.
pub fn find_framing(text: &str) -> Option<Framing> {
    FRAMING_MARKERS
        .iter()
        .find(|(marker, _)| marker.is_match(text))
        .map(|(_, framing)| *framing)
}

/// Size of the worker pool: `workers_per_core` per core, capped at `max_workers`.
pub fn worker_count(parallelism: usize, config: &EnrichmentConfig) -> usize {
    config
        .workers
        .unwrap_or_else(|| {
            parallelism
                .saturating_mul(config.workers_per_core)
                .min(config.max_workers)
        })
        .max(1)
}

/// Worker count for this machine.
pub fn default_worker_count(config: &EnrichmentConfig) -> usize {
    let parallelism = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    worker_count(parallelism, config)
}

/// Fetches decree documents concurrently and fills `cnpj` and `framing`.
pub struct EnrichmentEngine<F: ?Sized> {
    fetcher: Arc<F>,
    base_url: Url,
    workers: usize,
}

impl<F> EnrichmentEngine<F>
where
    F: DocumentFetcher + ?Sized + 'static,
{
    pub fn new(fetcher: Arc<F>, base_url: &str, workers: usize) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ScanError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            fetcher,
            base_url,
            workers: workers.max(1),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Enrich every decree, returning them in completion order.
    ///
    /// The result always has as many decrees as the input.
    pub async fn enrich_all(&self, decrees: Vec<Decree>) -> Vec<Decree> {
        let total = decrees.len();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        tracing::info!(
            "Enriching {} decrees with {} workers",
            total,
            self.workers
        );

        for decree in decrees {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            let base_url = self.base_url.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let fallback = decree.clone();
                let number = decree.number;
                match AssertUnwindSafe(enrich_decree(fetcher.as_ref(), &base_url, decree))
                    .catch_unwind()
                    .await
                {
                    Ok(enriched) => enriched,
                    Err(_) => {
                        tracing::error!("Enrichment of decree {} panicked", number);
                        fallback
                    }
                }
            });
        }

        let mut enriched = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(decree) => enriched.push(decree),
                Err(e) => tracing::error!("Enrichment task failed: {}", e),
            }
        }

        let with_cnpj = enriched.iter().filter(|d| d.cnpj.is_some()).count();
        tracing::info!("Found CNPJ for {} of {} decrees", with_cnpj, total);
        enriched
    }
}

/// Enrich one decree, logging and swallowing any failure.
pub async fn enrich_decree<F>(fetcher: &F, base_url: &Url, mut decree: Decree) -> Decree
where
    F: DocumentFetcher + ?Sized,
{
    if let Err(e) = try_enrich(fetcher, base_url, &mut decree).await {
        tracing::warn!("Decree {}: {}", decree.number, e);
    }
    decree
}

async fn try_enrich<F>(fetcher: &F, base_url: &Url, decree: &mut Decree) -> Result<()>
where
    F: DocumentFetcher + ?Sized,
{
    let html = fetcher.fetch(&decree.link).await?;
    let primary = scan_document(&html, decree.needs_framing());

    if let Some(cnpj) = primary.cnpj {
        decree.cnpj = Some(cnpj);
    }
    if let Some(framing) = primary.framing {
        decree.framing = Some(framing);
        return Ok(());
    }

    if let Some(href) = primary.secondary_link {
        let url = resolve_link(base_url, &href);
        tracing::debug!("Decree {}: looking for framing in {}", decree.number, url);
        let html = fetcher.fetch(&url).await?;
        // Only framing is taken from the related norm; its CNPJ is ignored.
        decree.framing = scan_document(&html, true).framing;
    }
    Ok(())
}
