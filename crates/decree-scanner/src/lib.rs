//! Decree Scanner - Harvesting pipeline for ALEPE decrees.
//!
//! This crate walks the paginated results of an ALEPE legislative search,
//! classifies the decrees against the PRODEPE and PROIND incentive programs,
//! and enriches the classified ones with the company CNPJ and framing found
//! in each decree's text.
//!
//! # Features
//!
//! - Two-level pagination over a page selector that only shows a window of links
//! - Bounded polling of the rendered page state with fatal timeouts
//! - Order-preserving program classification of decree summaries
//! - Concurrent document enrichment with a bounded worker pool
//! - Retry with exponential backoff for transient HTTP failures
//! - JSON and CSV export
//!
//! # Example
//!
//! ```rust,ignore
//! use decree_scanner::{HarvestOrchestrator, HttpClient};
//! use std::sync::Arc;
//!
//! let orchestrator = HarvestOrchestrator::new(
//!     Arc::new(browser_engine),
//!     Arc::new(HttpClient::new(&config.http, workers)?),
//!     config,
//!     workers,
//! );
//!
//! let report = orchestrator.run(&DateRange::month(3, 2024)?).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod classifier;
#[allow(missing_docs)]
pub mod enrichment;
#[allow(missing_docs)]
pub mod error;
pub mod export;
#[allow(missing_docs)]
pub mod extract;
pub mod http;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod pagination;
#[allow(missing_docs)]
pub mod parser;
pub mod search;
pub mod wait;

// Re-export commonly used types
pub use classifier::{classify, classify_decree};
pub use enrichment::{default_worker_count, EnrichmentEngine};
pub use error::{Result, ScanError};
pub use http::{DocumentFetcher, HttpClient, RetryPolicy};
pub use orchestrator::{HarvestOrchestrator, HarvestReport};
pub use pagination::Paginator;
pub use parser::{PageLink, ResultParser};
