//! Traversal of a paginated result set.
//!
//! The page selector only renders a window of page-number links at a time
//! (five on ALEPE). The [`Paginator`] visits the links of the visible window
//! one by one, then activates the advance control to reveal the next window,
//! until every page has been read.

use crate::error::{Result, ScanError};
use crate::parser::{self, ResultParser, PAGINATION_CONTAINER};
use crate::wait::wait_until;
use decree_browser::{BrowserActions, BrowserError};
use decree_core::{Decree, SearchConfig};
use url::Url;

/// Control revealing the next window of page links.
const NEXT_WINDOW_LINK: &str = "#lbtnProx";

/// Traversal state between two browser interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    /// Visiting page links of the current window; `remaining` links left.
    WithinWindow { remaining: u32 },
    /// Window exhausted, trying to reveal the next one.
    AdvancingWindow,
    Done,
}

/// Walks every result page of a search and collects its decrees.
pub struct Paginator<'a, B: ?Sized> {
    browser: &'a B,
    config: &'a SearchConfig,
    parser: ResultParser,
}

impl<'a, B> Paginator<'a, B>
where
    B: BrowserActions + ?Sized,
{
    /// Create a paginator for a search already submitted in `browser`.
    pub fn new(browser: &'a B, config: &'a SearchConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ScanError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            browser,
            config,
            parser: ResultParser::new(base_url),
        })
    }

    /// Read all `total_pages` pages, returning decrees in page then row order.
    ///
    /// A page whose link is not rendered is skipped. A page or window that
    /// never becomes active aborts the traversal with `ScanError::Timeout`.
    pub async fn scrape_all_pages(&self, total_pages: u32) -> Result<Vec<Decree>> {
        let window_size = self.config.window_size;
        let mut decrees = Vec::new();
        let mut current_page = 0;
        let mut state = Traversal::WithinWindow {
            remaining: window_size,
        };

        loop {
            state = match state {
                Traversal::WithinWindow { remaining: 0 } => Traversal::AdvancingWindow,
                Traversal::WithinWindow { remaining } => {
                    current_page += 1;
                    if current_page > total_pages {
                        Traversal::Done
                    } else {
                        if total_pages == 1 || self.activate_page(current_page).await? {
                            self.read_page(current_page, &mut decrees).await?;
                        } else {
                            tracing::warn!("Link for page {} not rendered, skipping", current_page);
                        }
                        Traversal::WithinWindow {
                            remaining: remaining - 1,
                        }
                    }
                }
                Traversal::AdvancingWindow => {
                    if current_page < total_pages && self.advance_window().await? {
                        Traversal::WithinWindow {
                            remaining: window_size,
                        }
                    } else {
                        Traversal::Done
                    }
                }
                Traversal::Done => {
                    tracing::info!(
                        "Collected {} decrees from {} page(s)",
                        decrees.len(),
                        total_pages
                    );
                    return Ok(decrees);
                }
            };
        }
    }

    /// Click the link of `page` and wait until it is reported active.
    ///
    /// Returns `false` when the link is not part of the rendered window.
    async fn activate_page(&self, page: u32) -> Result<bool> {
        let label = page.to_string();
        if !self
            .browser
            .click_link_with_text(PAGINATION_CONTAINER, &label)
            .await?
        {
            return Ok(false);
        }

        wait_until(
            self.browser,
            &format!("page {page} to become active"),
            self.config.wait_timeout(),
            self.config.poll_interval(),
            |html| parser::is_page_active(html, page),
        )
        .await?;
        Ok(true)
    }

    /// Reveal the next window of page links.
    ///
    /// Returns `false` when there is no advance control.
    async fn advance_window(&self) -> Result<bool> {
        match self.browser.click(NEXT_WINDOW_LINK).await {
            Ok(()) => {}
            Err(BrowserError::SelectorNotFound(_)) => {
                tracing::debug!("No further page window");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }

        wait_until(
            self.browser,
            "next page window to become active",
            self.config.wait_timeout(),
            self.config.poll_interval(),
            parser::is_first_of_window_active,
        )
        .await?;
        Ok(true)
    }

    async fn read_page(&self, page: u32, decrees: &mut Vec<Decree>) -> Result<()> {
        let html = self.browser.content().await?;
        let rows = self.parser.parse(&html);
        tracing::debug!("Page {}: {} decrees", page, rows.len());
        decrees.extend(rows);
        Ok(())
    }
}
