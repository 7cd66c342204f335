//! Search form setup and page-count derivation.

use crate::error::{Result, ScanError};
use crate::parser;
use crate::wait::wait_until;
use decree_browser::BrowserActions;
use decree_core::{DateRange, SearchConfig};

/// "Decreto" entry of the norm-type checklist.
const DECREE_TYPE_CHECKBOX: &str = "#cblTipoNorma_3";
/// Tab revealing the publication-date filter.
const PUBLICATION_TAB: &str = "#li-publicacao";
const START_DATE_INPUT: &str = "#tbxDataInicialPublicacao";
const END_DATE_INPUT: &str = "#tbxDataFinalPublicacao";
const SEARCH_BUTTON: &str = "#btnPesquisar";
const RESULT_COUNT_LABEL: &str = "#lblQtd";
const PAGE_SIZE_SELECT: &str = "#ddlTamPagina";

/// Number of result pages for `total` results.
///
/// Counts up to `single_page_limit` fit the default page; larger counts are
/// split into pages of `page_size`.
pub fn total_pages(total: u32, page_size: u32, single_page_limit: u32) -> u32 {
    if total <= single_page_limit {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Parse the reported result count, tolerating thousands separators.
pub fn parse_result_count(text: &str) -> Result<u32> {
    let digits: String = text.trim().chars().filter(|c| *c != '.').collect();
    digits
        .parse()
        .map_err(|_| ScanError::ResultCount(text.to_string()))
}

/// Open the advanced search, restrict it to decrees published in `range` and submit.
pub async fn setup_search<B>(browser: &B, config: &SearchConfig, range: &DateRange) -> Result<()>
where
    B: BrowserActions + ?Sized,
{
    tracing::info!("Searching decrees published {}", range);

    browser.navigate(&config.search_url()).await?;
    browser.click(DECREE_TYPE_CHECKBOX).await?;
    browser.click(PUBLICATION_TAB).await?;
    browser
        .wait_for_selector(START_DATE_INPUT, timeout_ms(config))
        .await?;

    browser
        .fill_field(START_DATE_INPUT, &range.start_label())
        .await?;
    browser.fill_field(END_DATE_INPUT, &range.end_label()).await?;
    browser.click(SEARCH_BUTTON).await?;
    Ok(())
}

/// Read the result count and switch to large pages when needed.
///
/// Returns the number of pages the pagination controller must visit.
pub async fn configure_page_size<B>(browser: &B, config: &SearchConfig) -> Result<u32>
where
    B: BrowserActions + ?Sized,
{
    browser
        .wait_for_selector(RESULT_COUNT_LABEL, timeout_ms(config))
        .await?;
    let label = browser
        .extract_text(RESULT_COUNT_LABEL)
        .await?
        .unwrap_or_default();
    let total = parse_result_count(&label)?;
    let pages = total_pages(total, config.page_size, config.single_page_limit);
    tracing::info!("Search reported {} decrees over {} page(s)", total, pages);

    if total > config.single_page_limit {
        browser
            .select_value(PAGE_SIZE_SELECT, &config.page_size.to_string())
            .await?;
        let expected_rows = usize::try_from(total.min(config.page_size)).unwrap_or(usize::MAX);
        wait_until(
            browser,
            "results table to render the selected page size",
            config.wait_timeout(),
            config.poll_interval(),
            |html| parser::result_row_count(html) >= expected_rows,
        )
        .await?;
    }

    Ok(pages)
}

fn timeout_ms(config: &SearchConfig) -> u64 {
    config.wait_timeout_secs.saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_single_page() {
        assert_eq!(total_pages(0, 200, 100), 1);
        assert_eq!(total_pages(57, 200, 100), 1);
        assert_eq!(total_pages(100, 200, 100), 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(101, 200, 100), 1);
        assert_eq!(total_pages(200, 200, 100), 1);
        assert_eq!(total_pages(201, 200, 100), 2);
        assert_eq!(total_pages(450, 200, 100), 3);
        assert_eq!(total_pages(1000, 200, 100), 5);
    }

    #[test]
    fn test_parse_result_count() {
        assert_eq!(parse_result_count(" 450 ").expect("valid count"), 450);
        assert_eq!(parse_result_count("1.204").expect("valid count"), 1204);
        assert!(matches!(
            parse_result_count("nenhum"),
            Err(ScanError::ResultCount(_))
        ));
    }
}
