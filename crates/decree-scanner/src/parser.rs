use crate::extract;
use decree_core::Decree;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Container of the page-number links.
pub const PAGINATION_CONTAINER: &str = "nav.nav-pagination";

/// Id of the first link of every page window.
pub const FIRST_WINDOW_LINK_ID: &str = "lbtn1";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static ROW: Lazy<Selector> = Lazy::new(|| selector("#secResultado tbody tr"));
static NAME_ANCHOR: Lazy<Selector> = Lazy::new(|| selector("span.nome-norma > a"));
static PUBLICATION: Lazy<Selector> = Lazy::new(|| selector("span.publicacao"));
static SUMMARY: Lazy<Selector> = Lazy::new(|| selector("td.ementa-norma > div.fLeft"));
static PAGE_LINK: Lazy<Selector> = Lazy::new(|| selector("nav.nav-pagination a"));

/// A page-selector link as currently rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub id: Option<String>,
    pub label: String,
    pub active: bool,
}

/// Reads decree rows out of a rendered result page.
pub struct ResultParser {
    base_url: Url,
}

impl ResultParser {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Decrees on the page, in document order.
    ///
    /// Rows missing the name link or the summary are skipped.
    pub fn parse(&self, html: &str) -> Vec<Decree> {
        let document = Html::parse_document(html);
        document
            .select(&ROW)
            .filter_map(|row| self.parse_row(&row))
            .collect()
    }

    fn parse_row(&self, row: &ElementRef) -> Option<Decree> {
        let anchor = row.select(&NAME_ANCHOR).next()?;
        let href = anchor.value().attr("href")?;
        let summary = row.select(&SUMMARY).next()?;

        let number = extract::decree_number(&element_text(&anchor));
        let publish_date = row
            .select(&PUBLICATION)
            .next()
            .map(|span| extract::publish_date(&element_text(&span)))
            .unwrap_or_default();

        Some(Decree::new(
            number,
            publish_date,
            resolve_link(&self.base_url, href),
            element_text(&summary),
            extract::link_id(href),
        ))
    }
}

/// Text of an element with whitespace runs collapsed to single spaces.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a possibly relative link against the site base.
pub fn resolve_link(base: &Url, href: &str) -> String {
    base.join(href).map_or_else(
        |_| format!("{}{}", base.as_str(), href.trim_start_matches('/')),
        String::from,
    )
}

/// Page-number links of the rendered page selector.
pub fn pagination_links(html: &str) -> Vec<PageLink> {
    let document = Html::parse_document(html);
    document
        .select(&PAGE_LINK)
        .map(|link| PageLink {
            id: link.value().id().map(str::to_string),
            label: element_text(&link),
            active: link.value().classes().any(|class| class == "active"),
        })
        .collect()
}

/// Whether `page` is the active link of the page selector.
pub fn is_page_active(html: &str, page: u32) -> bool {
    let label = page.to_string();
    pagination_links(html)
        .iter()
        .any(|link| link.active && link.label == label)
}

/// Whether the first link of a page window is the active one.
pub fn is_first_of_window_active(html: &str) -> bool {
    pagination_links(html)
        .iter()
        .find(|link| link.active)
        .is_some_and(|link| link.id.as_deref() == Some(FIRST_WINDOW_LINK_ID))
}

/// Number of rows rendered in the results table.
pub fn result_row_count(html: &str) -> usize {
    let document = Html::parse_document(html);
    document.select(&ROW).count()
}
