//! Test doubles standing in for the ALEPE search UI and the document server.

#![allow(dead_code)]

use decree_browser::{BrowserActions, BrowserError};
use decree_core::SearchConfig;
use decree_scanner::{DocumentFetcher, ScanError};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Mutex;

pub const BASE_URL: &str = "https://legis.alepe.pe.gov.br/";

/// Rows rendered before a larger page size is chosen.
const DEFAULT_PAGE_SIZE: u32 = 100;

/// A decree row as listed in the results table.
#[derive(Debug, Clone)]
pub struct Row {
    pub number: i64,
    pub id: i64,
    pub summary: String,
}

impl Row {
    pub fn new(number: i64, id: i64, summary: &str) -> Self {
        Self {
            number,
            id,
            summary: summary.to_string(),
        }
    }

    /// Absolute document URL the parser resolves for this row.
    pub fn link(&self) -> String {
        format!("{BASE_URL}texto.aspx?id={}", self.id)
    }
}

#[derive(Debug)]
struct UiState {
    submitted: bool,
    page_size: u32,
    active_page: u32,
    window_start: u32,
    fields: HashMap<String, String>,
    clicks: Vec<String>,
}

/// In-memory result listing driven through `BrowserActions`.
///
/// `total` is the count reported by the site; `rows` are placed on the pages
/// by index, the remaining slots of each page render as blank rows.
#[derive(Debug)]
pub struct FakeBrowser {
    total: u32,
    rows: Vec<Row>,
    window_size: u32,
    /// Page whose link is clicked but never becomes active.
    stuck_page: Option<u32>,
    /// Page whose link is never rendered.
    hidden_page: Option<u32>,
    state: Mutex<UiState>,
}

impl FakeBrowser {
    pub fn new(total: u32, rows: Vec<Row>) -> Self {
        Self {
            total,
            rows,
            window_size: 5,
            stuck_page: None,
            hidden_page: None,
            state: Mutex::new(UiState {
                submitted: false,
                page_size: DEFAULT_PAGE_SIZE,
                active_page: 1,
                window_start: 1,
                fields: HashMap::new(),
                clicks: Vec::new(),
            }),
        }
    }

    /// Start with the search already submitted at `page_size` rows per page.
    pub fn submitted(self, page_size: u32) -> Self {
        {
            let mut state = self.state.lock().expect("state lock");
            state.submitted = true;
            state.page_size = page_size;
        }
        self
    }

    pub fn with_stuck_page(mut self, page: u32) -> Self {
        self.stuck_page = Some(page);
        self
    }

    pub fn with_hidden_page(mut self, page: u32) -> Self {
        self.hidden_page = Some(page);
        self
    }

    /// Every click, in order; page links are recorded as `page:N`.
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().expect("state lock").clicks.clone()
    }

    pub fn page_clicks(&self) -> Vec<String> {
        self.clicks()
            .into_iter()
            .filter(|c| c.starts_with("page:"))
            .collect()
    }

    pub fn field(&self, selector: &str) -> Option<String> {
        self.state
            .lock()
            .expect("state lock")
            .fields
            .get(selector)
            .cloned()
    }

    fn page_count(&self, page_size: u32) -> u32 {
        self.total.div_ceil(page_size).max(1)
    }

    fn visible_pages(&self, state: &UiState) -> Vec<u32> {
        let last = self.page_count(state.page_size);
        (state.window_start..state.window_start + self.window_size)
            .filter(|page| *page <= last && Some(*page) != self.hidden_page)
            .collect()
    }

    fn has_next_window(&self, state: &UiState) -> bool {
        state.window_start + self.window_size <= self.page_count(state.page_size)
    }

    fn render(&self, state: &UiState) -> String {
        let mut html = String::from("<html><body>");
        if !state.submitted {
            html.push_str("<form id=\"pesquisa\"></form></body></html>");
            return html;
        }

        let _ = write!(html, "<span id=\"lblQtd\">{}</span>", self.total);
        html.push_str("<section id=\"secResultado\"><table><tbody>");

        let offset = (state.active_page - 1) * state.page_size;
        let on_page = self.total.saturating_sub(offset).min(state.page_size);
        let start = offset as usize;
        let end = (offset + on_page) as usize;
        for index in start..end {
            match self.rows.get(index) {
                Some(row) => {
                    let _ = write!(
                        html,
                        "<tr><td><span class=\"nome-norma\"><a href=\"texto.aspx?id={}\">Decreto nº {}</a></span>\
                         <span class=\"publicacao\">Publicado em 05/03/2024</span></td>\
                         <td class=\"ementa-norma\"><div class=\"fLeft\">{}</div></td></tr>",
                        row.id,
                        format_number(row.number),
                        row.summary
                    );
                }
                None => html.push_str("<tr><td></td></tr>"),
            }
        }
        html.push_str("</tbody></table></section>");

        if self.page_count(state.page_size) > 1 {
            html.push_str("<nav class=\"nav-pagination\">");
            for (position, page) in (state.window_start..state.window_start + self.window_size)
                .enumerate()
                .filter(|(_, page)| self.visible_pages(state).contains(page))
            {
                let class = if page == state.active_page { "active" } else { "" };
                let _ = write!(
                    html,
                    "<a id=\"lbtn{}\" class=\"{class}\">{page}</a>",
                    position + 1
                );
            }
            if self.has_next_window(state) {
                html.push_str("<a id=\"lbtnProx\">Próximo</a>");
            }
            html.push_str("</nav>");
        }

        html.push_str("</body></html>");
        html
    }
}

/// `51234` as `51.234`, the way the listing prints decree numbers.
fn format_number(number: i64) -> String {
    let digits = number.to_string();
    if digits.len() > 3 {
        let (head, tail) = digits.split_at(digits.len() - 3);
        format!("{head}.{tail}")
    } else {
        digits
    }
}

#[async_trait::async_trait]
impl BrowserActions for FakeBrowser {
    async fn navigate(&self, url: &str) -> decree_browser::Result<()> {
        self.state
            .lock()
            .expect("state lock")
            .clicks
            .push(format!("navigate:{url}"));
        Ok(())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> decree_browser::Result<()> {
        self.state
            .lock()
            .expect("state lock")
            .fields
            .insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn select_value(&self, selector: &str, value: &str) -> decree_browser::Result<()> {
        if selector != "#ddlTamPagina" {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        let size = value
            .parse()
            .map_err(|_| BrowserError::ScriptError(format!("bad page size {value}")))?;
        let mut state = self.state.lock().expect("state lock");
        state.page_size = size;
        state.active_page = 1;
        state.window_start = 1;
        Ok(())
    }

    async fn click(&self, selector: &str) -> decree_browser::Result<()> {
        let mut state = self.state.lock().expect("state lock");
        match selector {
            "#btnPesquisar" => state.submitted = true,
            "#lbtnProx" => {
                if !state.submitted || !self.has_next_window(&state) {
                    return Err(BrowserError::SelectorNotFound(selector.to_string()));
                }
                state.window_start += self.window_size;
                state.active_page = state.window_start;
            }
            _ => {}
        }
        state.clicks.push(selector.to_string());
        Ok(())
    }

    async fn click_link_with_text(
        &self,
        _container: &str,
        text: &str,
    ) -> decree_browser::Result<bool> {
        let mut state = self.state.lock().expect("state lock");
        let Ok(page) = text.parse::<u32>() else {
            return Ok(false);
        };
        if !self.visible_pages(&state).contains(&page) {
            return Ok(false);
        }
        state.clicks.push(format!("page:{page}"));
        if Some(page) != self.stuck_page {
            state.active_page = page;
        }
        Ok(true)
    }

    async fn wait_for_selector(&self, selector: &str, _timeout_ms: u64) -> decree_browser::Result<()> {
        let state = self.state.lock().expect("state lock");
        if selector == "#lblQtd" && !state.submitted {
            return Err(BrowserError::Timeout(selector.to_string()));
        }
        Ok(())
    }

    async fn extract_text(&self, selector: &str) -> decree_browser::Result<Option<String>> {
        let state = self.state.lock().expect("state lock");
        Ok((selector == "#lblQtd" && state.submitted).then(|| self.total.to_string()))
    }

    async fn content(&self) -> decree_browser::Result<String> {
        let state = self.state.lock().expect("state lock");
        Ok(self.render(&state))
    }
}

/// Document server backed by a map of URL to body; unknown URLs fail with 404.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(url.into(), html.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> decree_scanner::Result<String> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(url.to_string());
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| ScanError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Search settings with short waits for tests.
pub fn fast_search_config() -> SearchConfig {
    SearchConfig {
        base_url: BASE_URL.to_string(),
        wait_timeout_secs: 1,
        poll_interval_ms: 5,
        ..SearchConfig::default()
    }
}

/// Rows numbered from `first`, one per result slot, with neutral summaries.
pub fn filler_rows(first: i64, count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let number = first + i as i64;
            Row::new(number, 80_000 + number, "Aprova o regulamento do ICMS.")
        })
        .collect()
}
