use crate::error::{BrowserError, Result};

/// Browser actions for automation
///
/// Implementations drive a single page; callers own the session and never
/// issue actions concurrently.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Replace the value of an input field by selector
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Choose an option of a `<select>` by value and fire its change event
    async fn select_value(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Click the first link under `container` whose trimmed text equals `text`.
    ///
    /// Returns `false` when no such link is rendered.
    async fn click_link_with_text(&self, container: &str, text: &str) -> Result<bool>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Extract text from an element, `None` when it is not rendered
    async fn extract_text(&self, selector: &str) -> Result<Option<String>>;

    /// Current rendered markup of the page
    async fn content(&self) -> Result<String>;
}

/// Quote a string as a JavaScript literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Script clicking the element matched by `selector`, evaluating to whether it existed.
pub(crate) fn click_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
        js_string(selector)
    )
}

/// Script clicking the first `a` under `container` whose text equals `text`.
pub(crate) fn click_link_script(container: &str, text: &str) -> String {
    format!(
        "(() => {{ const links = document.querySelectorAll({} + ' a'); \
         for (const a of links) {{ if (a.textContent.trim() === {}) {{ a.click(); return true; }} }} \
         return false; }})()",
        js_string(container),
        js_string(text)
    )
}

/// Script setting a select's value and dispatching `change`, evaluating to whether it existed.
pub(crate) fn select_script(selector: &str, value: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (!el) return false; \
         el.value = {}; el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
        js_string(selector),
        js_string(value)
    )
}

/// Script clearing an input's value, evaluating to whether it existed.
pub(crate) fn clear_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (!el) return false; el.value = ''; return true; }})()",
        js_string(selector)
    )
}

/// Parse a navigation target, rejecting URLs without a host.
pub(crate) fn parse_target(url: &str) -> Result<url::Url> {
    let parsed =
        url::Url::parse(url).map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
    if parsed.host_str().is_none() {
        return Err(BrowserError::NavigationError(format!("{url}: no host")));
    }
    Ok(parsed)
}
