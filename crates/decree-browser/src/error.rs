use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

/// Failures while driving the search page.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Chromium could not be launched or the DevTools session broke
    #[error("chromium session failed: {0}")]
    ChromiumError(String),

    /// Page load failed or the target URL is malformed
    #[error("could not load {0}")]
    NavigationError(String),

    /// No rendered element matches the selector
    #[error("no element matches {0}")]
    SelectorNotFound(String),

    /// Element did not appear in time
    #[error("gave up waiting: {0}")]
    Timeout(String),

    /// Injected script threw or returned an unexpected value
    #[error("script evaluation failed: {0}")]
    ScriptError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::NavigationError("https://legis.alepe.pe.gov.br/".to_string());
        assert_eq!(err.to_string(), "could not load https://legis.alepe.pe.gov.br/");
    }

    #[test]
    fn test_selector_error() {
        let err = BrowserError::SelectorNotFound("#lbtnProx".to_string());
        assert_eq!(err.to_string(), "no element matches #lbtnProx");
    }

    #[test]
    fn test_timeout_error() {
        let err = BrowserError::Timeout("#lblQtd".to_string());
        assert_eq!(err.to_string(), "gave up waiting: #lblQtd");
    }
}
