//! URL helpers shared by the retriever and the providers.

/// Error type for URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for crate::Error {
    fn from(err: UrlError) -> Self {
        crate::Error::InvalidUrl(err.to_string())
    }
}

/// Remove the `#...` suffix of a URL. Nothing else about the URL changes.
pub fn strip_fragment(input: &str) -> String {
    input.split_once('#').map_or(input, |(head, _)| head).to_string()
}

/// Parse an absolute `http`/`https` URL, dropping its fragment.
pub fn parse_web_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);
    Ok(parsed)
}
