use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use crate::error::{Error, Result};

use std::{fmt, time::Duration};

/// Response fields kept by every search, count and scroll request.
pub const FILTER_PATH: &str =
    "_scroll_id,took,hits.hits._id,hits.hits._source,hits.total,aggregations";

pub const SEARCH_ENDPOINT: &str = "_search";
pub const SCROLL_ENDPOINT: &str = "/_search/scroll";

/// A one-shot query against `{index}/{type}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    index: String,
    doc_type: Option<String>,
    body: Option<Value>,
    label: Option<String>,
}

impl SearchRequest {
    /// An empty index searches every index.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            body: None,
            label: None,
        }
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Free-text tag that only shows up in log lines.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn query(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn tag(&self) -> RequestLabel<'_> {
        RequestLabel(self.label.as_deref())
    }

    pub fn search_path(&self) -> String {
        format!(
            "{}?request_cache=true&filter_path={}",
            self.endpoint(),
            FILTER_PATH
        )
    }

    pub fn count_path(&self) -> String {
        format!("{}&search_type=count", self.search_path())
    }

    pub fn scroll_path(&self, ttl: Duration) -> String {
        format!("{}&scroll={}", self.search_path(), format_ttl(ttl))
    }

    fn endpoint(&self) -> String {
        let mut segments: Vec<&str> = Vec::with_capacity(3);
        if !self.index.is_empty() {
            segments.push(&self.index);
            if let Some(ref ty) = self.doc_type {
                segments.push(ty);
            }
        }
        segments.push(SEARCH_ENDPOINT);
        segments.join("/")
    }
}

/// Log-friendly view of an optional request label.
pub struct RequestLabel<'a>(Option<&'a str>);

impl fmt::Display for RequestLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0.unwrap_or("-"))
    }
}

/// Path that fetches the next page of a scroll and renews its ttl.
pub fn scroll_page_path(cursor: &str, ttl: Duration) -> String {
    format!(
        "{}?scroll={}&scroll_id={}&filter_path={}",
        SCROLL_ENDPOINT,
        format_ttl(ttl),
        byte_serialize(cursor.as_bytes()).collect::<String>(),
        FILTER_PATH
    )
}

/// Path for administrative reads. Anything that touches the search
/// endpoint has to go through [`SearchRequest`] instead.
pub fn admin_path(path: &str, verbose: bool) -> Result<String> {
    if path.contains(SEARCH_ENDPOINT) {
        return Err(Error::UsageError(format!(
            "`{}` targets the search endpoint, use search or scroll instead",
            path
        )));
    }

    if !verbose {
        return Ok(path.to_owned());
    }

    let sep = if path.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}v", path, sep))
}

/// Elasticsearch time unit for a ttl, e.g. `3m`, `90s` or `1500ms`.
pub fn format_ttl(ttl: Duration) -> String {
    let millis = ttl.as_millis();
    if millis % 60_000 == 0 {
        format!("{}m", millis / 60_000)
    } else if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{}ms", millis)
    }
}
