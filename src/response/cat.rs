use serde::{Deserialize, Serialize};

/// One row of `_cat/indices?format=json`. Closed indices leave the counters
/// and sizes out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatIndicesResponse {
    pub health: Option<String>,
    pub status: String,
    pub index: String,
    pub uuid: String,
    pub pri: Option<String>,
    pub rep: Option<String>,
    #[serde(rename = "docs.count")]
    pub docs_count: Option<String>,
    #[serde(rename = "docs.deleted")]
    pub docs_deleted: Option<String>,
    #[serde(rename = "store.size")]
    pub store_size: Option<String>,
    #[serde(rename = "pri.store.size")]
    pub pri_store_size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_cat_indices() {
        let resp_str = r#"[
  {
    "health": "yellow",
    "status": "open",
    "index": "twitter",
    "uuid": "u8FNjxh8Rfy_awN11oDKYQ",
    "pri": "1",
    "rep": "1",
    "docs.count": "1200",
    "docs.deleted": "0",
    "store.size": "88.1kb",
    "pri.store.size": "88.1kb"
  },
  {
    "health": null,
    "status": "close",
    "index": "archive",
    "uuid": "nYFWZEO7TUiOjLQXBaYJpA",
    "pri": null,
    "rep": null,
    "docs.count": null,
    "docs.deleted": null,
    "store.size": null,
    "pri.store.size": null
  }
]"#;

        let rows: Vec<CatIndicesResponse> = serde_json::from_str(resp_str).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].docs_count.as_deref(), Some("1200"));
        assert_eq!(rows[1].status, "close");
        assert!(rows[1].store_size.is_none());
    }
}
