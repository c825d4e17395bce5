use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::Result,
    response::common::{Hit, HitsWrapper},
};

/// One page of search results, whether from a plain search, a count or a
/// scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T = Value> {
    #[serde(rename = "_scroll_id")]
    pub scroll_id: Option<String>,
    pub took: Option<u64>,
    pub timed_out: Option<bool>,
    pub hits: HitsWrapper<T>,
    pub aggregations: Option<Value>,
}

impl<T: DeserializeOwned> SearchResponse<T> {
    /// Strict parse: malformed JSON or a missing `hits` object is an error,
    /// an empty hit list is not.
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> SearchResponse<T> {
    pub fn total_matched(&self) -> u64 {
        self.hits.total.value()
    }

    pub fn cursor(&self) -> Option<&str> {
        self.scroll_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn took_millis(&self) -> Option<u64> {
        self.took
    }

    pub fn hits(&self) -> &[Hit<T>] {
        &self.hits.hits
    }

    pub fn into_hits(self) -> Vec<Hit<T>> {
        self.hits.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, response::HitsTotal};
    use serde_json::json;

    #[test]
    fn test_deserialize_scroll_open_response() {
        let resp_str = r#"{
  "_scroll_id": "DXF1ZXJ5QW5kRmV0Y2gBAAAAAAAAAD4WYm9laVYtZndUQlNsdDcwakFMNjU1QQ==",
  "took": 12,
  "hits": {
    "total": { "value": 3, "relation": "eq" },
    "hits": [
      { "_id": "1", "_source": { "user": "kimchy" } },
      { "_id": "2", "_source": { "user": "ana" } }
    ]
  }
}"#;

        let resp = SearchResponse::<Value>::parse(resp_str).unwrap();
        assert_eq!(resp.total_matched(), 3);
        assert_eq!(resp.took_millis(), Some(12));
        assert!(resp.cursor().unwrap().starts_with("DXF1ZXJ5"));
        assert_eq!(resp.hits().len(), 2);
        assert_eq!(resp.hits()[1].id, "2");
        assert_eq!(resp.hits()[1].source, Some(json!({ "user": "ana" })));
    }

    #[test]
    fn test_deserialize_legacy_total_without_hits() {
        let resp_str = r#"{
  "took": 1,
  "hits": { "total": 0 },
  "aggregations": { "by_user": { "buckets": [] } }
}"#;

        let resp = SearchResponse::<Value>::parse(resp_str).unwrap();
        assert_eq!(resp.hits.total, HitsTotal::Count(0));
        assert!(resp.hits().is_empty());
        assert!(resp.cursor().is_none());
        assert!(resp.aggregations.is_some());
    }

    #[test]
    fn test_missing_hits_is_parse_error() {
        let err = SearchResponse::<Value>::parse(r#"{"took": 3}"#).unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        let err = SearchResponse::<Value>::parse(r#"{"hits": {"total": 1, "hits": [{"_id":"#)
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_parse_is_repeatable() {
        let resp_str = r#"{"_scroll_id":"abc","hits":{"total":2,"hits":[{"_id":"a"},{"_id":"b"}]}}"#;
        let first = SearchResponse::<Value>::parse(resp_str).unwrap();
        let second = SearchResponse::<Value>::parse(resp_str).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_scroll_id_is_no_cursor() {
        let resp = SearchResponse::<Value>::parse(r#"{"_scroll_id":"","hits":{"total":1}}"#)
            .unwrap();
        assert!(resp.cursor().is_none());
    }

    #[test]
    fn test_typed_source() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Tweet {
            user: String,
        }

        let resp = SearchResponse::<Tweet>::parse(
            r#"{"hits":{"total":1,"hits":[{"_id":"1","_source":{"user":"kimchy"}}]}}"#,
        )
        .unwrap();
        assert_eq!(
            resp.into_hits()[0].source,
            Some(Tweet {
                user: "kimchy".to_owned()
            })
        );
    }
}
