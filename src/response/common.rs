use serde::{Deserialize, Serialize};

/// Hit list of a search or scroll page. `hits` is absent rather than empty
/// when the response filter finds no documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsWrapper<T> {
    pub total: HitsTotal,
    pub max_score: Option<f32>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

/// Older clusters report the total as a bare number, newer ones as an
/// object with a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitsTotal {
    Count(u64),
    Tracked { value: u64, relation: String },
}

impl HitsTotal {
    pub fn value(&self) -> u64 {
        match *self {
            HitsTotal::Count(n) | HitsTotal::Tracked { value: n, .. } => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_index")]
    pub index: Option<String>,
    #[serde(rename = "_type")]
    pub ty: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f32>,
    #[serde(rename = "_source")]
    pub source: Option<T>,
}
