pub mod cat;
pub mod common;
pub mod search;

pub use cat::CatIndicesResponse;
pub use common::{Hit, HitsTotal, HitsWrapper};
pub use search::SearchResponse;
