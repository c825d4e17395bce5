use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::ScrollConfig,
    error::Result,
    request::{admin_path, SearchRequest},
    response::{CatIndicesResponse, Hit, SearchResponse},
    scroll::{ScrollSession, ScrollStream},
    transport::Transport,
};

pub(crate) async fn execute_search<T, C>(
    transport: &C,
    path: &str,
    request: &SearchRequest,
) -> Result<SearchResponse<T>>
where
    T: DeserializeOwned,
    C: Transport,
{
    let raw = match request.query() {
        Some(body) => {
            debug!("[{}] POST {}", request.tag(), path);
            transport.post(path, body.clone()).await?
        }
        None => {
            debug!("[{}] GET {}", request.tag(), path);
            transport.get(path).await?
        }
    };

    let resp = SearchResponse::<T>::parse(&raw.error_for_status()?.body)?;

    match resp.took_millis() {
        Some(took) => info!(
            "[{}] search returned {} of {} hits in {}ms",
            request.tag(),
            resp.hits().len(),
            resp.total_matched(),
            took
        ),
        None => info!(
            "[{}] search returned {} of {} hits",
            request.tag(),
            resp.hits().len(),
            resp.total_matched()
        ),
    }

    Ok(resp)
}

pub async fn search<T, C>(transport: &C, request: &SearchRequest) -> Result<SearchResponse<T>>
where
    T: DeserializeOwned,
    C: Transport,
{
    execute_search(transport, &request.search_path(), request).await
}

/// Count-only search. Aggregations in the query still come back.
pub async fn count<C: Transport>(
    transport: &C,
    request: &SearchRequest,
) -> Result<SearchResponse<Value>> {
    execute_search(transport, &request.count_path(), request).await
}

/// GET against an administrative endpoint such as `_cluster/health` or the
/// cat APIs, returning the raw body. Search paths are refused before any
/// request is made.
pub async fn basic_get<C: Transport>(transport: &C, path: &str, verbose: bool) -> Result<String> {
    let path = admin_path(path, verbose)?;
    debug!("GET {}", path);
    Ok(transport.get(&path).await?.error_for_status()?.body)
}

pub async fn cat_indices<C: Transport>(transport: &C) -> Result<Vec<CatIndicesResponse>> {
    let body = basic_get(transport, "_cat/indices?format=json", false).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Every hit matching `request`, in server order.
pub async fn export<T, C>(
    transport: C,
    request: SearchRequest,
    config: ScrollConfig,
) -> Result<Vec<Hit<T>>>
where
    T: DeserializeOwned,
    C: Transport,
{
    ScrollSession::new(transport, request, config)
        .drain_all()
        .await
}

/// Page-by-page variant of [`export`].
pub fn scroll<T, C>(transport: C, request: SearchRequest, config: ScrollConfig) -> ScrollStream<T, C>
where
    T: DeserializeOwned + Send + 'static,
    C: Transport + Send + Sync + 'static,
{
    ScrollStream::new(ScrollSession::new(transport, request, config))
}
