use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    api::execute_search,
    config::ScrollConfig,
    error::{Error, Result},
    request::{scroll_page_path, SearchRequest, SCROLL_ENDPOINT},
    response::{Hit, SearchResponse},
    scroll::progress::ScrollProgress,
    transport::Transport,
};

use std::marker::PhantomData;

pub(crate) const NO_SCROLL_ID: &str = "no scroll id on scroll response";

/// One logical export. Owned by the caller that started it; nothing is
/// shared between sessions.
pub struct ScrollSession<T, C> {
    transport: C,
    request: SearchRequest,
    config: ScrollConfig,
    cursor: Option<String>,
    progress: Option<ScrollProgress>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> ScrollSession<T, C>
where
    T: DeserializeOwned,
    C: Transport,
{
    pub fn new(transport: C, request: SearchRequest, config: ScrollConfig) -> Self {
        Self {
            transport,
            request,
            config,
            cursor: None,
            progress: None,
            _marker: PhantomData,
        }
    }

    /// Cursor to use for the next page. Replaced by every page fetch.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// `None` until the scroll has been opened.
    pub fn progress(&self) -> Option<&ScrollProgress> {
        self.progress.as_ref()
    }

    /// Runs the search with a scroll context attached and returns the first
    /// page. The total it reports is fixed for the rest of the session.
    pub async fn open_scroll(&mut self) -> Result<SearchResponse<T>> {
        self.config.validate()?;

        let path = self.request.scroll_path(self.config.ttl);
        let resp: SearchResponse<T> = execute_search(&self.transport, &path, &self.request).await?;

        let mut progress = ScrollProgress::new(resp.total_matched());
        progress.record(resp.hits().len());
        self.track(&progress);

        self.cursor = resp.cursor().map(str::to_owned);
        self.progress = Some(progress);

        Ok(resp)
    }

    /// Trades `cursor` for the next page, renewing its ttl. The cursor is
    /// dead afterwards; the session keeps the one from the new page.
    pub async fn fetch_page(&mut self, cursor: &str) -> Result<SearchResponse<T>> {
        if cursor.is_empty() {
            return Err(Error::ProtocolError(NO_SCROLL_ID.to_owned()));
        }

        let path = scroll_page_path(cursor, self.config.ttl);
        debug!("[{}] GET {}", self.request.tag(), SCROLL_ENDPOINT);
        let raw = self.transport.get(&path).await?.error_for_status()?;
        let resp = SearchResponse::<T>::parse(&raw.body)?;

        self.cursor = resp.cursor().map(str::to_owned);

        if let Some(mut progress) = self.progress {
            if resp.total_matched() != progress.total() {
                return Err(Error::ProtocolError(format!(
                    "scroll total changed from {} to {}",
                    progress.total(),
                    resp.total_matched()
                )));
            }
            progress.record(resp.hits().len());
            self.track(&progress);
            self.progress = Some(progress);
        }

        Ok(resp)
    }

    /// Advances the session by one page: opens the scroll on the first call,
    /// then fetches pages until the total is reached, after which it returns
    /// `Ok(None)` without touching the network.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Hit<T>>>> {
        let progress = match self.progress {
            Some(progress) => progress,
            None => {
                let resp = self.open_scroll().await?;
                return Ok(Some(resp.into_hits()));
            }
        };

        if progress.is_complete() {
            return Ok(None);
        }
        progress.ensure_not_stalled()?;

        let cursor = self
            .cursor
            .clone()
            .ok_or_else(|| Error::ProtocolError(NO_SCROLL_ID.to_owned()))?;

        let resp = self.fetch_page(&cursor).await?;
        Ok(Some(resp.into_hits()))
    }

    /// Collects every page in server order. Either the whole result set comes
    /// back or the session fails; there is no partial result.
    pub async fn drain_all(mut self) -> Result<Vec<Hit<T>>> {
        let mut accumulated = Vec::new();

        loop {
            match self.next_page().await {
                Ok(Some(page)) => accumulated.extend(page),
                Ok(None) => break,
                Err(err) => {
                    self.abort().await;
                    return Err(err);
                }
            }
        }

        info!(
            "[{}] scroll finished with {} hits",
            self.request.tag(),
            accumulated.len()
        );

        Ok(accumulated)
    }

    /// Releases the server-side cursor ahead of its ttl.
    pub async fn clear(&mut self) -> Result<()> {
        let cursor = match self.cursor.take() {
            Some(cursor) => cursor,
            None => return Ok(()),
        };

        self.transport
            .delete(SCROLL_ENDPOINT, json!({ "scroll_id": [cursor] }))
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub(crate) async fn abort(&mut self) {
        if !self.config.clear_on_abort {
            return;
        }

        if let Err(err) = self.clear().await {
            warn!("[{}] cannot clear scroll: {}", self.request.tag(), err);
        }
    }

    fn track(&self, progress: &ScrollProgress) {
        debug!(
            "[{}] scroll page of {} hits, {}/{}",
            self.request.tag(),
            progress.last_page(),
            progress.seen(),
            progress.total()
        );
    }
}
