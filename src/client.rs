use actix::{
    fut::{err, ok},
    prelude::*,
};
use backoff::{backoff::Backoff, ExponentialBackoff};
use log::error;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    api,
    config::{EsConfig, ScrollConfig},
    error::{Error, Result},
    request::{admin_path, SearchRequest},
    response::{CatIndicesResponse, Hit, SearchResponse},
    scroll::ScrollStream,
    transport::{EsTransport, Transport},
};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

use std::{
    convert::Infallible,
    io::{Error as IoError, ErrorKind},
    marker::PhantomData,
    time::{Duration, Instant},
};

pub struct EsClient<T> {
    config: EsConfig,
    hb: Instant,
    transport: Option<EsTransport>,
    backoff: ExponentialBackoff,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned + Send + Unpin + 'static> EsClient<T> {
    pub fn new(config: EsConfig) -> Result<EsClient<T>> {
        config.url()?;

        let mut backoff = ExponentialBackoff::default();
        backoff.max_elapsed_time = None;

        Ok(Self {
            config,
            hb: Instant::now(),
            transport: None,
            backoff,
            _marker: PhantomData,
        })
    }

    /// Scroll settings for a request, falling back to the client's ttl.
    fn scroll_config(&self, ttl: Option<Duration>) -> ScrollConfig {
        let config = self.config.scroll_config();
        match ttl {
            Some(ttl) => config.with_ttl(ttl),
            None => config,
        }
    }

    fn hb(&self, ctx: &mut <Self as Actor>::Context) {
        ctx.notify(EsCmd::<T>::Ping);

        ctx.run_later(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                error!("elasticsearch heartbeat failed, disconnecting!");
                ctx.stop()
            } else {
                act.hb(ctx)
            }
        });
    }

    fn init(&mut self, ctx: &mut <Self as Actor>::Context) {
        match EsTransport::new(&self.config) {
            Ok(transport) => {
                self.transport = Some(transport);
            }
            Err(err) => {
                error!("Cannot create elasticsearch transport: {}", err);
                if let Some(timeout) = self.backoff.next_backoff() {
                    ctx.run_later(timeout, |_, ctx| ctx.stop());
                } else {
                    ctx.stop();
                }
            }
        }
    }
}

impl<T: DeserializeOwned + Send + Unpin + 'static> Actor for EsClient<T> {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.init(ctx);
        self.hb(ctx);
    }
}

impl<T: DeserializeOwned + Send + Unpin + 'static> Supervised for EsClient<T> {
    fn restarting(&mut self, _: &mut Self::Context) {
        self.transport.take();
        error!(
            "reconnecting to elasticsearch at: `{}:{}`",
            self.config.host, self.config.port
        );
    }
}

#[derive(Message)]
#[rtype(result = "Result<EsResult<T>>")]
pub enum EsCmd<T: 'static> {
    Ping,
    Search(SearchRequest),
    Count(SearchRequest),
    BasicGet { path: String, verbose: bool },
    CatIndices,
    /// Whole result set; `None` uses the client's configured ttl.
    Export(SearchRequest, Option<Duration>),
    Scroll(SearchRequest, Option<Duration>),
    #[doc(hidden)]
    __Phantom(PhantomData<T>, Infallible),
}

pub enum EsResult<T: 'static> {
    Ping,
    Search(SearchResponse<T>),
    Count(SearchResponse<Value>),
    BasicGet(String),
    CatIndices(Vec<CatIndicesResponse>),
    Export(Vec<Hit<T>>),
    Scroll(ScrollStream<T, EsTransport>),
}

impl<T: DeserializeOwned + Send + Unpin + 'static> Handler<EsCmd<T>> for EsClient<T> {
    type Result = ResponseActFuture<Self, Result<EsResult<T>>>;

    fn handle(&mut self, msg: EsCmd<T>, _ctx: &mut Self::Context) -> Self::Result {
        // refused paths never need a connection
        if let EsCmd::BasicGet { ref path, verbose } = msg {
            if let Err(error) = admin_path(path, verbose) {
                return Box::pin(err(error));
            }
        }

        let transport = match self.transport {
            Some(ref x) => x.clone(),
            None => {
                return Box::pin(err(Error::IoError(IoError::new(
                    ErrorKind::NotConnected,
                    "Elasticsearch node disconnected",
                ))));
            }
        };

        let scroll_config = match msg {
            EsCmd::Export(_, ttl) | EsCmd::Scroll(_, ttl) => self.scroll_config(ttl),
            _ => self.config.scroll_config(),
        };

        let res = async move {
            match msg {
                EsCmd::Ping => transport
                    .get("/")
                    .await?
                    .error_for_status()
                    .map(|_| EsResult::Ping),
                EsCmd::Search(req) => api::search(&transport, &req).await.map(EsResult::Search),
                EsCmd::Count(req) => api::count(&transport, &req).await.map(EsResult::Count),
                EsCmd::BasicGet { path, verbose } => api::basic_get(&transport, &path, verbose)
                    .await
                    .map(EsResult::BasicGet),
                EsCmd::CatIndices => api::cat_indices(&transport)
                    .await
                    .map(EsResult::CatIndices),
                EsCmd::Export(req, _) => api::export(transport, req, scroll_config)
                    .await
                    .map(EsResult::Export),
                EsCmd::Scroll(req, _) => Ok(EsResult::Scroll(api::scroll(
                    transport,
                    req,
                    scroll_config,
                ))),
                EsCmd::__Phantom(_, never) => match never {},
            }
        }
        .into_actor(self)
        .then(|res, act, _ctx| match res {
            Ok(res) => ok({
                if matches!(res, EsResult::Ping) {
                    act.hb = Instant::now();
                }
                res
            }),
            Err(error) => err(error),
        });

        Box::pin(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_basic_get_search_path_is_refused() {
        let addr = EsClient::<Value>::new(EsConfig::default()).unwrap().start();

        let res = addr
            .send(EsCmd::BasicGet {
                path: "my_index/_search".to_owned(),
                verbose: true,
            })
            .await
            .unwrap();

        assert!(matches!(res, Err(Error::UsageError(_))));
    }

    #[actix_rt::test]
    async fn test_zero_ttl_export_is_refused() {
        let addr = EsClient::<Value>::new(EsConfig::default()).unwrap().start();

        let res = addr
            .send(EsCmd::Export(
                SearchRequest::new("people"),
                Some(Duration::from_secs(0)),
            ))
            .await
            .unwrap();

        assert!(matches!(res, Err(Error::UsageError(_))));
    }

    #[test]
    fn test_invalid_host_is_rejected_up_front() {
        let config = EsConfig {
            host: String::new(),
            ..EsConfig::default()
        };
        assert!(matches!(
            EsClient::<Value>::new(config),
            Err(Error::ConfigError(_))
        ));
    }
}
