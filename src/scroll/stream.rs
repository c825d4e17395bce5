use futures::{
    future::{BoxFuture, Future, FutureExt},
    stream::Stream,
};
use pin_project::pin_project;
use serde::de::DeserializeOwned;

use crate::{
    error::Result,
    response::Hit,
    scroll::session::ScrollSession,
    transport::Transport,
};

use std::{
    pin::Pin,
    task::{Context, Poll},
};

type Step<T, C> = (ScrollSession<T, C>, Result<Option<Vec<Hit<T>>>>);

/// Yields one page of hits per item and ends once the total is reached. An
/// error is yielded once and ends the stream.
#[pin_project]
pub struct ScrollStream<T, C> {
    #[pin]
    fut: Option<BoxFuture<'static, Step<T, C>>>,
    session: Option<ScrollSession<T, C>>,
}

impl<T, C> ScrollStream<T, C>
where
    T: DeserializeOwned + Send + 'static,
    C: Transport + Send + Sync + 'static,
{
    pub fn new(session: ScrollSession<T, C>) -> Self {
        Self {
            fut: None,
            session: Some(session),
        }
    }
}

async fn step<T, C>(mut session: ScrollSession<T, C>) -> Step<T, C>
where
    T: DeserializeOwned + Send + 'static,
    C: Transport + Send + Sync + 'static,
{
    let res = session.next_page().await;
    if res.is_err() {
        session.abort().await;
    }
    (session, res)
}

impl<T, C> Stream for ScrollStream<T, C>
where
    T: DeserializeOwned + Send + 'static,
    C: Transport + Send + Sync + 'static,
{
    type Item = Result<Vec<Hit<T>>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if this.fut.is_none() {
            match this.session.take() {
                Some(session) => this.fut.as_mut().set(Some(step(session).boxed())),
                None => return Poll::Ready(None),
            }
        }

        match this.fut.as_mut().as_pin_mut() {
            None => Poll::Ready(None),
            Some(f) => match f.poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready((session, res)) => {
                    this.fut.as_mut().set(None);
                    match res {
                        Ok(Some(page)) => {
                            *this.session = Some(session);
                            Poll::Ready(Some(Ok(page)))
                        }
                        Ok(None) => Poll::Ready(None),
                        Err(err) => Poll::Ready(Some(Err(err))),
                    }
                }
            },
        }
    }
}
