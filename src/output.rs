// Copyright 2025 Cowboy AI, LLC.

//! Output sink adapter

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::context::Context;
use crate::errors::{BoxError, Stage, WrapError};
use crate::handler::{Handler, HandlerResult};

/// Route what the next stage produces to a sink and return nothing upward
///
/// Wrap the per-record tail of a multi-record chain (typically a
/// [`DomainObject`](crate::DomainObject) under [`Sqs`](crate::Sqs) or
/// [`Sns`](crate::Sns)) so that each record's output is delivered on its own
/// instead of being concatenated with its neighbours.
pub struct Output<H, S> {
    next: H,
    sink: S,
}

impl<H, S> Output<H, S> {
    /// Send the bytes produced by `next` to `sink`
    pub fn new(next: H, sink: S) -> Self {
        Self { next, sink }
    }
}

impl<H: fmt::Debug, S> fmt::Debug for Output<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").field("next", &self.next).finish()
    }
}

#[async_trait]
impl<I, H, S, Fut, E> Handler<I> for Output<H, S>
where
    I: Send + 'static,
    H: Handler<I>,
    S: Fn(Context, Bytes) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Into<BoxError> + Send,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        let data = self
            .next
            .handle(ctx.clone(), input)
            .await
            .map_err(|err| err.at(Stage::Output))?;

        debug!(stage = %Stage::Output, bytes = data.len(), "sinking output");
        (self.sink)(ctx, data)
            .await
            .map_err(|err| WrapError::delegate(err).at(Stage::Output))?;

        Ok(Bytes::new())
    }
}
