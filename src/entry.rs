// Copyright 2025 Cowboy AI, LLC.

//! Process entry point
//!
//! The host runtime receives an event, calls [`EntryPoint::invoke`] with the raw
//! bytes, and decides for itself what to do with the result: reply, redeliver or
//! dead-letter. The fully tagged error chain is handed back untouched.
//!
//! ```ignore
//! let entry = EntryPoint::new(Sqs::new(Output::new(DomainObject::new(process, Json), publish)));
//! let reply = entry.invoke(Context::background(), &raw_event).await?;
//! ```

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::context::Context;
use crate::errors::Stage;
use crate::handler::{Handler, HandlerResult};
use crate::payload::PayloadDecoder;

/// Decodes a raw event into `E` and runs the chain on it
///
/// `E` follows the polymorphic decoding rule, so it may be one of the batch
/// envelopes, a domain type, or raw bytes/text. Being a `Handler<Vec<u8>>`
/// itself, an entry point can also be nested inside another chain.
pub struct EntryPoint<E, H> {
    handler: H,
    decoder: PayloadDecoder<E>,
}

impl<E, H> EntryPoint<E, H>
where
    E: DeserializeOwned + Send + 'static,
    H: Handler<E>,
{
    /// Entry point running `handler`
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            decoder: PayloadDecoder::new(),
        }
    }

    /// Run the chain on one raw event
    pub async fn invoke(&self, ctx: Context, raw_event: &[u8]) -> HandlerResult {
        self.handle(ctx, raw_event.to_vec()).await
    }
}

impl<E, H> fmt::Debug for EntryPoint<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("decoder", &self.decoder)
            .finish()
    }
}

#[async_trait]
impl<E, H> Handler<Vec<u8>> for EntryPoint<E, H>
where
    E: DeserializeOwned + Send + 'static,
    H: Handler<E>,
{
    async fn handle(&self, ctx: Context, raw_event: Vec<u8>) -> HandlerResult {
        debug!(stage = %Stage::EntryPoint, bytes = raw_event.len(), "event received");
        let event = self
            .decoder
            .decode(raw_event)
            .map_err(|err| err.at(Stage::EntryPoint))?;

        self.handler.handle(ctx, event).await.map_err(|err| {
            warn!(stage = %Stage::EntryPoint, error = %err, "event failed");
            err.at(Stage::EntryPoint)
        })
    }
}
