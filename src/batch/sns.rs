// Copyright 2025 Cowboy AI, LLC.

use std::fmt;

use async_trait::async_trait;
use bytes::BytesMut;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::abort;
use crate::context::Context;
use crate::errors::Stage;
use crate::events::SnsEvent;
use crate::handler::{Handler, HandlerResult};
use crate::payload::PayloadDecoder;

/// Iterate the notifications of an [`SnsEvent`]
///
/// Each message is decoded into `O` and handed to the next stage with a context
/// carrying the source topic (see [`Context::sns_topic_arn`]). A structured `O`
/// lets a notification carry a whole nested envelope, e.g. an
/// [`S3Event`](crate::events::S3Event).
pub struct Sns<O, H> {
    next: H,
    decoder: PayloadDecoder<O>,
}

impl<O, H> Sns<O, H>
where
    O: DeserializeOwned + Send + 'static,
    H: Handler<O>,
{
    /// Wrap `next`, which receives each decoded message
    pub fn new(next: H) -> Self {
        Self {
            next,
            decoder: PayloadDecoder::new(),
        }
    }
}

impl<O, H> fmt::Debug for Sns<O, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sns").field("decoder", &self.decoder).finish()
    }
}

#[async_trait]
impl<O, H> Handler<SnsEvent> for Sns<O, H>
where
    O: DeserializeOwned + Send + 'static,
    H: Handler<O>,
{
    async fn handle(&self, ctx: Context, event: SnsEvent) -> HandlerResult {
        debug!(stage = %Stage::Sns, records = event.records.len(), "processing batch");
        let mut output = BytesMut::new();

        for (index, record) in event.records.into_iter().enumerate() {
            let notification = record.sns;
            debug!(record = index, message_id = %notification.message_id, "sns notification");
            let payload = self
                .decoder
                .decode(notification.message.into_bytes())
                .map_err(|err| abort(Stage::Sns, index, err))?;

            let record_ctx = ctx.with_sns_topic_arn(notification.topic_arn);
            let data = self
                .next
                .handle(record_ctx, payload)
                .await
                .map_err(|err| abort(Stage::Sns, index, err))?;
            output.extend_from_slice(&data);
        }

        Ok(output.freeze())
    }
}
