// Copyright 2025 Cowboy AI, LLC.

use std::fmt;

use async_trait::async_trait;
use bytes::BytesMut;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::abort;
use crate::context::Context;
use crate::errors::Stage;
use crate::events::SqsEvent;
use crate::handler::{Handler, HandlerResult};
use crate::payload::PayloadDecoder;

/// Iterate the messages of an [`SqsEvent`]
///
/// Each body is decoded into `O` and handed to the next stage with a context
/// carrying the message's source queue (see [`Context::sqs_queue_arn`]).
///
/// Use a [`DomainObject`](crate::DomainObject) as the next stage for domain
/// objects; the structured decode here is always JSON and exists so envelopes
/// can be nested.
pub struct Sqs<O, H> {
    next: H,
    decoder: PayloadDecoder<O>,
}

impl<O, H> Sqs<O, H>
where
    O: DeserializeOwned + Send + 'static,
    H: Handler<O>,
{
    /// Wrap `next`, which receives each decoded message body
    pub fn new(next: H) -> Self {
        Self {
            next,
            decoder: PayloadDecoder::new(),
        }
    }
}

impl<O, H> fmt::Debug for Sqs<O, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sqs").field("decoder", &self.decoder).finish()
    }
}

#[async_trait]
impl<O, H> Handler<SqsEvent> for Sqs<O, H>
where
    O: DeserializeOwned + Send + 'static,
    H: Handler<O>,
{
    async fn handle(&self, ctx: Context, event: SqsEvent) -> HandlerResult {
        debug!(stage = %Stage::Sqs, records = event.records.len(), "processing batch");
        let mut output = BytesMut::new();

        for (index, message) in event.records.into_iter().enumerate() {
            debug!(record = index, message_id = %message.message_id, "sqs message");
            let payload = self
                .decoder
                .decode(message.body.into_bytes())
                .map_err(|err| abort(Stage::Sqs, index, err))?;

            let record_ctx = ctx.with_sqs_queue_arn(message.event_source_arn);
            let data = self
                .next
                .handle(record_ctx, payload)
                .await
                .map_err(|err| abort(Stage::Sqs, index, err))?;
            output.extend_from_slice(&data);
        }

        Ok(output.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WrapError;
    use crate::events::SqsMessage;
    use crate::handler::handler_fn;
    use bytes::Bytes;
    use serde::Deserialize;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn event(bodies: &[&str]) -> SqsEvent {
        SqsEvent {
            records: bodies
                .iter()
                .enumerate()
                .map(|(i, body)| SqsMessage {
                    message_id: format!("m{i}"),
                    body: body.to_string(),
                    event_source_arn: format!("arn:aws:sqs:eu-west-1:1:queue-{i}"),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[derive(Deserialize)]
    struct Val {
        val: String,
    }

    #[tokio::test]
    async fn test_raw_bodies_are_aggregated() {
        let next = handler_fn(|_ctx, d: Vec<u8>| async move { Ok(Bytes::from(d)) });
        let out = Sqs::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from("123"));
    }

    #[tokio::test]
    async fn test_text_bodies_are_aggregated() {
        let next = handler_fn(|_ctx, d: String| async move { Ok(Bytes::from(d)) });
        let out = Sqs::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from("123"));
    }

    #[tokio::test]
    async fn test_structured_bodies_are_aggregated() {
        let next = handler_fn(|_ctx, d: Val| async move { Ok(Bytes::from(d.val)) });
        let out = Sqs::new(next)
            .handle(
                Context::new(),
                event(&[r#"{"val": "1"}"#, r#"{"val": "2"}"#, r#"{"val": "3"}"#]),
            )
            .await
            .unwrap();
        assert_eq!(out, Bytes::from("123"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_tagged_decode_error() {
        let next = handler_fn(|_ctx, d: Val| async move { Ok(Bytes::from(d.val)) });
        let err = Sqs::new(next)
            .handle(Context::new(), event(&[r#"{"val": "1""#]))
            .await
            .unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.stages(), vec![Stage::Sqs]);
    }

    #[tokio::test]
    async fn test_next_error_aborts_batch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let next = handler_fn(move |_ctx, d: String| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(d.clone());
                if d == "2" {
                    Err(WrapError::domain(io::Error::from(io::ErrorKind::UnexpectedEof)))
                } else {
                    Ok(Bytes::from(d))
                }
            }
        });

        let err = Sqs::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.find_cause::<io::Error>().unwrap().kind(),
            io::ErrorKind::UnexpectedEof
        );
        assert_eq!(*seen.lock().unwrap(), vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_each_record_sees_its_own_queue() {
        let next = handler_fn(|ctx: Context, _d: String| async move {
            let arn = ctx.sqs_queue_arn().unwrap_or_default().to_string();
            Ok(Bytes::from(format!("{arn};")))
        });
        let out = Sqs::new(next)
            .handle(Context::new(), event(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(
            out,
            Bytes::from("arn:aws:sqs:eu-west-1:1:queue-0;arn:aws:sqs:eu-west-1:1:queue-1;")
        );
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty_output() {
        let next = handler_fn(|_ctx, _d: String| async move {
            Err(WrapError::domain("must not be called"))
        });
        let out = Sqs::new(next)
            .handle(Context::new(), SqsEvent::default())
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
