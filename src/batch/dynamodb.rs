// Copyright 2025 Cowboy AI, LLC.

use async_trait::async_trait;
use bytes::BytesMut;
use tracing::debug;

use super::abort;
use crate::context::Context;
use crate::errors::Stage;
use crate::events::{DynamoDbEvent, DynamoDbEventRecord};
use crate::handler::{Handler, HandlerResult};

/// Iterate the records of a [`DynamoDbEvent`], passing each through unchanged
#[derive(Debug)]
pub struct DynamoDbStream<H> {
    next: H,
}

impl<H> DynamoDbStream<H>
where
    H: Handler<DynamoDbEventRecord>,
{
    /// Wrap `next`, which receives each stream record
    pub fn new(next: H) -> Self {
        Self { next }
    }
}

#[async_trait]
impl<H> Handler<DynamoDbEvent> for DynamoDbStream<H>
where
    H: Handler<DynamoDbEventRecord>,
{
    async fn handle(&self, ctx: Context, event: DynamoDbEvent) -> HandlerResult {
        debug!(stage = %Stage::DynamoDbStream, records = event.records.len(), "processing batch");
        let mut output = BytesMut::new();

        for (index, record) in event.records.into_iter().enumerate() {
            debug!(record = index, event_id = %record.event_id, "stream record");
            let data = self
                .next
                .handle(ctx.clone(), record)
                .await
                .map_err(|err| abort(Stage::DynamoDbStream, index, err))?;
            output.extend_from_slice(&data);
        }

        Ok(output.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WrapError;
    use crate::handler::handler_fn;
    use bytes::Bytes;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn event(ids: &[&str]) -> DynamoDbEvent {
        DynamoDbEvent {
            records: ids
                .iter()
                .map(|id| DynamoDbEventRecord {
                    event_id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_records_are_aggregated() {
        let next = handler_fn(|_ctx, r: DynamoDbEventRecord| async move {
            Ok(Bytes::from(r.event_id))
        });
        let out = DynamoDbStream::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from("123"));
    }

    #[tokio::test]
    async fn test_next_error_is_tagged() {
        let next = handler_fn(|_ctx, _r: DynamoDbEventRecord| async move {
            Err(WrapError::domain(io::Error::from(io::ErrorKind::UnexpectedEof)))
        });
        let err = DynamoDbStream::new(next)
            .handle(Context::new(), event(&["1"]))
            .await
            .unwrap_err();
        assert_eq!(err.stages(), vec![Stage::DynamoDbStream]);
        assert_eq!(
            err.find_cause::<io::Error>().unwrap().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[tokio::test]
    async fn test_failing_record_stops_the_stream() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let next = handler_fn(move |_ctx, r: DynamoDbEventRecord| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(r.event_id.clone());
                if r.event_id == "2" {
                    return Err(WrapError::domain("rejected"));
                }
                Ok(Bytes::from(r.event_id))
            }
        });

        let err = DynamoDbStream::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap_err();
        assert!(err.is_domain());
        assert_eq!(*seen.lock().unwrap(), vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_stream_is_empty_output() {
        let next = handler_fn(|_ctx, _r: DynamoDbEventRecord| async move {
            Err(WrapError::domain("must not be called"))
        });
        let out = DynamoDbStream::new(next)
            .handle(Context::new(), DynamoDbEvent::default())
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
