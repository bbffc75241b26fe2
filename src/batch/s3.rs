// Copyright 2025 Cowboy AI, LLC.

use async_trait::async_trait;
use bytes::BytesMut;
use tracing::debug;

use super::abort;
use crate::context::Context;
use crate::errors::Stage;
use crate::events::{S3Event, S3EventRecord};
use crate::handler::{Handler, HandlerResult};

/// Iterate the records of an [`S3Event`], passing each through unchanged
///
/// Pair with [`S3Fetch`](crate::S3Fetch) to retrieve the objects the records name.
#[derive(Debug)]
pub struct S3Notification<H> {
    next: H,
}

impl<H> S3Notification<H>
where
    H: Handler<S3EventRecord>,
{
    /// Wrap `next`, which receives each notification record
    pub fn new(next: H) -> Self {
        Self { next }
    }
}

#[async_trait]
impl<H> Handler<S3Event> for S3Notification<H>
where
    H: Handler<S3EventRecord>,
{
    async fn handle(&self, ctx: Context, event: S3Event) -> HandlerResult {
        debug!(stage = %Stage::S3Notification, records = event.records.len(), "processing batch");
        let mut output = BytesMut::new();

        for (index, record) in event.records.into_iter().enumerate() {
            debug!(
                record = index,
                event_name = %record.event_name,
                bucket = %record.s3.bucket.name,
                key = %record.s3.object.key,
                "object notification"
            );
            let data = self
                .next
                .handle(ctx.clone(), record)
                .await
                .map_err(|err| abort(Stage::S3Notification, index, err))?;
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

    fn event(names: &[&str]) -> S3Event {
        S3Event {
            records: names
                .iter()
                .map(|name| S3EventRecord {
                    event_name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_records_are_aggregated() {
        let next = handler_fn(|_ctx, r: S3EventRecord| async move { Ok(Bytes::from(r.event_name)) });
        let out = S3Notification::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from("123"));
    }

    #[tokio::test]
    async fn test_next_error_is_error() {
        let next = handler_fn(|_ctx, _r: S3EventRecord| async move {
            Err(WrapError::domain(io::Error::from(io::ErrorKind::UnexpectedEof)))
        });
        let err = S3Notification::new(next)
            .handle(Context::new(), event(&["1"]))
            .await
            .unwrap_err();
        assert_eq!(err.stages(), vec![Stage::S3Notification]);
        assert_eq!(
            err.find_cause::<io::Error>().unwrap().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[tokio::test]
    async fn test_failing_record_stops_the_batch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let next = handler_fn(move |_ctx, r: S3EventRecord| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(r.event_name.clone());
                if r.event_name == "2" {
                    return Err(WrapError::delegate("bucket unavailable"));
                }
                Ok(Bytes::from(r.event_name))
            }
        });

        let err = S3Notification::new(next)
            .handle(Context::new(), event(&["1", "2", "3"]))
            .await
            .unwrap_err();
        assert!(err.is_delegate());
        assert_eq!(err.stages(), vec![Stage::S3Notification]);
        assert_eq!(*seen.lock().unwrap(), vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty_output() {
        let next = handler_fn(|_ctx, _r: S3EventRecord| async move {
            Err(WrapError::domain("must not be called"))
        });
        let out = S3Notification::new(next)
            .handle(Context::new(), S3Event::default())
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
