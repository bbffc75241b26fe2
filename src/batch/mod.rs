// Copyright 2025 Cowboy AI, LLC.

//! Record-batch adapters
//!
//! Each adapter walks one envelope shape in order, hands every record to the next
//! stage, and concatenates the bytes the records produce. The first failing record
//! aborts the batch: later records are never handed on, and the error comes back
//! tagged with the adapter's [`Stage`]. Records are processed strictly one after
//! another.
//!
//! Queue and notification bodies go through the [`PayloadDecoder`](crate::PayloadDecoder),
//! so the next stage may ask for `Vec<u8>`, `String` or any deserialisable type.
//! Change-stream and object-storage records are passed through as they are.

mod dynamodb;
mod s3;
mod sns;
mod sqs;

pub use dynamodb::DynamoDbStream;
pub use s3::S3Notification;
pub use sns::Sns;
pub use sqs::Sqs;

use tracing::warn;

use crate::errors::{Stage, WrapError};

pub(crate) fn abort(stage: Stage, record: usize, err: WrapError) -> WrapError {
    warn!(stage = %stage, record, error = %err, "batch aborted");
    err.at(stage)
}
