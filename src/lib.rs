// Copyright 2025 Cowboy AI, LLC.

//! # CIM Lambda Wrap
//!
//! Composable handler chains for event-driven serverless functions.
//!
//! A function receives one raw event (a queue batch, a notification batch, a
//! change-stream batch or an object-storage notification), and business logic
//! should only ever see a typed domain value. This crate builds the path between
//! the two out of small adapters that all share one signature, [`Handler`]:
//!
//! - **Batch adapters** ([`Sqs`], [`Sns`], [`DynamoDbStream`], [`S3Notification`])
//!   walk a record batch in order and abort on the first failing record
//! - **Control combinators** ([`Match`], [`filter`], [`Switch`]) choose which
//!   handler runs
//! - **Object retrieval** ([`S3Fetch`], [`S3ReadAll`]) turns a storage
//!   notification into the object's bytes through an injected [`ObjectFetcher`]
//! - **Domain adapters** ([`DomainObject`], [`SideEffect`]) decode, invoke and
//!   encode business functions with a [`Codec`]
//! - **Output** ([`Output`]) routes per-record results to a sink
//! - **Entry** ([`EntryPoint`]) decodes the raw event and runs the chain
//!
//! ## Design Principles
//!
//! 1. **Uniform Signature**: every stage is a `Handler<I>` producing bytes or a [`WrapError`]
//! 2. **Static Composition**: adjacent stages agree on their hand-off type at compile time
//! 3. **Fail Fast**: the first failure aborts the chain and nothing is retried
//! 4. **Traceable Errors**: each adapter adds exactly one [`Stage`] tag on the way up
//! 5. **Scoped Context**: a [`Context`] layer added for one record is invisible to its siblings
//!
//! ```ignore
//! use cim_lambda_wrap::{Context, DomainObject, EntryPoint, Json, Sqs};
//!
//! let entry = EntryPoint::new(Sqs::new(DomainObject::new(process_order, Json)));
//! let reply = entry.invoke(Context::background(), &raw_event).await?;
//! ```

#![warn(missing_docs)]

mod codec;
mod context;
mod control;
mod domain_object;
mod entry;
mod errors;
mod fetch;
mod handler;
mod output;
mod payload;
mod primitives;
pub mod batch;
pub mod events;

// Re-export core types
pub use codec::{Codec, CodecKind, Json, UnknownCodec, Yaml};
pub use context::{
    s3_entity_from_context, sns_topic_arn_from_context, sqs_queue_arn_from_context, Context,
};
pub use errors::{
    BoxError, CodecError, CodecFormat, OpaqueError, Stage, WrapError, WrapResult,
};
pub use handler::{boxed, handler_fn, BoxHandler, Handler, HandlerFn, HandlerResult};
pub use payload::{DecodeStrategy, PayloadDecoder};
pub use primitives::{FixedError, Nop};
pub use control::{filter, Filter, Match, Switch};
pub use batch::{DynamoDbStream, S3Notification, Sns, Sqs};
pub use fetch::{
    InMemoryObjectStore, ObjectFetcher, ObjectNotFound, ObjectReference, ObjectStream, S3Fetch,
    S3ReadAll,
};
pub use domain_object::{DomainObject, SideEffect};
pub use output::Output;
pub use entry::EntryPoint;
