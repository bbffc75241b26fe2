// Copyright 2025 Cowboy AI, LLC.

//! Object retrieval for object-storage notifications
//!
//! [`S3Fetch`] turns a notification record into a readable stream using an
//! injected [`ObjectFetcher`], and [`S3ReadAll`] drains that stream into bytes.
//! Building a real storage client is left to the caller; [`InMemoryObjectStore`]
//! serves tests and local wiring.
//!
//! ```ignore
//! let chain = S3Notification::new(S3Fetch::new(
//!     store,
//!     S3ReadAll::new(DomainObject::new(ingest, Json)),
//! ));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;
use tracing::debug;

use crate::context::Context;
use crate::errors::{BoxError, Stage, WrapError};
use crate::events::{S3Entity, S3EventRecord};
use crate::handler::{Handler, HandlerResult};

/// Readable object body handed from [`S3Fetch`] to the next stage
///
/// The stage that receives the stream owns it; it is released when that stage
/// returns, whether it succeeded or failed.
pub type ObjectStream = Pin<Box<dyn AsyncRead + Send>>;

/// Identifies one object (optionally one version of it) in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    /// Containing bucket
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Exact version; `None` means the current one
    pub version_id: Option<String>,
}

impl ObjectReference {
    /// Reference to the current version of `key` in `bucket`
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            version_id: None,
        }
    }

    /// Pin the reference to one version
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }
}

impl From<&S3Entity> for ObjectReference {
    fn from(entity: &S3Entity) -> Self {
        let version_id = Some(entity.object.version_id.clone()).filter(|v| !v.is_empty());
        Self {
            bucket: entity.bucket.name.clone(),
            key: entity.object.key.clone(),
            version_id,
        }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)?;
        if let Some(version) = &self.version_id {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

/// Capability that opens an object for reading
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Open `object`; the caller reads the stream to completion and drops it
    async fn fetch(&self, ctx: &Context, object: &ObjectReference) -> Result<ObjectStream, BoxError>;
}

#[async_trait]
impl<F> ObjectFetcher for Arc<F>
where
    F: ObjectFetcher + ?Sized,
{
    async fn fetch(&self, ctx: &Context, object: &ObjectReference) -> Result<ObjectStream, BoxError> {
        (**self).fetch(ctx, object).await
    }
}

/// Fetch the object named by each notification record
///
/// The next stage receives the object's stream and a context carrying the
/// record's [`S3Entity`] (see [`Context::s3_entity`]).
#[derive(Debug)]
pub struct S3Fetch<F, H> {
    fetcher: F,
    next: H,
}

impl<F, H> S3Fetch<F, H>
where
    F: ObjectFetcher,
    H: Handler<ObjectStream>,
{
    /// Fetch with `fetcher` and hand each stream to `next`
    pub fn new(fetcher: F, next: H) -> Self {
        Self { fetcher, next }
    }
}

#[async_trait]
impl<F, H> Handler<S3EventRecord> for S3Fetch<F, H>
where
    F: ObjectFetcher,
    H: Handler<ObjectStream>,
{
    async fn handle(&self, ctx: Context, record: S3EventRecord) -> HandlerResult {
        let object = ObjectReference::from(&record.s3);
        debug!(stage = %Stage::S3Fetch, object = %object, "fetching object");

        let stream = self
            .fetcher
            .fetch(&ctx, &object)
            .await
            .map_err(|err| WrapError::delegate(err).at(Stage::S3Fetch))?;

        let object_ctx = ctx.with_s3_entity(record.s3);
        self.next
            .handle(object_ctx, stream)
            .await
            .map_err(|err| err.at(Stage::S3Fetch))
    }
}

/// Read an object stream to completion and hand the bytes on
#[derive(Debug)]
pub struct S3ReadAll<H> {
    next: H,
}

impl<H> S3ReadAll<H>
where
    H: Handler<Vec<u8>>,
{
    /// Hand the fully read body to `next`
    pub fn new(next: H) -> Self {
        Self { next }
    }
}

#[async_trait]
impl<H> Handler<ObjectStream> for S3ReadAll<H>
where
    H: Handler<Vec<u8>>,
{
    async fn handle(&self, ctx: Context, mut stream: ObjectStream) -> HandlerResult {
        let mut body = Vec::new();
        let read = stream.read_to_end(&mut body).await;
        drop(stream);
        read.map_err(|err| WrapError::delegate(err).at(Stage::S3ReadAll))?;

        debug!(stage = %Stage::S3ReadAll, bytes = body.len(), "object read");
        self.next
            .handle(ctx, body)
            .await
            .map_err(|err| err.at(Stage::S3ReadAll))
    }
}

/// Requested object is not held by an [`InMemoryObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("object not found: {0}")]
pub struct ObjectNotFound(pub ObjectReference);

/// In-memory [`ObjectFetcher`] for tests and local wiring
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), Vec<(Option<String>, Bytes)>>>>,
}

impl InMemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `body` as the newest version of `object`
    pub async fn put(&self, object: ObjectReference, body: impl Into<Bytes>) {
        let mut objects = self.objects.write().await;
        objects
            .entry((object.bucket, object.key))
            .or_default()
            .push((object.version_id, body.into()));
    }

    /// Body of `object`, if stored
    pub async fn get(&self, object: &ObjectReference) -> Option<Bytes> {
        let objects = self.objects.read().await;
        let versions = objects.get(&(object.bucket.clone(), object.key.clone()))?;
        match &object.version_id {
            Some(version) => versions
                .iter()
                .find(|(stored, _)| stored.as_ref() == Some(version))
                .map(|(_, body)| body.clone()),
            None => versions.last().map(|(_, body)| body.clone()),
        }
    }
}

#[async_trait]
impl ObjectFetcher for InMemoryObjectStore {
    async fn fetch(&self, _ctx: &Context, object: &ObjectReference) -> Result<ObjectStream, BoxError> {
        match self.get(object).await {
            Some(body) => {
                let stream: ObjectStream = Box::pin(Cursor::new(body));
                Ok(stream)
            }
            None => Err(ObjectNotFound(object.clone()).into()),
        }
    }
}
