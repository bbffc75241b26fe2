// Copyright 2025 Cowboy AI, LLC.

//! Scoped, read-only metadata carried alongside every handler call
//!
//! A [`Context`] is an immutable stack of layers. Deriving a context pushes a new
//! layer on top of a shared parent, so nested stages see what outer stages added
//! while siblings and callers never do. Framework entries live under private keys;
//! caller metadata is keyed by its Rust type and cannot collide with them.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::events::S3Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameworkKey {
    S3Entity,
    SqsQueueArn,
    SnsTopicArn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Framework(FrameworkKey),
    Extension(TypeId),
}

struct Layer {
    key: Key,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Layer>>,
}

/// Side-channel passed to every [`Handler`](crate::Handler)
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Layer>>,
}

impl Context {
    /// Empty root context
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty root context for a fresh invocation
    pub fn background() -> Self {
        Self::default()
    }

    fn with_value<T: Any + Send + Sync>(&self, key: Key, value: T) -> Self {
        Self {
            head: Some(Arc::new(Layer {
                key,
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    fn value_for<T: Any>(&self, key: Key) -> Option<&T> {
        let mut layer = self.head.as_deref();
        while let Some(current) = layer {
            if current.key == key {
                return current.value.downcast_ref::<T>();
            }
            layer = current.parent.as_deref();
        }
        None
    }

    pub(crate) fn with_s3_entity(&self, entity: S3Entity) -> Self {
        self.with_value(Key::Framework(FrameworkKey::S3Entity), entity)
    }

    pub(crate) fn with_sqs_queue_arn(&self, arn: impl Into<String>) -> Self {
        self.with_value(Key::Framework(FrameworkKey::SqsQueueArn), arn.into())
    }

    pub(crate) fn with_sns_topic_arn(&self, arn: impl Into<String>) -> Self {
        self.with_value(Key::Framework(FrameworkKey::SnsTopicArn), arn.into())
    }

    /// Object entity added by an enclosing [`S3Fetch`](crate::S3Fetch)
    pub fn s3_entity(&self) -> Option<&S3Entity> {
        self.value_for(Key::Framework(FrameworkKey::S3Entity))
    }

    /// Source queue of the record being processed by an enclosing [`Sqs`](crate::Sqs)
    pub fn sqs_queue_arn(&self) -> Option<&str> {
        self.value_for::<String>(Key::Framework(FrameworkKey::SqsQueueArn))
            .map(String::as_str)
    }

    /// Source topic of the record being processed by an enclosing [`Sns`](crate::Sns)
    pub fn sns_topic_arn(&self) -> Option<&str> {
        self.value_for::<String>(Key::Framework(FrameworkKey::SnsTopicArn))
            .map(String::as_str)
    }

    /// Derive a context carrying caller metadata of type `T`
    pub fn with_extension<T: Any + Send + Sync>(&self, value: T) -> Self {
        self.with_value(Key::Extension(TypeId::of::<T>()), value)
    }

    /// Innermost caller metadata of type `T`
    pub fn extension<T: Any>(&self) -> Option<&T> {
        self.value_for(Key::Extension(TypeId::of::<T>()))
    }

    /// Number of layers visible from this context
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = self.head.as_deref();
        while let Some(current) = layer {
            depth += 1;
            layer = current.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = Vec::new();
        let mut layer = self.head.as_deref();
        while let Some(current) = layer {
            keys.push(current.key);
            layer = current.parent.as_deref();
        }
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

/// Object entity added by an enclosing [`S3Fetch`](crate::S3Fetch)
pub fn s3_entity_from_context(ctx: &Context) -> Option<&S3Entity> {
    ctx.s3_entity()
}

/// Source queue of the record being processed
pub fn sqs_queue_arn_from_context(ctx: &Context) -> Option<&str> {
    ctx.sqs_queue_arn()
}

/// Source topic of the record being processed
pub fn sns_topic_arn_from_context(ctx: &Context) -> Option<&str> {
    ctx.sns_topic_arn()
}
