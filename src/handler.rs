// Copyright 2025 Cowboy AI, LLC.

//! The uniform handler signature
//!
//! Every stage in a chain is a [`Handler<I>`]: given a [`Context`] and an input
//! of type `I`, produce output bytes or fail. Combinators are generic over the
//! handler they wrap, so the compiler checks that adjacent stages agree on the
//! hand-off type while the combinators themselves stay payload-agnostic.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::context::Context;
use crate::errors::WrapError;

/// Output of a handler; an error carries no bytes
pub type HandlerResult = Result<Bytes, WrapError>;

/// A stage in a handler chain
#[async_trait]
pub trait Handler<I>: Send + Sync
where
    I: Send + 'static,
{
    /// Process one input
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult;
}

#[async_trait]
impl<I, H> Handler<I> for Box<H>
where
    I: Send + 'static,
    H: Handler<I> + ?Sized,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        (**self).handle(ctx, input).await
    }
}

#[async_trait]
impl<I, H> Handler<I> for Arc<H>
where
    I: Send + 'static,
    H: Handler<I> + ?Sized,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        (**self).handle(ctx, input).await
    }
}

/// Type-erased handler, as stored in dispatch tables
pub type BoxHandler<I> = Box<dyn Handler<I>>;

/// Handler built from an async closure
pub struct HandlerFn<F, I> {
    f: F,
    _input: PhantomData<fn(I)>,
}

/// Turn `|ctx, input| async move { .. }` into a [`Handler`]
pub fn handler_fn<F, Fut, I>(f: F) -> HandlerFn<F, I>
where
    F: Fn(Context, I) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
    I: Send + 'static,
{
    HandlerFn {
        f,
        _input: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, I> Handler<I> for HandlerFn<F, I>
where
    F: Fn(Context, I) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
    I: Send + 'static,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        (self.f)(ctx, input).await
    }
}

impl<F, I> fmt::Debug for HandlerFn<F, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn")
            .field("input", &std::any::type_name::<I>())
            .finish()
    }
}

/// Box a handler for storage alongside handlers of other concrete types
pub fn boxed<I, H>(handler: H) -> BoxHandler<I>
where
    I: Send + 'static,
    H: Handler<I> + 'static,
{
    Box::new(handler)
}
