// Copyright 2025 Cowboy AI, LLC.

//! Domain adapters
//!
//! [`DomainObject`] sits at the end of a chain: it decodes raw bytes into the
//! domain input with its own codec, runs the business function and encodes what
//! it returns. [`SideEffect`] adapts a function that only acts and returns nothing.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::Codec;
use crate::context::Context;
use crate::errors::{BoxError, Stage, WrapError};
use crate::handler::{Handler, HandlerResult};

/// Decode, invoke, encode
///
/// Unlike the batch adapters this always expects a structured payload and uses
/// the codec it was given, never the polymorphic decoding rule.
pub struct DomainObject<F, C, I, O> {
    f: F,
    codec: C,
    _types: PhantomData<fn(I) -> O>,
}

impl<F, Fut, E, C, I, O> DomainObject<F, C, I, O>
where
    F: Fn(Context, I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
    E: Into<BoxError> + Send,
    C: Codec,
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    /// Run `f` on inputs decoded with `codec` and encode its output with `codec`
    pub fn new(f: F, codec: C) -> Self {
        Self {
            f,
            codec,
            _types: PhantomData,
        }
    }
}

impl<F, C: fmt::Debug, I, O> fmt::Debug for DomainObject<F, C, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainObject")
            .field("codec", &self.codec)
            .field("input", &std::any::type_name::<I>())
            .field("output", &std::any::type_name::<O>())
            .finish()
    }
}

#[async_trait]
impl<F, Fut, E, C, I, O> Handler<Vec<u8>> for DomainObject<F, C, I, O>
where
    F: Fn(Context, I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
    E: Into<BoxError> + Send,
    C: Codec,
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    async fn handle(&self, ctx: Context, data: Vec<u8>) -> HandlerResult {
        let input: I = self.codec.unmarshal(&data).map_err(|err| {
            warn!(stage = %Stage::DomainObject, format = %err.format, "input rejected");
            WrapError::Decode(err).at(Stage::DomainObject)
        })?;

        let output = (self.f)(ctx, input)
            .await
            .map_err(|err| WrapError::domain(err).at(Stage::DomainObject))?;

        let encoded = self.codec.marshal(&output).map_err(|err| {
            warn!(stage = %Stage::DomainObject, format = %err.format, "output rejected");
            WrapError::Encode(err).at(Stage::DomainObject)
        })?;

        debug!(stage = %Stage::DomainObject, bytes = encoded.len(), "domain object encoded");
        Ok(Bytes::from(encoded))
    }
}

/// Handler for business functions that only act
///
/// Success yields no bytes; failure is reported as a domain error.
pub struct SideEffect<F, I> {
    f: F,
    _input: PhantomData<fn(I)>,
}

impl<F, Fut, E, I> SideEffect<F, I>
where
    F: Fn(Context, I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Into<BoxError> + Send,
    I: Send + 'static,
{
    /// Adapt `f`
    pub fn new(f: F) -> Self {
        Self {
            f,
            _input: PhantomData,
        }
    }
}

impl<F, I> fmt::Debug for SideEffect<F, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffect")
            .field("input", &std::any::type_name::<I>())
            .finish()
    }
}

#[async_trait]
impl<F, Fut, E, I> Handler<I> for SideEffect<F, I>
where
    F: Fn(Context, I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Into<BoxError> + Send,
    I: Send + 'static,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        (self.f)(ctx, input).await.map_err(WrapError::domain)?;
        Ok(Bytes::new())
    }
}
