// Copyright 2025 Cowboy AI, LLC.

//! Terminal handlers

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use bytes::Bytes;

use crate::context::Context;
use crate::errors::WrapError;
use crate::handler::{Handler, HandlerResult};

/// Do nothing further with an input and report success with no bytes
pub struct Nop<I> {
    _input: PhantomData<fn(I)>,
}

impl<I> Nop<I> {
    /// Create a no-op handler
    pub fn new() -> Self {
        Self {
            _input: PhantomData,
        }
    }
}

impl<I> Default for Nop<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Clone for Nop<I> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for Nop<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nop")
    }
}

#[async_trait]
impl<I> Handler<I> for Nop<I>
where
    I: Send + 'static,
{
    async fn handle(&self, _ctx: Context, _input: I) -> HandlerResult {
        Ok(Bytes::new())
    }
}

/// Fail every input with the same error
///
/// Useful for guardrail branches of a [`Match`](crate::Match) and in tests.
pub struct FixedError<I> {
    error: WrapError,
    _input: PhantomData<fn(I)>,
}

impl<I> FixedError<I> {
    /// Create a handler that always fails with `error`
    pub fn new(error: WrapError) -> Self {
        Self {
            error,
            _input: PhantomData,
        }
    }
}

impl<I> fmt::Debug for FixedError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedError").field(&self.error).finish()
    }
}

#[async_trait]
impl<I> Handler<I> for FixedError<I>
where
    I: Send + 'static,
{
    async fn handle(&self, _ctx: Context, _input: I) -> HandlerResult {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[tokio::test]
    async fn test_nop_returns_no_bytes_and_no_error() {
        let out = Nop::<String>::new()
            .handle(Context::new(), String::new())
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_fixed_error_returns_the_provided_error() {
        let handler = FixedError::<String>::new(WrapError::domain(io::Error::from(
            io::ErrorKind::UnexpectedEof,
        )));

        for _ in 0..2 {
            let err = handler
                .handle(Context::new(), String::new())
                .await
                .unwrap_err();
            let cause = err.find_cause::<io::Error>().unwrap();
            assert_eq!(cause.kind(), io::ErrorKind::UnexpectedEof);
        }
    }
}
