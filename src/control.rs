// Copyright 2025 Cowboy AI, LLC.

//! Conditional dispatch: [`Match`], [`filter`] and [`Switch`]
//!
//! These combinators choose which handler runs and return its result unchanged.
//! They never tag errors with a stage of their own.
//!
//! ```ignore
//! let created = |_ctx: &Context, record: &S3EventRecord| {
//!     Ok(record.event_name == "ObjectCreated:Put")
//! };
//! let chain = Sqs::new(S3Notification::new(filter(created, S3Fetch::new(store, reader))));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::debug;

use crate::context::Context;
use crate::errors::{WrapError, WrapResult};
use crate::handler::{BoxHandler, Handler, HandlerResult};
use crate::primitives::Nop;

/// Run one of two handlers depending on a predicate
///
/// The predicate is a plain function of the context and a borrowed input; it may
/// consult anything an outer stage or the caller put in the [`Context`]. It cannot
/// await. Decisions that need I/O belong in a handler: look the answer up there
/// and route with a [`Switch`] or a nested `Match` on the result.
pub struct Match<P, T, F, I> {
    predicate: P,
    on_true: T,
    on_false: F,
    _input: PhantomData<fn(I)>,
}

impl<P, T, F, I> Match<P, T, F, I>
where
    P: Fn(&Context, &I) -> WrapResult<bool> + Send + Sync,
    T: Handler<I>,
    F: Handler<I>,
    I: Send + 'static,
{
    /// Run `on_true` when `predicate` holds and `on_false` otherwise
    pub fn new(predicate: P, on_true: T, on_false: F) -> Self {
        Self {
            predicate,
            on_true,
            on_false,
            _input: PhantomData,
        }
    }
}

impl<P, T, F, I> fmt::Debug for Match<P, T, F, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("input", &std::any::type_name::<I>())
            .finish()
    }
}

#[async_trait]
impl<P, T, F, I> Handler<I> for Match<P, T, F, I>
where
    P: Fn(&Context, &I) -> WrapResult<bool> + Send + Sync,
    T: Handler<I>,
    F: Handler<I>,
    I: Send + 'static,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        if (self.predicate)(&ctx, &input)? {
            self.on_true.handle(ctx, input).await
        } else {
            self.on_false.handle(ctx, input).await
        }
    }
}

/// [`Match`] whose false branch does nothing
pub type Filter<P, H, I> = Match<P, H, Nop<I>, I>;

/// Pass inputs on to `handler` only when `predicate` holds
pub fn filter<P, H, I>(predicate: P, handler: H) -> Filter<P, H, I>
where
    P: Fn(&Context, &I) -> WrapResult<bool> + Send + Sync,
    H: Handler<I>,
    I: Send + 'static,
{
    Match::new(predicate, handler, Nop::new())
}

/// Dispatch to a handler chosen by a key computed from the input
///
/// Lookup is exact-match on the key; a key with no entry fails with
/// [`WrapError::NoMatch`].
pub struct Switch<K, F, I> {
    key_fn: F,
    table: HashMap<K, BoxHandler<I>>,
}

impl<K, F, I> Switch<K, F, I>
where
    K: Eq + Hash + fmt::Display + Send + Sync + 'static,
    F: Fn(&I) -> K + Send + Sync,
    I: Send + 'static,
{
    /// Switch with an empty dispatch table
    pub fn new(key_fn: F) -> Self {
        Self {
            key_fn,
            table: HashMap::new(),
        }
    }

    /// Switch over an existing dispatch table
    pub fn with_table(key_fn: F, table: HashMap<K, BoxHandler<I>>) -> Self {
        Self { key_fn, table }
    }

    /// Route inputs whose key equals `key` to `handler`, replacing any earlier entry
    pub fn case<H>(mut self, key: K, handler: H) -> Self
    where
        H: Handler<I> + 'static,
    {
        self.table.insert(key, Box::new(handler));
        self
    }

    /// Number of entries in the dispatch table
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true when the dispatch table is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<K: fmt::Debug, F, I> fmt::Debug for Switch<K, F, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch")
            .field("keys", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl<K, F, I> Handler<I> for Switch<K, F, I>
where
    K: Eq + Hash + fmt::Display + Send + Sync + 'static,
    F: Fn(&I) -> K + Send + Sync,
    I: Send + 'static,
{
    async fn handle(&self, ctx: Context, input: I) -> HandlerResult {
        let key = (self.key_fn)(&input);
        match self.table.get(&key) {
            Some(handler) => {
                debug!(key = %key, "switch dispatch");
                handler.handle(ctx, input).await
            }
            None => Err(WrapError::NoMatch {
                key: key.to_string(),
            }),
        }
    }
}
