// Copyright 2025 Cowboy AI, LLC.

//! Polymorphic payload decoding
//!
//! Batch adapters hand each record body to the next stage as whatever type that
//! stage asks for. The strategy is picked once per target type, in this order:
//!
//! 1. `Vec<u8>` or [`Bytes`]: the bytes verbatim
//! 2. `String`: the bytes as text, verbatim
//! 3. anything else: structured decode with the [`Json`] codec
//!
//! Raw and text decoding never fail. The structured decode ignores whichever codec
//! a [`DomainObject`](crate::DomainObject) further down the chain was given.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::codec::{Codec, Json};
use crate::errors::{CodecError, CodecFormat, WrapError, WrapResult};

/// How a [`PayloadDecoder`] turns bytes into its target type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Byte sequence, assigned verbatim
    Raw,
    /// Text, assigned verbatim
    ///
    /// Invalid UTF-8 sequences become U+FFFD, so the text is only byte-for-byte
    /// identical to the input when the input is valid UTF-8. Ask for `Vec<u8>` or
    /// [`Bytes`] to keep arbitrary bytes exactly.
    Text,
    /// Structured value decoded with JSON
    Structured,
}

impl DecodeStrategy {
    /// Strategy for target type `T`
    pub fn for_type<T: 'static>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<Vec<u8>>() || id == TypeId::of::<Bytes>() {
            DecodeStrategy::Raw
        } else if id == TypeId::of::<String>() {
            DecodeStrategy::Text
        } else {
            DecodeStrategy::Structured
        }
    }
}

/// Decoder bound to one target type
pub struct PayloadDecoder<T> {
    strategy: DecodeStrategy,
    _target: PhantomData<fn() -> T>,
}

impl<T> PayloadDecoder<T>
where
    T: DeserializeOwned + 'static,
{
    /// Bind the decoding strategy for `T`
    pub fn new() -> Self {
        Self {
            strategy: DecodeStrategy::for_type::<T>(),
            _target: PhantomData,
        }
    }

    /// Strategy chosen for `T`
    pub fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }

    /// Decode `data` into `T`
    pub fn decode(&self, data: Vec<u8>) -> WrapResult<T> {
        match self.strategy {
            DecodeStrategy::Raw => {
                if TypeId::of::<T>() == TypeId::of::<Bytes>() {
                    cast(Bytes::from(data))
                } else {
                    cast(data)
                }
            }
            DecodeStrategy::Text => {
                let text = match String::from_utf8(data) {
                    Ok(text) => text,
                    Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
                };
                cast(text)
            }
            DecodeStrategy::Structured => Json.unmarshal(&data).map_err(WrapError::Decode),
        }
    }
}

impl<T> Default for PayloadDecoder<T>
where
    T: DeserializeOwned + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PayloadDecoder<T> {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy,
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for PayloadDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadDecoder")
            .field("target", &std::any::type_name::<T>())
            .field("strategy", &self.strategy)
            .finish()
    }
}

// The strategy was chosen from `TypeId`, so the downcast only fails if that
// choice and this call disagree.
fn cast<S: Any, T: Any>(value: S) -> WrapResult<T> {
    let boxed: Box<dyn Any> = Box::new(value);
    boxed.downcast::<T>().map(|target| *target).map_err(|_| {
        WrapError::Decode(CodecError::new(
            CodecFormat::Json,
            format!(
                "payload of type {} cannot be assigned to {}",
                std::any::type_name::<S>(),
                std::any::type_name::<T>()
            ),
        ))
    })
}
