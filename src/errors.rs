// Copyright 2025 Cowboy AI, LLC.

//! Error types for handler chains
//!
//! Every stage of a chain reports failure through [`WrapError`]. Adapters add
//! exactly one [`WrapError::Stage`] layer naming themselves; control combinators
//! and primitives hand errors back untouched. Nothing is retried or swallowed.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Boxed error accepted from business logic and injected capabilities
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for fallible chain operations
pub type WrapResult<T> = Result<T, WrapError>;

/// Cheaply cloneable wrapper around an error reported by code outside the framework
#[derive(Clone)]
pub struct OpaqueError(Arc<dyn StdError + Send + Sync + 'static>);

impl OpaqueError {
    /// Wrap any error value
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(Arc::from(err.into()))
    }

    /// The wrapped error
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Debug for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// Transparent: the wrapped error's own causes follow directly.
impl StdError for OpaqueError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Textual encoding a codec speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecFormat::Json => f.write_str("json"),
            CodecFormat::Yaml => f.write_str("yaml"),
        }
    }
}

/// Failure reported by a codec backend
#[derive(Debug, Clone, Error)]
#[error("{format} codec: {source}")]
pub struct CodecError {
    /// Encoding that failed
    pub format: CodecFormat,
    #[source]
    source: OpaqueError,
}

impl CodecError {
    /// Wrap a backend error for the given format
    pub fn new(format: CodecFormat, err: impl Into<BoxError>) -> Self {
        Self {
            format,
            source: OpaqueError::new(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::new(CodecFormat::Json, err)
    }
}

impl From<serde_yaml::Error> for CodecError {
    fn from(err: serde_yaml::Error) -> Self {
        CodecError::new(CodecFormat::Yaml, err)
    }
}

/// Adapter that tagged an error on its way up the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Process entry point decoding the raw event
    EntryPoint,
    /// Queue message batch
    Sqs,
    /// Notification batch
    Sns,
    /// Change-stream batch
    DynamoDbStream,
    /// Object-storage notification batch
    S3Notification,
    /// Object retrieval
    S3Fetch,
    /// Object stream read
    S3ReadAll,
    /// Domain object decode / invoke / encode
    DomainObject,
    /// Output sink
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::EntryPoint => "EntryPoint",
            Stage::Sqs => "SQS",
            Stage::Sns => "SNS",
            Stage::DynamoDbStream => "DynamoDBStream",
            Stage::S3Notification => "S3Notification",
            Stage::S3Fetch => "S3Fetch",
            Stage::S3ReadAll => "S3ReadAll",
            Stage::DomainObject => "DomainObject",
            Stage::Output => "Output",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while running a handler chain
#[derive(Debug, Clone, Error)]
pub enum WrapError {
    /// Input bytes were malformed or did not fit the target type
    #[error("decode failure: {0}")]
    Decode(#[source] CodecError),

    /// Output value could not be represented by the active codec
    #[error("encode failure: {0}")]
    Encode(#[source] CodecError),

    /// Switch key absent from the dispatch table
    #[error("no select match: {key}")]
    NoMatch {
        /// Rendered dispatch key
        key: String,
    },

    /// Failure reported by business logic
    #[error("domain failure: {0}")]
    Domain(#[source] OpaqueError),

    /// Failure reported by an injected capability (fetcher, sink, stream)
    #[error("delegate failure: {0}")]
    Delegate(#[source] OpaqueError),

    /// Error tagged with the adapter it passed through
    #[error("{stage}: {source}")]
    Stage {
        /// Adapter that reported the failure
        stage: Stage,
        /// Failure from further down the chain
        #[source]
        source: Box<WrapError>,
    },
}

impl WrapError {
    /// Wrap a business-logic failure
    pub fn domain(err: impl Into<BoxError>) -> Self {
        WrapError::Domain(OpaqueError::new(err))
    }

    /// Wrap a failure from an injected capability
    pub fn delegate(err: impl Into<BoxError>) -> Self {
        WrapError::Delegate(OpaqueError::new(err))
    }

    /// Tag this error with the stage it is passing through
    pub fn at(self, stage: Stage) -> Self {
        WrapError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Innermost error beneath all stage tags
    pub fn root(&self) -> &WrapError {
        let mut current = self;
        while let WrapError::Stage { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Stage tags from the outermost adapter inwards
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        let mut current = self;
        while let WrapError::Stage { stage, source } = current {
            stages.push(*stage);
            current = &**source;
        }
        stages
    }

    /// Check if this is ultimately a decode failure
    pub fn is_decode(&self) -> bool {
        matches!(self.root(), WrapError::Decode(_))
    }

    /// Check if this is ultimately an encode failure
    pub fn is_encode(&self) -> bool {
        matches!(self.root(), WrapError::Encode(_))
    }

    /// Check if this is ultimately a missing switch key
    pub fn is_no_match(&self) -> bool {
        matches!(self.root(), WrapError::NoMatch { .. })
    }

    /// Check if this is ultimately a business-logic failure
    pub fn is_domain(&self) -> bool {
        matches!(self.root(), WrapError::Domain(_))
    }

    /// Check if this is ultimately a capability failure
    pub fn is_delegate(&self) -> bool {
        matches!(self.root(), WrapError::Delegate(_))
    }

    /// Find the first error of type `E` along the source chain, starting with `self`
    pub fn find_cause<E: StdError + 'static>(&self) -> Option<&E> {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            if let Some(opaque) = err.downcast_ref::<OpaqueError>() {
                if let Some(found) = opaque.inner().downcast_ref::<E>() {
                    return Some(found);
                }
            }
            current = err.source();
        }
        None
    }
}
