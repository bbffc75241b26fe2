// Copyright 2025 Cowboy AI, LLC.

//! Pluggable marshal/unmarshal capability
//!
//! A [`DomainObject`](crate::DomainObject) fixes one codec per instance. The
//! [`Json`] and [`Yaml`] codecs are zero-sized and interchangeable; [`CodecKind`]
//! lets a deployment pick one from its own configuration.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{CodecError, CodecFormat};

/// Encodes values to bytes and decodes bytes back into values
pub trait Codec: Send + Sync {
    /// Encode `value`; fails if it cannot be represented in this format
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decode `data` into a `T`; fails on malformed input or shape mismatch
    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;

    /// Format spoken by this codec
    fn format(&self) -> CodecFormat;
}

/// JSON codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json;

impl Codec for Json {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }

    fn format(&self) -> CodecFormat {
        CodecFormat::Json
    }
}

/// YAML codec backed by `serde_yaml`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Yaml;

impl Codec for Yaml {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_yaml::to_string(value)?.into_bytes())
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(serde_yaml::from_slice(data)?)
    }

    fn format(&self) -> CodecFormat {
        CodecFormat::Yaml
    }
}

/// Codec selected at wiring time, typically from deployment configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// [`Json`]
    #[default]
    Json,
    /// [`Yaml`]
    #[serde(alias = "yml")]
    Yaml,
}

impl Codec for CodecKind {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            CodecKind::Json => Json.marshal(value),
            CodecKind::Yaml => Yaml.marshal(value),
        }
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        match self {
            CodecKind::Json => Json.unmarshal(data),
            CodecKind::Yaml => Yaml.unmarshal(data),
        }
    }

    fn format(&self) -> CodecFormat {
        match self {
            CodecKind::Json => CodecFormat::Json,
            CodecKind::Yaml => CodecFormat::Yaml,
        }
    }
}

/// Unknown codec name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown codec: {0}")]
pub struct UnknownCodec(pub String);

impl FromStr for CodecKind {
    type Err = UnknownCodec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(CodecKind::Json),
            "yaml" | "yml" => Ok(CodecKind::Yaml),
            _ => Err(UnknownCodec(s.to_string())),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.format(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Message {
        #[serde(rename = "In")]
        input: String,
    }

    #[test]
    fn test_json_round_trip_shape() {
        let data = Json
            .marshal(&Message {
                input: "message".to_string(),
            })
            .unwrap();
        assert_eq!(data, br#"{"In":"message"}"#);

        let decoded: Message = Json.unmarshal(&data).unwrap();
        assert_eq!(decoded.input, "message");
    }

    #[test]
    fn test_yaml_reads_block_style() {
        let decoded: Message = Yaml.unmarshal(b"In: message\n").unwrap();
        assert_eq!(decoded.input, "message");
        assert_eq!(Yaml.marshal(&decoded).unwrap(), b"In: message\n");
    }

    #[test]
    fn test_unmarshal_truncated_input_fails() {
        let err = Json.unmarshal::<Message>(br#"{"In":"message""#).unwrap_err();
        assert_eq!(err.format, CodecFormat::Json);

        let err = Yaml.unmarshal::<Message>(b"In: [").unwrap_err();
        assert_eq!(err.format, CodecFormat::Yaml);
    }

    #[test]
    fn test_json_marshal_rejects_non_string_keys() {
        let mut unencodable = HashMap::new();
        unencodable.insert((1u8, 2u8), "tuple keyed");
        let err = Json.marshal(&unencodable).unwrap_err();
        assert_eq!(err.format, CodecFormat::Json);
    }

    #[test_case("json", CodecKind::Json ; "json")]
    #[test_case("JSON", CodecKind::Json ; "json upper")]
    #[test_case("yaml", CodecKind::Yaml ; "yaml")]
    #[test_case(" yml ", CodecKind::Yaml ; "yml padded")]
    fn test_codec_kind_from_str(input: &str, expected: CodecKind) {
        assert_eq!(input.parse::<CodecKind>().unwrap(), expected);
    }

    #[test]
    fn test_codec_kind_rejects_unknown() {
        let err = "toml".parse::<CodecKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown codec: toml");
    }

    #[test]
    fn test_codec_kind_from_configuration() {
        #[derive(Deserialize)]
        struct Settings {
            codec: CodecKind,
        }

        let settings: Settings = serde_json::from_str(r#"{"codec":"yaml"}"#).unwrap();
        assert_eq!(settings.codec, CodecKind::Yaml);
        assert_eq!(settings.codec.format(), CodecFormat::Yaml);
        assert_eq!(CodecKind::default(), CodecKind::Json);
    }
}
