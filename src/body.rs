//! Response body as a closed sum type.
//!
//! The body a middleware leaves on the context decides how the response is
//! serialized. The mapping is fixed:
//!
//! | Variant | Wire encoding | `content-type` |
//! |---|---|---|
//! | [`Body::Json`] | serde_json text | `application/json; charset=utf-8` |
//! | [`Body::Stream`] | piped through, unbuffered | untouched — whatever middleware set |
//! | [`Body::Text`] / [`Body::Bytes`] | as-is | `text/html; charset=utf-8` |
//! | [`Body::Empty`] | literal `Not found` | untouched |
//!
//! `Empty` is the starting state of every response; a pipeline that never
//! sets a body produces the default `404` / `Not found` answer.

use std::fmt;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};

/// The boxed error type carried by streaming response bodies.
pub type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// The type-erased body handed to hyper for every outgoing response.
///
/// Buffered variants are wrapped in [`Full`]; streams are passed through.
pub type Outgoing = BoxBody<Bytes, BodyError>;

/// A response body in one of four shapes.
pub enum Body {
    /// No body set. Serialized as the `Not found` fallback.
    Empty,
    /// A structured value, serialized as JSON text.
    Json(serde_json::Value),
    /// UTF-8 text, emitted as-is.
    Text(String),
    /// Raw bytes, emitted as-is.
    Bytes(Bytes),
    /// A byte stream, piped to the client without buffering.
    Stream(Outgoing),
}

impl Body {
    /// Builds a [`Body::Json`] from any serializable value.
    ///
    /// Prefer [`Context::set_json`](crate::Context::set_json), which also
    /// applies the status side effect.
    pub fn json(value: impl serde::Serialize) -> Result<Self, crate::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Wraps any [`hyper::body::Body`] implementation as a streaming body.
    ///
    /// The stream is piped to the client frame by frame; kawa never buffers
    /// it and never overrides whatever `content-type` middleware set.
    pub fn stream<B>(body: B) -> Self
    where
        B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BodyError>,
    {
        Self::Stream(body.map_err(Into::into).boxed())
    }

    /// The `content-type` value this body forces on the response, if any.
    pub(crate) fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some("application/json; charset=utf-8"),
            Self::Text(_) | Self::Bytes(_) => Some("text/html; charset=utf-8"),
            Self::Stream(_) | Self::Empty => None,
        }
    }
}

/// Wraps fully buffered bytes in the type-erased outgoing body.
pub(crate) fn full(bytes: Bytes) -> Outgoing {
    Full::new(bytes).map_err(|never| match never {}).boxed()
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_type_mapping() {
        assert_eq!(
            Body::Json(json!({})).content_type(),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(
            Body::from("hi").content_type(),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(
            Body::from(vec![1u8, 2, 3]).content_type(),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(Body::Empty.content_type(), None);
    }

    #[test]
    fn conversions_pick_the_right_variant() {
        assert!(matches!(Body::from("x"), Body::Text(_)));
        assert!(matches!(Body::from(String::from("x")), Body::Text(_)));
        assert!(matches!(Body::from(vec![0u8]), Body::Bytes(_)));
        assert!(matches!(Body::from(Bytes::from_static(b"x")), Body::Bytes(_)));
        assert!(matches!(Body::from(json!({"a": 1})), Body::Json(_)));
        assert!(matches!(Body::json(42).unwrap(), Body::Json(_)));
    }
}
