use thiserror::Error;
use vc_mapper::MapError;

/// Error of a [`JsonMapper`](crate::JsonMapper) call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonError {
    /// The text is not valid JSON, or could not be written.
    #[error("malformed json: {0}")]
    Syntax(#[from] serde_json::Error),
    /// The document does not fit the target type.
    #[error(transparent)]
    Map(#[from] MapError),
}

impl JsonError {
    /// Returns the mapping error, if that is what failed.
    #[inline]
    pub fn as_map_error(&self) -> Option<&MapError> {
        match self {
            Self::Map(error) => Some(error),
            Self::Syntax(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use vc_mapper::{MapError, NodeKind};

    use super::JsonError;

    #[test]
    fn display() {
        let error = JsonError::from(MapError::Shape {
            path: "/Score".into(),
            expected: "integer",
            found: NodeKind::String,
        });
        assert_eq!(error.to_string(), "expected integer at `/Score`, found string");
        assert!(error.as_map_error().is_some());

        let syntax = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = JsonError::from(syntax);
        assert!(error.to_string().starts_with("malformed json: "));
        assert!(error.as_map_error().is_none());
    }
}
