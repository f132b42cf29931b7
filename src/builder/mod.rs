//! FlexBuffers builder.

mod encode;
mod map;
mod vector;

pub use encode::FlexBuilder;
pub use map::{build_map, MapBuilder};
pub use vector::{build_vector, VectorBuilder};

use std::collections::TryReserveError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const DEFAULT_SIZE: usize = 128;

/// Possible errors that can arise during building. All of them are fatal to
/// the builder: a failed builder must be discarded.
#[derive(Debug)]
pub enum BuildError {
    TryReserveError(TryReserveError),
    /// An `end_*` call does not match the innermost open scope, or `finish`
    /// was called with open scopes or with more or less than one root value.
    UnbalancedScope,
    /// A map scope was closed with a key still waiting for its value.
    OddMapEntries(usize),
    /// A value was pushed into a map scope without a preceding key.
    MissingKey,
    /// A key was pushed where a value belongs, or outside any map scope.
    MisplacedKey,
    /// Fixed vectors hold exactly 2, 3 or 4 elements.
    InvalidFixedLength(usize),
    /// The encoded buffer would exceed the maximum size.
    SinkOverflow(u64),
    JsonError(serde_json::Error),
}

impl Display for BuildError {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            BuildError::TryReserveError(e) => write!(f, "{}", e),
            BuildError::UnbalancedScope => write!(f, "unbalanced scope"),
            BuildError::OddMapEntries(e) => write!(f, "odd number of map entries, actual {}", e),
            BuildError::MissingKey => write!(f, "map value is missing a preceding key"),
            BuildError::MisplacedKey => write!(f, "key pushed outside a map's key slot"),
            BuildError::InvalidFixedLength(e) => {
                write!(f, "fixed vectors hold 2, 3 or 4 elements, actual {}", e)
            }
            BuildError::SinkOverflow(e) => write!(f, "buffer size {} exceeds the maximum", e),
            BuildError::JsonError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for BuildError {}

impl From<TryReserveError> for BuildError {
    #[inline]
    fn from(e: TryReserveError) -> Self {
        BuildError::TryReserveError(e)
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
