//! Encoding and random-access decoding support for FlexBuffers in Rust.
//!
//! FlexBuffers is a self-describing, schema-less binary format. Any nested
//! value in a finished buffer can be reached in O(1) steps without parsing
//! the rest of the document, because containers store their elements in
//! fixed-width slots and children always sit at backward offsets from the
//! slot that references them.
//!
//! ## Optional features
//!
//! ### `serde`
//!
//! When this optional dependency is enabled, `FlexBuf` implements the
//! `serde::Serialize` and `serde::Deserialize` traits.
//!
//! ## FlexBuffers binary format
//!
//! All integers are little-endian. A buffer is written forward in a single
//! pass and read backward from its last byte.
//!
//! ```BNF
//! buffer ::= data* root-value packed-type root-byte-width
//!
//! // The low two bits of a packed type byte select the byte width of the
//! // described data (0/1/2/3 for 1/2/4/8 bytes), the rest hold the type tag.
//! packed-type ::= uint8      // (type << 2) | width-code
//!
//! type ::=
//!     0 |     // null
//!     1 |     // signed integer
//!     2 |     // unsigned integer
//!     3 |     // float
//!     4 |     // key
//!     5 |     // string
//!     6 |     // indirect signed integer
//!     7 |     // indirect unsigned integer
//!     8 |     // indirect float
//!     9 |     // map
//!     10 |    // vector
//!     11-15 | // typed vectors: int, uint, float, key, string (deprecated)
//!     16-24 | // fixed typed vectors: [int|uint|float] x [2|3|4]
//!     25 |    // blob
//!     26 |    // bool
//!     27      // typed vector of bool
//!
//! // Scalars are stored inline in an element slot, sign- or zero-extended
//! // to the slot width. All other values are stored behind an offset: the
//! // slot holds the distance back to the data.
//! offset ::= uint8 | uint16 | uint32 | uint64   // slot position - target
//!
//! // The stored offset of a vector points at elem[0]; the length sits just
//! // before it. A heterogeneous vector is followed by one packed type byte
//! // per element. Typed vectors omit the type table, fixed typed vectors
//! // also omit the length.
//! vector ::= length elem* packed-type*
//!
//! // The stored offset of a map points at value[0]. The preceding fields
//! // locate a typed vector of sorted keys shared prefix-style.
//! map ::= keys-offset keys-byte-width length value* packed-type*
//!
//! string ::= length uint8* 0x00     // offset points at the first byte
//! key ::= uint8* 0x00               // no length, always byte width 1
//! blob ::= length uint8*
//! ```
//!
//! The suffix of every buffer is the root value, its packed type and its
//! byte width, so readers start at the end.
//!
//! ## Usage
//!
//! ### Building
//!
//! To encode a map or a vector, use [`build_map`] or [`build_vector`]:
//!
//! ```rust
//! use flexbuf::build_map;
//!
//! let buf = build_map(|map| {
//!     map.push_string("name", "flexbuf")?;
//!     map.push_i64("answer", 42)?;
//!     map.push_ints("primes", &[2, 3, 5, 7])?;
//!     Ok(())
//! })
//! .unwrap();
//! ```
//!
//! Scalar roots and full control over scopes go through [`FlexBuilder`]:
//!
//! ```rust
//! use flexbuf::FlexBuilder;
//!
//! let mut builder = FlexBuilder::try_new().unwrap();
//! builder.push_i64(257).unwrap();
//! let buf = builder.finish().unwrap();
//! assert_eq!(buf.as_bytes(), [0x01, 0x01, 0x05, 0x02]);
//! ```
//!
//! ### Reading
//!
//! [`Flex::root`] decodes the trailing descriptor and returns a [`Value`];
//! containers resolve lazily:
//!
//! ```rust
//! use flexbuf::{build_map, Value};
//!
//! let buf = build_map(|map| {
//!     map.push_string("name", "flexbuf")?;
//!     map.push_i64("answer", 42)?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let root = buf.root().unwrap();
//! if let Value::Map(map) = root {
//!     assert!(matches!(map.get("answer").unwrap(), Some(Value::Int(42))));
//! } else {
//!     panic!("root is not a map");
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod binary;
mod bit_width;
mod builder;
mod flex;
mod flex_type;
mod json;
mod pool;
mod vec;

#[cfg(feature = "serde")]
mod serde;

pub use self::{
    bit_width::{BitWidth, InvalidBitWidth},
    builder::{build_map, build_vector, BuildError, BuildResult, FlexBuilder, MapBuilder, VectorBuilder},
    flex::{Flex, FlexBuf, FlexError, FlexResult, KeyIter, Map, MapIter, Value, Vector, VectorIter},
    flex_type::{FlexType, InvalidFlexType},
};
