//! FlexBuffers type tags.

use crate::bit_width::BitWidth;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Logical type of an encoded value. The numeric codes are part of the wire
/// format and appear, shifted left by two, in every packed type byte.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum FlexType {
    Null = 0,
    Int = 1,
    UInt = 2,
    Float = 3,
    Key = 4,
    String = 5,
    IndirectInt = 6,
    IndirectUInt = 7,
    IndirectFloat = 8,
    Map = 9,
    Vector = 10,
    VectorInt = 11,
    VectorUInt = 12,
    VectorFloat = 13,
    VectorKey = 14,
    /// Kept for reading old buffers; the encoder never produces it.
    VectorString = 15,
    VectorInt2 = 16,
    VectorUInt2 = 17,
    VectorFloat2 = 18,
    VectorInt3 = 19,
    VectorUInt3 = 20,
    VectorFloat3 = 21,
    VectorInt4 = 22,
    VectorUInt4 = 23,
    VectorFloat4 = 24,
    Blob = 25,
    Bool = 26,
    VectorBool = 27,
}

impl FlexType {
    /// Whether values of this type live inside an element slot rather than
    /// behind an offset.
    #[inline]
    pub const fn is_inline(self) -> bool {
        matches!(
            self,
            FlexType::Null | FlexType::Int | FlexType::UInt | FlexType::Float | FlexType::Bool
        )
    }

    /// Whether this type can be the shared element type of a typed vector.
    #[inline]
    pub const fn is_typed_vector_element(self) -> bool {
        matches!(
            self,
            FlexType::Int | FlexType::UInt | FlexType::Float | FlexType::Key | FlexType::String | FlexType::Bool
        )
    }

    /// Whether this is a length-prefixed typed vector.
    #[inline]
    pub const fn is_typed_vector(self) -> bool {
        matches!(
            self,
            FlexType::VectorInt
                | FlexType::VectorUInt
                | FlexType::VectorFloat
                | FlexType::VectorKey
                | FlexType::VectorString
                | FlexType::VectorBool
        )
    }

    /// Whether this is a fixed-length typed vector of 2, 3 or 4 elements.
    #[inline]
    pub const fn is_fixed_typed_vector(self) -> bool {
        self as u8 >= FlexType::VectorInt2 as u8 && self as u8 <= FlexType::VectorFloat4 as u8
    }

    /// The vector tag for elements of this type; `fixed_len` 0 selects the
    /// length-prefixed form, 2/3/4 the fixed tuples.
    #[inline]
    pub(crate) fn to_typed_vector(self, fixed_len: usize) -> FlexType {
        debug_assert!(self.is_typed_vector_element());
        match fixed_len {
            0 => match self {
                FlexType::Int => FlexType::VectorInt,
                FlexType::UInt => FlexType::VectorUInt,
                FlexType::Float => FlexType::VectorFloat,
                FlexType::Key => FlexType::VectorKey,
                FlexType::String => FlexType::VectorString,
                FlexType::Bool => FlexType::VectorBool,
                _ => unreachable!("internal error: not a typed vector element"),
            },
            2 => match self {
                FlexType::Int => FlexType::VectorInt2,
                FlexType::UInt => FlexType::VectorUInt2,
                FlexType::Float => FlexType::VectorFloat2,
                _ => unreachable!("internal error: not a fixed vector element"),
            },
            3 => match self {
                FlexType::Int => FlexType::VectorInt3,
                FlexType::UInt => FlexType::VectorUInt3,
                FlexType::Float => FlexType::VectorFloat3,
                _ => unreachable!("internal error: not a fixed vector element"),
            },
            _ => match self {
                FlexType::Int => FlexType::VectorInt4,
                FlexType::UInt => FlexType::VectorUInt4,
                FlexType::Float => FlexType::VectorFloat4,
                _ => unreachable!("internal error: not a fixed vector element"),
            },
        }
    }

    /// The element type of a length-prefixed typed vector.
    #[inline]
    pub(crate) fn typed_vector_element(self) -> FlexType {
        debug_assert!(self.is_typed_vector());
        match self {
            FlexType::VectorInt => FlexType::Int,
            FlexType::VectorUInt => FlexType::UInt,
            FlexType::VectorFloat => FlexType::Float,
            FlexType::VectorKey => FlexType::Key,
            FlexType::VectorString => FlexType::String,
            _ => FlexType::Bool,
        }
    }

    /// The element type and length of a fixed typed vector.
    #[inline]
    pub(crate) fn fixed_typed_vector_info(self) -> (FlexType, usize) {
        debug_assert!(self.is_fixed_typed_vector());
        let index = self as u8 - FlexType::VectorInt2 as u8;
        let element = match index % 3 {
            0 => FlexType::Int,
            1 => FlexType::UInt,
            _ => FlexType::Float,
        };
        (element, index as usize / 3 + 2)
    }

    /// Combines the type with a storage width into a packed type byte.
    #[inline]
    pub const fn packed(self, width: BitWidth) -> u8 {
        (self as u8) << 2 | width as u8
    }
}

impl From<FlexType> for u8 {
    #[inline]
    fn from(t: FlexType) -> Self {
        t as u8
    }
}

#[derive(Debug)]
#[repr(transparent)]
pub struct InvalidFlexType(u8);

impl TryFrom<u8> for FlexType {
    type Error = InvalidFlexType;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FlexType::Null),
            1 => Ok(FlexType::Int),
            2 => Ok(FlexType::UInt),
            3 => Ok(FlexType::Float),
            4 => Ok(FlexType::Key),
            5 => Ok(FlexType::String),
            6 => Ok(FlexType::IndirectInt),
            7 => Ok(FlexType::IndirectUInt),
            8 => Ok(FlexType::IndirectFloat),
            9 => Ok(FlexType::Map),
            10 => Ok(FlexType::Vector),
            11 => Ok(FlexType::VectorInt),
            12 => Ok(FlexType::VectorUInt),
            13 => Ok(FlexType::VectorFloat),
            14 => Ok(FlexType::VectorKey),
            15 => Ok(FlexType::VectorString),
            16 => Ok(FlexType::VectorInt2),
            17 => Ok(FlexType::VectorUInt2),
            18 => Ok(FlexType::VectorFloat2),
            19 => Ok(FlexType::VectorInt3),
            20 => Ok(FlexType::VectorUInt3),
            21 => Ok(FlexType::VectorFloat3),
            22 => Ok(FlexType::VectorInt4),
            23 => Ok(FlexType::VectorUInt4),
            24 => Ok(FlexType::VectorFloat4),
            25 => Ok(FlexType::Blob),
            26 => Ok(FlexType::Bool),
            27 => Ok(FlexType::VectorBool),
            v => Err(InvalidFlexType(v)),
        }
    }
}

impl Display for InvalidFlexType {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "invalid type tag value '{}'", self.0)
    }
}

impl Error for InvalidFlexType {}

#[cfg(test)]
mod tests {
    use super::FlexType;
    use crate::bit_width::BitWidth;

    #[test]
    fn test_packed() {
        assert_eq!(FlexType::Null.packed(BitWidth::W8), 0);
        assert_eq!(FlexType::Int.packed(BitWidth::W16), 0x05);
        assert_eq!(FlexType::Bool.packed(BitWidth::W8), 0x68);
        assert_eq!(FlexType::VectorInt3.packed(BitWidth::W8), 0x4C);
        assert_eq!(FlexType::Map.packed(BitWidth::W8), 0x24);
    }

    #[test]
    fn test_typed_vector_mapping() {
        assert_eq!(FlexType::Int.to_typed_vector(0), FlexType::VectorInt);
        assert_eq!(FlexType::Key.to_typed_vector(0), FlexType::VectorKey);
        assert_eq!(FlexType::Bool.to_typed_vector(0), FlexType::VectorBool);
        assert_eq!(FlexType::Float.to_typed_vector(2), FlexType::VectorFloat2);
        assert_eq!(FlexType::UInt.to_typed_vector(4), FlexType::VectorUInt4);

        assert_eq!(FlexType::VectorInt.typed_vector_element(), FlexType::Int);
        assert_eq!(FlexType::VectorBool.typed_vector_element(), FlexType::Bool);
        assert_eq!(FlexType::VectorFloat2.fixed_typed_vector_info(), (FlexType::Float, 2));
        assert_eq!(FlexType::VectorInt3.fixed_typed_vector_info(), (FlexType::Int, 3));
        assert_eq!(FlexType::VectorUInt4.fixed_typed_vector_info(), (FlexType::UInt, 4));
    }

    #[test]
    fn test_round_trip_codes() {
        for code in 0u8..=27 {
            let t = FlexType::try_from(code).unwrap();
            assert_eq!(t as u8, code);
        }
        assert!(FlexType::try_from(28).is_err());
        assert!(FlexType::try_from(255).is_err());
    }
}
