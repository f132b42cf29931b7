//! Vector access.

use crate::bit_width::BitWidth;
use crate::flex::{indirect, null_terminated, read_uint, read_value, FlexError, FlexResult, Value};
use crate::flex_type::FlexType;

/// A vector in FlexBuffers binary format: heterogeneous, typed or a fixed
/// tuple, depending on its type tag.
#[derive(Copy, Clone, Debug)]
pub struct Vector<'a> {
    bytes: &'a [u8],
    /// Position of the first element slot.
    pos: usize,
    width: BitWidth,
    len: usize,
    flex_type: FlexType,
}

impl<'a> Vector<'a> {
    pub(crate) fn try_new(
        bytes: &'a [u8],
        pos: usize,
        byte_width: usize,
        flex_type: FlexType,
    ) -> FlexResult<Self> {
        let width =
            BitWidth::from_byte_width(byte_width).ok_or(FlexError::InvalidWidth(byte_width as u8))?;
        let len = if flex_type.is_fixed_typed_vector() {
            flex_type.fixed_typed_vector_info().1
        } else {
            let len_pos = pos.checked_sub(byte_width).ok_or(FlexError::IndexOutOfBounds {
                len: bytes.len(),
                index: pos,
            })?;
            read_uint(bytes, len_pos, byte_width)? as usize
        };
        Ok(Vector {
            bytes,
            pos,
            width,
            len,
            flex_type,
        })
    }

    /// A view over the values region of a map, which shares the untyped
    /// vector layout.
    pub(crate) fn untyped(bytes: &'a [u8], pos: usize, width: BitWidth, len: usize) -> Self {
        Vector {
            bytes,
            pos,
            width,
            len,
            flex_type: FlexType::Vector,
        }
    }

    /// The vector's type tag.
    #[inline]
    pub fn flex_type(&self) -> FlexType {
        self.flex_type
    }

    /// Returns the number of elements in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> FlexResult<Value<'a>> {
        if index >= self.len {
            return Err(FlexError::IndexOutOfBounds {
                len: self.len,
                index,
            });
        }
        let byte_width = self.width.byte_width();
        let slot = self.pos + index * byte_width;
        let packed = match self.flex_type {
            FlexType::Vector => {
                // The type table follows the element slots.
                let type_pos = self.pos + self.len * byte_width + index;
                *self
                    .bytes
                    .get(type_pos)
                    .ok_or(FlexError::IndexOutOfBounds {
                        len: self.bytes.len(),
                        index: type_pos,
                    })?
            }
            t if t.is_fixed_typed_vector() => {
                let (element, _) = t.fixed_typed_vector_info();
                element.packed(self.width)
            }
            t => t.typed_vector_element().packed(self.width),
        };
        read_value(self.bytes, slot, byte_width, packed)
    }

    /// Gets an iterator over the elements of the vector.
    #[inline]
    pub fn iter(&self) -> VectorIter<'a> {
        VectorIter {
            vector: *self,
            index: 0,
        }
    }

    /// The raw bytes of the key at `index`, without its null terminator.
    pub(crate) fn key_at(&self, index: usize) -> FlexResult<&'a [u8]> {
        let byte_width = self.width.byte_width();
        let slot = self.pos + index * byte_width;
        let target = indirect(self.bytes, slot, byte_width)?;
        null_terminated(self.bytes, target)
    }
}

/// An iterator over the elements of a vector.
#[derive(Clone)]
pub struct VectorIter<'a> {
    vector: Vector<'a>,
    index: usize,
}

impl<'a> Iterator for VectorIter<'a> {
    type Item = FlexResult<Value<'a>>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.len() {
            return None;
        }
        let value = self.vector.get(self.index);
        self.index += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len() - self.index;
        (remaining, Some(remaining))
    }
}
