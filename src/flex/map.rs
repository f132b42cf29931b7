//! Map access.

use crate::binary::MAP_PREFIX_FIELDS;
use crate::bit_width::BitWidth;
use crate::flex::vector::Vector;
use crate::flex::{indirect, read_uint, FlexError, FlexResult, Value};
use crate::flex_type::FlexType;
use std::cmp::Ordering;

/// A map in FlexBuffers binary format. Entries are stored sorted by key, so
/// lookup is a binary search over the keys vector.
#[derive(Copy, Clone, Debug)]
pub struct Map<'a> {
    bytes: &'a [u8],
    /// Position of the first value slot.
    pos: usize,
    width: BitWidth,
    len: usize,
}

impl<'a> Map<'a> {
    pub(crate) fn try_new(bytes: &'a [u8], pos: usize, byte_width: usize) -> FlexResult<Self> {
        let width =
            BitWidth::from_byte_width(byte_width).ok_or(FlexError::InvalidWidth(byte_width as u8))?;
        let len_pos = pos.checked_sub(byte_width).ok_or(FlexError::IndexOutOfBounds {
            len: bytes.len(),
            index: pos,
        })?;
        let len = read_uint(bytes, len_pos, byte_width)? as usize;
        Ok(Map {
            bytes,
            pos,
            width,
            len,
        })
    }

    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The keys vector sits behind two prefix fields: its offset and its
    /// byte width.
    fn keys_vector(&self) -> FlexResult<Vector<'a>> {
        let byte_width = self.width.byte_width();
        let keys_pos = self
            .pos
            .checked_sub(byte_width * MAP_PREFIX_FIELDS)
            .ok_or(FlexError::IndexOutOfBounds {
                len: self.bytes.len(),
                index: self.pos,
            })?;
        let target = indirect(self.bytes, keys_pos, byte_width)?;
        let keys_width = read_uint(self.bytes, keys_pos + byte_width, byte_width)? as usize;
        Vector::try_new(self.bytes, target, keys_width, FlexType::VectorKey)
    }

    fn values_vector(&self) -> Vector<'a> {
        Vector::untyped(self.bytes, self.pos, self.width, self.len)
    }

    /// Returns the value corresponding to the key, if it exists. With
    /// duplicate keys, which of their values is returned is unspecified.
    pub fn get<T: AsRef<str>>(&self, key: T) -> FlexResult<Option<Value<'a>>> {
        let key = key.as_ref().as_bytes();
        let keys = self.keys_vector()?;
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match keys.key_at(mid)?.cmp(key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(Some(self.values_vector().get(mid)?)),
            }
        }
        Ok(None)
    }

    /// Returns true if the map contains a value for the specified key.
    #[inline]
    pub fn contains_key<T: AsRef<str>>(&self, key: T) -> FlexResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    #[inline]
    pub fn keys(&self) -> FlexResult<KeyIter<'a>> {
        Ok(KeyIter {
            keys: self.keys_vector()?,
            index: 0,
            len: self.len,
        })
    }

    /// Gets an iterator over the entries of the map, in key order.
    #[inline]
    pub fn iter(&self) -> FlexResult<MapIter<'a>> {
        Ok(MapIter {
            keys: self.keys_vector()?,
            values: self.values_vector(),
            index: 0,
            len: self.len,
        })
    }
}

/// An iterator over the keys of a map.
#[derive(Clone)]
pub struct KeyIter<'a> {
    keys: Vector<'a>,
    index: usize,
    len: usize,
}

impl<'a> Iterator for KeyIter<'a> {
    type Item = FlexResult<&'a str>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let key = read_key(&self.keys, self.index);
        self.index += 1;
        Some(key)
    }
}

/// An iterator over the entries of a map.
#[derive(Clone)]
pub struct MapIter<'a> {
    keys: Vector<'a>,
    values: Vector<'a>,
    index: usize,
    len: usize,
}

impl<'a> Iterator for MapIter<'a> {
    type Item = FlexResult<(&'a str, Value<'a>)>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let entry = read_key(&self.keys, self.index)
            .and_then(|key| Ok((key, self.values.get(self.index)?)));
        self.index += 1;
        Some(entry)
    }
}

#[inline]
fn read_key<'a>(keys: &Vector<'a>, index: usize) -> FlexResult<&'a str> {
    let bytes = keys.key_at(index)?;
    std::str::from_utf8(bytes).map_err(|_| FlexError::InvalidUtf8)
}
