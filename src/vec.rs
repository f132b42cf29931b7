//! Vec extension.

use crate::binary::padding_bytes;
use crate::bit_width::BitWidth;
use std::collections::TryReserveError;

pub trait VecExt: Sized {
    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError>;
    fn push_uint(&mut self, value: u64, width: BitWidth);
    fn push_int(&mut self, value: i64, width: BitWidth);
    fn push_float(&mut self, value: f64, width: BitWidth);
    fn push_slice(&mut self, bytes: &[u8]);
    fn pad_to(&mut self, byte_width: usize);
}

impl VecExt for Vec<u8> {
    #[inline]
    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut vec = Vec::new();
        vec.try_reserve(capacity)?;
        Ok(vec)
    }

    /// Writes the low `width` bytes of `value` little-endian. The value must
    /// fit the width.
    #[inline]
    fn push_uint(&mut self, value: u64, width: BitWidth) {
        debug_assert!(width.byte_width() <= self.capacity() - self.len());
        let bytes = value.to_le_bytes();
        self.extend_from_slice(&bytes[..width.byte_width()]);
    }

    /// Two's-complement truncation of `value` to `width` bytes, little-endian.
    #[inline]
    fn push_int(&mut self, value: i64, width: BitWidth) {
        self.push_uint(value as u64, width);
    }

    #[inline]
    fn push_float(&mut self, value: f64, width: BitWidth) {
        debug_assert!(matches!(width, BitWidth::W32 | BitWidth::W64));
        if width == BitWidth::W32 {
            self.extend_from_slice(&(value as f32).to_le_bytes());
        } else {
            self.extend_from_slice(&value.to_le_bytes());
        }
    }

    #[inline]
    fn push_slice(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.capacity() - self.len());
        self.extend_from_slice(bytes);
    }

    /// Appends zero bytes until the length is a multiple of `byte_width`.
    #[inline]
    fn pad_to(&mut self, byte_width: usize) {
        for _ in 0..padding_bytes(self.len(), byte_width) {
            self.push(0);
        }
    }
}
