//! Encoder core.

use crate::binary::{padding_bytes, MAP_PREFIX_FIELDS, MAX_BUFFER_SIZE, ROOT_SUFFIX_SIZE, VECTOR_PREFIX_FIELDS};
use crate::bit_width::BitWidth;
use crate::builder::{BuildError, BuildResult, DEFAULT_SIZE};
use crate::flex::FlexBuf;
use crate::flex_type::FlexType;
use crate::pool::OffsetPool;
use crate::vec::VecExt;

/// A pending value. Inline scalars carry their raw bits; strings, keys,
/// blobs, indirect scalars, vectors and maps carry the absolute offset of
/// data already written to the buffer.
#[derive(Copy, Clone, Debug)]
struct StackValue {
    flex_type: FlexType,
    /// For inline scalars, the smallest width representing the value. For
    /// offset values, the width of the pointed-to data's prefix (length
    /// field, element slots or out-of-line scalar), which is what the packed
    /// type byte of a reference carries.
    min_width: BitWidth,
    bits: u64,
}

impl StackValue {
    #[inline]
    const fn new(flex_type: FlexType, min_width: BitWidth, bits: u64) -> Self {
        StackValue {
            flex_type,
            min_width,
            bits,
        }
    }

    /// Width this value needs in the element slot at `elem_index` of a
    /// vector starting at `buf_len`. Relative offsets grow with the slot
    /// width, so candidate widths are walked in order until one is
    /// self-consistent; widening is monotone and bounded.
    fn elem_width(&self, buf_len: usize, elem_index: usize) -> BitWidth {
        if self.flex_type.is_inline() {
            return self.min_width;
        }
        for byte_width in [1usize, 2, 4, 8] {
            let slot = buf_len + padding_bytes(buf_len, byte_width) + elem_index * byte_width;
            debug_assert!(slot as u64 >= self.bits);
            let offset = slot as u64 - self.bits;
            let bit_width = BitWidth::uint(offset);
            if bit_width.byte_width() == byte_width {
                return bit_width;
            }
        }
        BitWidth::W64
    }

    /// The packed type byte recorded for this value when it is stored in a
    /// slot of `parent_width` bytes.
    #[inline]
    fn packed(&self, parent_width: BitWidth) -> u8 {
        let width = if self.flex_type.is_inline() {
            self.min_width.max(parent_width)
        } else {
            self.min_width
        };
        self.flex_type.packed(width)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum ScopeKind {
    Map,
    Vector,
}

#[derive(Copy, Clone, Debug)]
struct Scope {
    kind: ScopeKind,
    start: usize,
}

/// Single-pass forward encoder for FlexBuffers.
///
/// Values are pushed depth-first: scalars are buffered on a stack, string
/// and key payloads are written immediately and deduplicated, and closing a
/// scope with [`end_vector`](FlexBuilder::end_vector) or
/// [`end_map`](FlexBuilder::end_map) packs the buffered values at the
/// smallest element width that fits every scalar and every backward offset.
/// [`finish`](FlexBuilder::finish) emits the root descriptor and yields the
/// completed buffer.
pub struct FlexBuilder {
    bytes: Vec<u8>,
    stack: Vec<StackValue>,
    scopes: Vec<Scope>,
    strings: OffsetPool,
    keys: OffsetPool,
}

impl FlexBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn try_new() -> BuildResult<Self> {
        Ok(FlexBuilder {
            bytes: Vec::try_with_capacity(DEFAULT_SIZE)?,
            stack: Vec::new(),
            scopes: Vec::new(),
            strings: OffsetPool::default(),
            keys: OffsetPool::default(),
        })
    }

    /// Reserves room for `additional` bytes, failing if the buffer would
    /// outgrow the maximum encodable size.
    #[inline]
    fn reserve(&mut self, additional: usize) -> BuildResult<()> {
        let total = self.bytes.len() as u64 + additional as u64;
        if total > MAX_BUFFER_SIZE {
            return Err(BuildError::SinkOverflow(total));
        }
        self.bytes.try_reserve(additional)?;
        Ok(())
    }

    /// Inside a map scope, values may only follow a key.
    #[inline]
    fn expect_value(&self) -> BuildResult<()> {
        if let Some(scope) = self.scopes.last() {
            if scope.kind == ScopeKind::Map && (self.stack.len() - scope.start) % 2 == 0 {
                return Err(BuildError::MissingKey);
            }
        }
        Ok(())
    }

    #[inline]
    fn push_entry(&mut self, value: StackValue) -> BuildResult<()> {
        self.stack.try_reserve(1)?;
        self.stack.push(value);
        Ok(())
    }

    #[inline]
    fn push_scalar(&mut self, flex_type: FlexType, min_width: BitWidth, bits: u64) -> BuildResult<()> {
        self.expect_value()?;
        self.push_entry(StackValue::new(flex_type, min_width, bits))
    }

    /// Pushes a null value.
    #[inline]
    pub fn push_null(&mut self) -> BuildResult<()> {
        self.push_scalar(FlexType::Null, BitWidth::W8, 0)
    }

    /// Pushes a bool value.
    #[inline]
    pub fn push_bool(&mut self, value: bool) -> BuildResult<()> {
        self.push_scalar(FlexType::Bool, BitWidth::W8, value as u64)
    }

    /// Pushes a signed integer at the smallest signed width that holds it.
    #[inline]
    pub fn push_i64(&mut self, value: i64) -> BuildResult<()> {
        self.push_scalar(FlexType::Int, BitWidth::int(value), value as u64)
    }

    /// Pushes an unsigned integer at the smallest unsigned width that holds it.
    #[inline]
    pub fn push_u64(&mut self, value: u64) -> BuildResult<()> {
        self.push_scalar(FlexType::UInt, BitWidth::uint(value), value)
    }

    /// Pushes a float, narrowed to 32 bits when that is bit-exact.
    #[inline]
    pub fn push_f64(&mut self, value: f64) -> BuildResult<()> {
        self.push_scalar(FlexType::Float, BitWidth::float(value), value.to_bits())
    }

    /// Stores the integer out of line at its natural width and pushes a
    /// reference to it, keeping the enclosing vector's element width
    /// independent of the value's width.
    #[inline]
    pub fn push_indirect_i64(&mut self, value: i64) -> BuildResult<()> {
        self.expect_value()?;
        let width = BitWidth::int(value);
        self.reserve(width.byte_width() * 2)?;
        self.bytes.pad_to(width.byte_width());
        let offset = self.bytes.len() as u64;
        self.bytes.push_int(value, width);
        self.push_entry(StackValue::new(FlexType::IndirectInt, width, offset))
    }

    /// The unsigned counterpart of [`push_indirect_i64`](FlexBuilder::push_indirect_i64).
    #[inline]
    pub fn push_indirect_u64(&mut self, value: u64) -> BuildResult<()> {
        self.expect_value()?;
        let width = BitWidth::uint(value);
        self.reserve(width.byte_width() * 2)?;
        self.bytes.pad_to(width.byte_width());
        let offset = self.bytes.len() as u64;
        self.bytes.push_uint(value, width);
        self.push_entry(StackValue::new(FlexType::IndirectUInt, width, offset))
    }

    /// The float counterpart of [`push_indirect_i64`](FlexBuilder::push_indirect_i64).
    #[inline]
    pub fn push_indirect_f64(&mut self, value: f64) -> BuildResult<()> {
        self.expect_value()?;
        let width = BitWidth::float(value);
        self.reserve(width.byte_width() * 2)?;
        self.bytes.pad_to(width.byte_width());
        let offset = self.bytes.len() as u64;
        self.bytes.push_float(value, width);
        self.push_entry(StackValue::new(FlexType::IndirectFloat, width, offset))
    }

    /// Pushes a map key. Every value inside a map scope must be preceded by
    /// exactly one key; equal keys are written to the buffer once.
    #[inline]
    pub fn push_key<T: AsRef<str>>(&mut self, key: T) -> BuildResult<()> {
        let key = key.as_ref().as_bytes();
        match self.scopes.last() {
            Some(scope)
                if scope.kind == ScopeKind::Map && (self.stack.len() - scope.start) % 2 == 0 => {}
            _ => return Err(BuildError::MisplacedKey),
        }
        let offset = match self.keys.get(key) {
            Some(offset) => offset,
            None => {
                self.reserve(key.len() + 1)?;
                let offset = self.bytes.len() as u64;
                self.bytes.push_slice(key);
                self.bytes.push(0);
                self.keys.insert(key, offset);
                offset
            }
        };
        self.push_entry(StackValue::new(FlexType::Key, BitWidth::W8, offset))
    }

    /// Pushes a UTF-8 string. Equal strings are written to the buffer once.
    #[inline]
    pub fn push_string<T: AsRef<str>>(&mut self, value: T) -> BuildResult<()> {
        self.push_string_bytes(value.as_ref().as_bytes())
    }

    /// Pushes a string of arbitrary bytes. The buffer carries them verbatim
    /// with string framing; readers that insist on UTF-8 will reject them.
    #[inline]
    pub fn push_raw_string(&mut self, value: &[u8]) -> BuildResult<()> {
        self.push_string_bytes(value)
    }

    fn push_string_bytes(&mut self, bytes: &[u8]) -> BuildResult<()> {
        self.expect_value()?;
        let width = BitWidth::uint(bytes.len() as u64);
        let offset = match self.strings.get(bytes) {
            Some(offset) => offset,
            None => {
                self.reserve(width.byte_width() * 2 + bytes.len() + 1)?;
                self.bytes.pad_to(width.byte_width());
                self.bytes.push_uint(bytes.len() as u64, width);
                let offset = self.bytes.len() as u64;
                self.bytes.push_slice(bytes);
                self.bytes.push(0);
                self.strings.insert(bytes, offset);
                offset
            }
        };
        self.push_entry(StackValue::new(FlexType::String, width, offset))
    }

    /// Pushes a blob: length-prefixed bytes without a terminator.
    pub fn push_blob(&mut self, value: &[u8]) -> BuildResult<()> {
        self.expect_value()?;
        let width = BitWidth::uint(value.len() as u64);
        self.reserve(width.byte_width() * 2 + value.len())?;
        self.bytes.pad_to(width.byte_width());
        self.bytes.push_uint(value.len() as u64, width);
        let offset = self.bytes.len() as u64;
        self.bytes.push_slice(value);
        self.push_entry(StackValue::new(FlexType::Blob, width, offset))
    }

    fn push_scalar_vector<T: Copy>(
        &mut self,
        elem_type: FlexType,
        values: &[T],
        fixed: bool,
        elem_width: impl Fn(T) -> BitWidth,
        write: impl Fn(&mut Vec<u8>, T, BitWidth),
    ) -> BuildResult<()> {
        self.expect_value()?;
        if fixed && !(2..=4).contains(&values.len()) {
            return Err(BuildError::InvalidFixedLength(values.len()));
        }
        let mut width = BitWidth::W8;
        for value in values {
            width = width.max(elem_width(*value));
        }
        if !fixed {
            // The length shares the element width.
            width = width.max(BitWidth::uint(values.len() as u64));
        }
        let byte_width = width.byte_width();
        self.reserve(byte_width * (values.len() + 2))?;
        self.bytes.pad_to(byte_width);
        if !fixed {
            self.bytes.push_uint(values.len() as u64, width);
        }
        let offset = self.bytes.len() as u64;
        for value in values {
            write(&mut self.bytes, *value, width);
        }
        let vector_type = elem_type.to_typed_vector(if fixed { values.len() } else { 0 });
        self.push_entry(StackValue::new(vector_type, width, offset))
    }

    /// Writes a homogeneous integer vector in one pass at the common width.
    #[inline]
    pub fn push_ints(&mut self, values: &[i64]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::Int, values, false, BitWidth::int, |bytes, v, w| {
            bytes.push_int(v, w)
        })
    }

    /// Writes a homogeneous unsigned integer vector in one pass.
    #[inline]
    pub fn push_uints(&mut self, values: &[u64]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::UInt, values, false, BitWidth::uint, |bytes, v, w| {
            bytes.push_uint(v, w)
        })
    }

    /// Writes a homogeneous float vector in one pass.
    #[inline]
    pub fn push_floats(&mut self, values: &[f64]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::Float, values, false, BitWidth::float, |bytes, v, w| {
            bytes.push_float(v, w)
        })
    }

    /// Writes a bool vector in one pass.
    #[inline]
    pub fn push_bools(&mut self, values: &[bool]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::Bool, values, false, |_| BitWidth::W8, |bytes, v, w| {
            bytes.push_uint(v as u64, w)
        })
    }

    /// Writes a fixed integer tuple of 2, 3 or 4 elements: no length prefix,
    /// no type table, the arity is carried by the type tag.
    #[inline]
    pub fn push_fixed_ints(&mut self, values: &[i64]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::Int, values, true, BitWidth::int, |bytes, v, w| {
            bytes.push_int(v, w)
        })
    }

    /// The unsigned counterpart of [`push_fixed_ints`](FlexBuilder::push_fixed_ints).
    #[inline]
    pub fn push_fixed_uints(&mut self, values: &[u64]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::UInt, values, true, BitWidth::uint, |bytes, v, w| {
            bytes.push_uint(v, w)
        })
    }

    /// The float counterpart of [`push_fixed_ints`](FlexBuilder::push_fixed_ints).
    #[inline]
    pub fn push_fixed_floats(&mut self, values: &[f64]) -> BuildResult<()> {
        self.push_scalar_vector(FlexType::Float, values, true, BitWidth::float, |bytes, v, w| {
            bytes.push_float(v, w)
        })
    }

    /// Opens a vector scope; every value pushed until the matching
    /// [`end_vector`](FlexBuilder::end_vector) becomes an element.
    #[inline]
    pub fn start_vector(&mut self) -> BuildResult<()> {
        self.expect_value()?;
        self.scopes.try_reserve(1)?;
        self.scopes.push(Scope {
            kind: ScopeKind::Vector,
            start: self.stack.len(),
        });
        Ok(())
    }

    /// Opens a map scope; keys and values alternate until the matching
    /// [`end_map`](FlexBuilder::end_map).
    #[inline]
    pub fn start_map(&mut self) -> BuildResult<()> {
        self.expect_value()?;
        self.scopes.try_reserve(1)?;
        self.scopes.push(Scope {
            kind: ScopeKind::Map,
            start: self.stack.len(),
        });
        Ok(())
    }

    /// Closes the innermost vector scope into a single heterogeneous vector
    /// value: length, elements at the common width, then one packed type
    /// byte per element.
    pub fn end_vector(&mut self) -> BuildResult<()> {
        let scope = match self.scopes.pop() {
            Some(scope) if scope.kind == ScopeKind::Vector => scope,
            _ => return Err(BuildError::UnbalancedScope),
        };
        let len = self.stack.len() - scope.start;
        let value = self.create_vector(scope.start, len, 1, false, None)?;
        self.stack.truncate(scope.start);
        self.stack.push(value);
        Ok(())
    }

    /// Closes the innermost map scope: sorts the buffered pairs by the key
    /// bytes already in the buffer, emits the keys vector and the values
    /// vector, and leaves a single map value on the stack. Duplicate keys
    /// are passed through; looking them up later is unspecified.
    pub fn end_map(&mut self) -> BuildResult<()> {
        let scope = match self.scopes.pop() {
            Some(scope) if scope.kind == ScopeKind::Map => scope,
            _ => return Err(BuildError::UnbalancedScope),
        };
        let len = self.stack.len() - scope.start;
        if len % 2 != 0 {
            return Err(BuildError::OddMapEntries(len));
        }
        debug_assert!(self.stack[scope.start..]
            .iter()
            .step_by(2)
            .all(|v| v.flex_type == FlexType::Key));

        // Pairs are ordered by key content, not by key offset: a pooled key
        // emitted early would otherwise sort by its first use.
        let bytes = &self.bytes;
        let mut pairs: Vec<(StackValue, StackValue)> = self.stack[scope.start..]
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        pairs.sort_by(|a, b| key_bytes(bytes, &a.0).cmp(key_bytes(bytes, &b.0)));
        for (i, (key, value)) in pairs.iter().enumerate() {
            self.stack[scope.start + i * 2] = *key;
            self.stack[scope.start + i * 2 + 1] = *value;
        }

        let keys = self.create_vector(scope.start, len / 2, 2, true, None)?;
        let value = self.create_vector(scope.start + 1, len / 2, 2, false, Some(keys))?;
        self.stack.truncate(scope.start);
        self.stack.push(value);
        Ok(())
    }

    /// Packs `len` stack values starting at `start` (stepping by `step`)
    /// into a vector payload and returns the value describing it.
    fn create_vector(
        &mut self,
        start: usize,
        len: usize,
        step: usize,
        typed: bool,
        keys: Option<StackValue>,
    ) -> BuildResult<StackValue> {
        let prefix_fields = if keys.is_some() {
            MAP_PREFIX_FIELDS
        } else {
            VECTOR_PREFIX_FIELDS
        };
        let mut bit_width = BitWidth::uint(len as u64);
        if let Some(keys) = &keys {
            bit_width = bit_width.max(keys.elem_width(self.bytes.len(), 0));
        }
        let mut elem_type = None;
        for index in 0..len {
            let value = &self.stack[start + index * step];
            bit_width = bit_width.max(value.elem_width(self.bytes.len(), index + prefix_fields));
            if typed {
                debug_assert!(value.flex_type.is_typed_vector_element());
                debug_assert!(elem_type.is_none() || elem_type == Some(value.flex_type));
                elem_type = Some(value.flex_type);
            }
        }
        let byte_width = bit_width.byte_width();

        let type_table = if typed { 0 } else { len };
        self.reserve(byte_width * (len + prefix_fields + 1) + type_table)?;
        self.bytes.pad_to(byte_width);
        if let Some(keys) = &keys {
            self.write_offset(keys.bits, bit_width);
            self.bytes.push_uint(1u64 << keys.min_width as u32, bit_width);
        }
        self.bytes.push_uint(len as u64, bit_width);
        let offset = self.bytes.len() as u64;
        for index in 0..len {
            let value = self.stack[start + index * step];
            self.write_any(value, bit_width);
        }
        if !typed {
            for index in 0..len {
                let packed = self.stack[start + index * step].packed(bit_width);
                self.bytes.push(packed);
            }
        }

        let flex_type = if keys.is_some() {
            FlexType::Map
        } else if typed {
            // An empty typed vector can only come from an empty map's keys.
            elem_type.unwrap_or(FlexType::Key).to_typed_vector(0)
        } else {
            FlexType::Vector
        };
        Ok(StackValue::new(flex_type, bit_width, offset))
    }

    /// Writes one element slot: scalars sign-/zero-extended, everything
    /// else as the backward distance from the slot to its data.
    fn write_any(&mut self, value: StackValue, width: BitWidth) {
        match value.flex_type {
            FlexType::Null | FlexType::Int => self.bytes.push_int(value.bits as i64, width),
            FlexType::UInt | FlexType::Bool => self.bytes.push_uint(value.bits, width),
            FlexType::Float => self.bytes.push_float(f64::from_bits(value.bits), width),
            _ => self.write_offset(value.bits, width),
        }
    }

    #[inline]
    fn write_offset(&mut self, target: u64, width: BitWidth) {
        let offset = self.bytes.len() as u64 - target;
        debug_assert!(width == BitWidth::W64 || offset < 1 << (width.byte_width() * 8));
        self.bytes.push_uint(offset, width);
    }

    /// Consumes the builder, appending the root value and the trailing
    /// `[packed type, root byte width]` descriptor. Exactly one value must
    /// remain on the stack.
    pub fn finish(mut self) -> BuildResult<FlexBuf> {
        if !self.scopes.is_empty() || self.stack.len() != 1 {
            return Err(BuildError::UnbalancedScope);
        }
        let root = self.stack[0];
        let width = root.elem_width(self.bytes.len(), 0);
        let byte_width = width.byte_width();
        self.reserve(byte_width * 2 + ROOT_SUFFIX_SIZE)?;
        self.bytes.pad_to(byte_width);
        self.write_any(root, width);
        self.bytes.push(root.packed(BitWidth::W8));
        self.bytes.push(byte_width as u8);
        Ok(unsafe { FlexBuf::new_unchecked(self.bytes) })
    }
}

/// The key's bytes in the buffer, up to its null terminator.
fn key_bytes<'a>(bytes: &'a [u8], key: &StackValue) -> &'a [u8] {
    debug_assert!(key.flex_type == FlexType::Key);
    let start = key.bits as usize;
    let end = bytes[start..]
        .iter()
        .position(|&b| b == 0)
        .map_or(bytes.len(), |i| start + i);
    &bytes[start..end]
}
