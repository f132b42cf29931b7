//! Map builder.

use crate::builder::encode::FlexBuilder;
use crate::builder::vector::VectorBuilder;
use crate::builder::BuildResult;
use crate::flex::FlexBuf;

/// Builds a map. Entries may be pushed in any order; the emitted buffer
/// always stores them sorted by key so readers can binary-search.
pub struct MapBuilder<'a> {
    builder: &'a mut FlexBuilder,
}

impl<'a> MapBuilder<'a> {
    #[inline]
    pub(crate) fn new(builder: &'a mut FlexBuilder) -> Self {
        MapBuilder { builder }
    }

    /// Pushes a null value.
    #[inline]
    pub fn push_null<K: AsRef<str>>(&mut self, key: K) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_null()?;
        Ok(self)
    }

    /// Pushes a bool value.
    #[inline]
    pub fn push_bool<K: AsRef<str>>(&mut self, key: K, value: bool) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_bool(value)?;
        Ok(self)
    }

    /// Pushes a signed integer value.
    #[inline]
    pub fn push_i64<K: AsRef<str>>(&mut self, key: K, value: i64) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_i64(value)?;
        Ok(self)
    }

    /// Pushes an unsigned integer value.
    #[inline]
    pub fn push_u64<K: AsRef<str>>(&mut self, key: K, value: u64) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_u64(value)?;
        Ok(self)
    }

    /// Pushes a float value.
    #[inline]
    pub fn push_f64<K: AsRef<str>>(&mut self, key: K, value: f64) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_f64(value)?;
        Ok(self)
    }

    /// Pushes a signed integer stored out of line and referenced by offset.
    #[inline]
    pub fn push_indirect_i64<K: AsRef<str>>(&mut self, key: K, value: i64) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_indirect_i64(value)?;
        Ok(self)
    }

    /// Pushes an unsigned integer stored out of line and referenced by offset.
    #[inline]
    pub fn push_indirect_u64<K: AsRef<str>>(&mut self, key: K, value: u64) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_indirect_u64(value)?;
        Ok(self)
    }

    /// Pushes a float stored out of line and referenced by offset.
    #[inline]
    pub fn push_indirect_f64<K: AsRef<str>>(&mut self, key: K, value: f64) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_indirect_f64(value)?;
        Ok(self)
    }

    /// Pushes a string value.
    #[inline]
    pub fn push_string<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_string(value)?;
        Ok(self)
    }

    /// Pushes a string of arbitrary bytes, written verbatim with string
    /// framing.
    #[inline]
    pub fn push_raw_string<K: AsRef<str>>(&mut self, key: K, value: &[u8]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_raw_string(value)?;
        Ok(self)
    }

    /// Pushes a blob value.
    #[inline]
    pub fn push_blob<K: AsRef<str>>(&mut self, key: K, value: &[u8]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_blob(value)?;
        Ok(self)
    }

    /// Pushes a typed integer vector.
    #[inline]
    pub fn push_ints<K: AsRef<str>>(&mut self, key: K, values: &[i64]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_ints(values)?;
        Ok(self)
    }

    /// Pushes a typed unsigned integer vector.
    #[inline]
    pub fn push_uints<K: AsRef<str>>(&mut self, key: K, values: &[u64]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_uints(values)?;
        Ok(self)
    }

    /// Pushes a typed float vector.
    #[inline]
    pub fn push_floats<K: AsRef<str>>(&mut self, key: K, values: &[f64]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_floats(values)?;
        Ok(self)
    }

    /// Pushes a typed bool vector.
    #[inline]
    pub fn push_bools<K: AsRef<str>>(&mut self, key: K, values: &[bool]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_bools(values)?;
        Ok(self)
    }

    /// Pushes a fixed integer tuple of 2, 3 or 4 elements.
    #[inline]
    pub fn push_fixed_ints<K: AsRef<str>>(&mut self, key: K, values: &[i64]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_fixed_ints(values)?;
        Ok(self)
    }

    /// Pushes a fixed unsigned integer tuple of 2, 3 or 4 elements.
    #[inline]
    pub fn push_fixed_uints<K: AsRef<str>>(&mut self, key: K, values: &[u64]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_fixed_uints(values)?;
        Ok(self)
    }

    /// Pushes a fixed float tuple of 2, 3 or 4 elements.
    #[inline]
    pub fn push_fixed_floats<K: AsRef<str>>(&mut self, key: K, values: &[f64]) -> BuildResult<&mut Self> {
        self.builder.push_key(key)?;
        self.builder.push_fixed_floats(values)?;
        Ok(self)
    }

    /// Opens an embedded map under `key`; the returned builder must be
    /// finished before this one is used again.
    #[inline]
    pub fn push_map<K: AsRef<str>>(&mut self, key: K) -> BuildResult<MapBuilder<'_>> {
        self.builder.push_key(key)?;
        self.builder.start_map()?;
        Ok(MapBuilder::new(self.builder))
    }

    /// Opens an embedded vector under `key`; the returned builder must be
    /// finished before this one is used again.
    #[inline]
    pub fn push_vector<K: AsRef<str>>(&mut self, key: K) -> BuildResult<VectorBuilder<'_>> {
        self.builder.push_key(key)?;
        self.builder.start_vector()?;
        Ok(VectorBuilder::new(self.builder))
    }

    /// Finishes the embedded map, emitting its sorted payload.
    #[inline]
    pub fn finish(self) -> BuildResult<()> {
        self.builder.end_map()
    }
}

/// Builds a finished buffer whose root is a map.
///
/// ```rust
/// use flexbuf::build_map;
///
/// use flexbuf::FlexType;
///
/// let buf = build_map(|map| {
///     map.push_string("name", "flexbuf")?;
///     map.push_i64("answer", 42)?;
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(buf.root().unwrap().flex_type(), FlexType::Map);
/// ```
#[inline]
pub fn build_map<F>(populate: F) -> BuildResult<FlexBuf>
where
    F: FnOnce(&mut MapBuilder) -> BuildResult<()>,
{
    let mut builder = FlexBuilder::try_new()?;
    builder.start_map()?;
    let mut map = MapBuilder::new(&mut builder);
    populate(&mut map)?;
    builder.end_map()?;
    builder.finish()
}
