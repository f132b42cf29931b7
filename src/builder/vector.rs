//! Vector builder.

use crate::builder::encode::FlexBuilder;
use crate::builder::map::MapBuilder;
use crate::builder::BuildResult;
use crate::flex::FlexBuf;

/// Builds a heterogeneous vector; elements keep their insertion order.
pub struct VectorBuilder<'a> {
    builder: &'a mut FlexBuilder,
}

impl<'a> VectorBuilder<'a> {
    #[inline]
    pub(crate) fn new(builder: &'a mut FlexBuilder) -> Self {
        VectorBuilder { builder }
    }

    /// Pushes a null value.
    #[inline]
    pub fn push_null(&mut self) -> BuildResult<&mut Self> {
        self.builder.push_null()?;
        Ok(self)
    }

    /// Pushes a bool value.
    #[inline]
    pub fn push_bool(&mut self, value: bool) -> BuildResult<&mut Self> {
        self.builder.push_bool(value)?;
        Ok(self)
    }

    /// Pushes a signed integer value.
    #[inline]
    pub fn push_i64(&mut self, value: i64) -> BuildResult<&mut Self> {
        self.builder.push_i64(value)?;
        Ok(self)
    }

    /// Pushes an unsigned integer value.
    #[inline]
    pub fn push_u64(&mut self, value: u64) -> BuildResult<&mut Self> {
        self.builder.push_u64(value)?;
        Ok(self)
    }

    /// Pushes a float value.
    #[inline]
    pub fn push_f64(&mut self, value: f64) -> BuildResult<&mut Self> {
        self.builder.push_f64(value)?;
        Ok(self)
    }

    /// Pushes a signed integer stored out of line, so a single wide value
    /// does not widen every element slot of this vector.
    #[inline]
    pub fn push_indirect_i64(&mut self, value: i64) -> BuildResult<&mut Self> {
        self.builder.push_indirect_i64(value)?;
        Ok(self)
    }

    /// Pushes an unsigned integer stored out of line.
    #[inline]
    pub fn push_indirect_u64(&mut self, value: u64) -> BuildResult<&mut Self> {
        self.builder.push_indirect_u64(value)?;
        Ok(self)
    }

    /// Pushes a float stored out of line.
    #[inline]
    pub fn push_indirect_f64(&mut self, value: f64) -> BuildResult<&mut Self> {
        self.builder.push_indirect_f64(value)?;
        Ok(self)
    }

    /// Pushes a string value.
    #[inline]
    pub fn push_string<V: AsRef<str>>(&mut self, value: V) -> BuildResult<&mut Self> {
        self.builder.push_string(value)?;
        Ok(self)
    }

    /// Pushes a string of arbitrary bytes, written verbatim with string
    /// framing.
    #[inline]
    pub fn push_raw_string(&mut self, value: &[u8]) -> BuildResult<&mut Self> {
        self.builder.push_raw_string(value)?;
        Ok(self)
    }

    /// Pushes a blob value.
    #[inline]
    pub fn push_blob(&mut self, value: &[u8]) -> BuildResult<&mut Self> {
        self.builder.push_blob(value)?;
        Ok(self)
    }

    /// Pushes a typed integer vector.
    #[inline]
    pub fn push_ints(&mut self, values: &[i64]) -> BuildResult<&mut Self> {
        self.builder.push_ints(values)?;
        Ok(self)
    }

    /// Pushes a typed unsigned integer vector.
    #[inline]
    pub fn push_uints(&mut self, values: &[u64]) -> BuildResult<&mut Self> {
        self.builder.push_uints(values)?;
        Ok(self)
    }

    /// Pushes a typed float vector.
    #[inline]
    pub fn push_floats(&mut self, values: &[f64]) -> BuildResult<&mut Self> {
        self.builder.push_floats(values)?;
        Ok(self)
    }

    /// Pushes a typed bool vector.
    #[inline]
    pub fn push_bools(&mut self, values: &[bool]) -> BuildResult<&mut Self> {
        self.builder.push_bools(values)?;
        Ok(self)
    }

    /// Pushes a fixed integer tuple of 2, 3 or 4 elements.
    #[inline]
    pub fn push_fixed_ints(&mut self, values: &[i64]) -> BuildResult<&mut Self> {
        self.builder.push_fixed_ints(values)?;
        Ok(self)
    }

    /// Pushes a fixed unsigned integer tuple of 2, 3 or 4 elements.
    #[inline]
    pub fn push_fixed_uints(&mut self, values: &[u64]) -> BuildResult<&mut Self> {
        self.builder.push_fixed_uints(values)?;
        Ok(self)
    }

    /// Pushes a fixed float tuple of 2, 3 or 4 elements.
    #[inline]
    pub fn push_fixed_floats(&mut self, values: &[f64]) -> BuildResult<&mut Self> {
        self.builder.push_fixed_floats(values)?;
        Ok(self)
    }

    /// Opens an embedded map; the returned builder must be finished before
    /// this one is used again.
    #[inline]
    pub fn push_map(&mut self) -> BuildResult<MapBuilder<'_>> {
        self.builder.start_map()?;
        Ok(MapBuilder::new(self.builder))
    }

    /// Opens an embedded vector; the returned builder must be finished
    /// before this one is used again.
    #[inline]
    pub fn push_vector(&mut self) -> BuildResult<VectorBuilder<'_>> {
        self.builder.start_vector()?;
        Ok(VectorBuilder::new(self.builder))
    }

    /// Finishes the embedded vector, emitting its payload.
    #[inline]
    pub fn finish(self) -> BuildResult<()> {
        self.builder.end_vector()
    }
}

/// Builds a finished buffer whose root is a vector.
///
/// ```rust
/// use flexbuf::build_vector;
///
/// use flexbuf::FlexType;
///
/// let buf = build_vector(|vector| {
///     vector.push_i64(1)?;
///     vector.push_string("two")?;
///     vector.push_bool(true)?;
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(buf.root().unwrap().flex_type(), FlexType::Vector);
/// ```
#[inline]
pub fn build_vector<F>(populate: F) -> BuildResult<FlexBuf>
where
    F: FnOnce(&mut VectorBuilder) -> BuildResult<()>,
{
    let mut builder = FlexBuilder::try_new()?;
    builder.start_vector()?;
    let mut vector = VectorBuilder::new(&mut builder);
    populate(&mut vector)?;
    builder.end_vector()?;
    builder.finish()
}
