//! Json conversion.

use crate::builder::{build_map, build_vector, BuildResult, MapBuilder, VectorBuilder};
use crate::flex::{Flex, FlexResult, Value};
use crate::{BuildError, FlexBuf, FlexBuilder};
use serde_json::Map as JsonMap;

impl TryFrom<&serde_json::Value> for FlexBuf {
    type Error = BuildError;

    #[inline]
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Array(values) => build_vector(|builder| write_vector(builder, values)),
            serde_json::Value::Object(object) => build_map(|builder| write_map(builder, object)),
            _ => {
                let mut builder = FlexBuilder::try_new()?;
                write_scalar(&mut builder, value)?;
                builder.finish()
            }
        }
    }
}

impl FlexBuf {
    /// Parses a json string to `FlexBuf`.
    #[inline]
    pub fn parse<T: AsRef<str>>(str: T) -> BuildResult<Self> {
        let json: serde_json::Value = serde_json::from_str(str.as_ref()).map_err(BuildError::JsonError)?;
        FlexBuf::try_from(&json)
    }
}

impl Flex {
    /// Converts the buffer back into a `serde_json::Value`. Map entries come
    /// out in key order, non-finite floats become json null, and blobs
    /// become arrays of numbers.
    #[inline]
    pub fn to_json(&self) -> FlexResult<serde_json::Value> {
        value_to_json(self.root()?)
    }
}

fn write_scalar(builder: &mut FlexBuilder, value: &serde_json::Value) -> BuildResult<()> {
    match value {
        serde_json::Value::Null => builder.push_null(),
        serde_json::Value::Bool(val) => builder.push_bool(*val),
        serde_json::Value::Number(val) => push_number(builder, val),
        serde_json::Value::String(val) => builder.push_string(val),
        _ => unreachable!("internal error: scalar expected"),
    }
}

#[inline]
fn push_number(builder: &mut FlexBuilder, value: &serde_json::Number) -> BuildResult<()> {
    if let Some(val) = value.as_i64() {
        builder.push_i64(val)
    } else if let Some(val) = value.as_u64() {
        builder.push_u64(val)
    } else if let Some(val) = value.as_f64() {
        builder.push_f64(val)
    } else {
        unreachable!("internal error: entered unreachable number representation")
    }
}

fn write_vector(builder: &mut VectorBuilder, array: &[serde_json::Value]) -> BuildResult<()> {
    for value in array {
        match value {
            serde_json::Value::Null => {
                builder.push_null()?;
            }
            serde_json::Value::Bool(val) => {
                builder.push_bool(*val)?;
            }
            serde_json::Value::Number(val) => {
                if let Some(val) = val.as_i64() {
                    builder.push_i64(val)?;
                } else if let Some(val) = val.as_u64() {
                    builder.push_u64(val)?;
                } else if let Some(val) = val.as_f64() {
                    builder.push_f64(val)?;
                } else {
                    unreachable!("internal error: entered unreachable number representation")
                }
            }
            serde_json::Value::String(val) => {
                builder.push_string(val)?;
            }
            serde_json::Value::Array(val) => {
                let mut vector_builder = builder.push_vector()?;
                write_vector(&mut vector_builder, val)?;
                vector_builder.finish()?;
            }
            serde_json::Value::Object(val) => {
                let mut map_builder = builder.push_map()?;
                write_map(&mut map_builder, val)?;
                map_builder.finish()?;
            }
        }
    }
    Ok(())
}

fn write_map(builder: &mut MapBuilder, object: &JsonMap<String, serde_json::Value>) -> BuildResult<()> {
    for (key, value) in object {
        match value {
            serde_json::Value::Null => {
                builder.push_null(key)?;
            }
            serde_json::Value::Bool(val) => {
                builder.push_bool(key, *val)?;
            }
            serde_json::Value::Number(val) => {
                if let Some(val) = val.as_i64() {
                    builder.push_i64(key, val)?;
                } else if let Some(val) = val.as_u64() {
                    builder.push_u64(key, val)?;
                } else if let Some(val) = val.as_f64() {
                    builder.push_f64(key, val)?;
                } else {
                    unreachable!("internal error: entered unreachable number representation")
                }
            }
            serde_json::Value::String(val) => {
                builder.push_string(key, val)?;
            }
            serde_json::Value::Array(val) => {
                let mut vector_builder = builder.push_vector(key)?;
                write_vector(&mut vector_builder, val)?;
                vector_builder.finish()?;
            }
            serde_json::Value::Object(val) => {
                let mut map_builder = builder.push_map(key)?;
                write_map(&mut map_builder, val)?;
                map_builder.finish()?;
            }
        }
    }
    Ok(())
}

fn value_to_json(value: Value) -> FlexResult<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(val) => val.into(),
        Value::Int(val) => val.into(),
        Value::UInt(val) => val.into(),
        Value::Float(val) => {
            serde_json::Number::from_f64(val).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Value::String(val) => val.into(),
        Value::Blob(val) => serde_json::Value::Array(val.iter().map(|&b| b.into()).collect()),
        Value::Vector(vector) => {
            let mut array = Vec::with_capacity(vector.len());
            for element in vector.iter() {
                array.push(value_to_json(element?)?);
            }
            serde_json::Value::Array(array)
        }
        Value::Map(map) => {
            let mut object = JsonMap::new();
            for entry in map.iter()? {
                let (key, value) = entry?;
                object.insert(key.to_string(), value_to_json(value)?);
            }
            serde_json::Value::Object(object)
        }
    })
}
