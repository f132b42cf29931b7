//! Impl the `serde::Serialize` and `serde::Deserialize` traits.

use crate::binary::ROOT_SUFFIX_SIZE;
use crate::FlexBuf;
use std::fmt::Formatter;

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for FlexBuf {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        if serializer.is_human_readable() {
            let json = self.to_json().map_err(serde::ser::Error::custom)?;
            json.to_string().serialize(serializer)
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> serde::Deserialize<'de> for FlexBuf {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        // Human-readable formats carry json text, so the value is rebuilt
        // through the encoder and comes back normalized (sorted map keys).
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            return FlexBuf::parse(text).map_err(serde::de::Error::custom);
        }

        struct BytesVisitor;

        impl<'de> serde::de::Visitor<'de> for BytesVisitor {
            type Value = Vec<u8>;

            #[inline]
            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "a finished flex buffer")
            }

            #[inline]
            fn visit_bytes<E>(self, v: &[u8]) -> Result<Vec<u8>, E>
            where
                E: serde::de::Error,
            {
                let mut bytes = Vec::new();
                bytes.try_reserve(v.len()).map_err(E::custom)?;
                bytes.extend_from_slice(v);
                Ok(bytes)
            }

            #[inline]
            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Vec<u8>, E>
            where
                E: serde::de::Error,
            {
                Ok(v)
            }
        }

        let bytes = deserializer.deserialize_byte_buf(BytesVisitor)?;
        // The shortest well-formed buffer is a one-byte root plus the
        // trailing packed type and root byte width.
        if bytes.len() <= ROOT_SUFFIX_SIZE {
            return Err(serde::de::Error::invalid_length(bytes.len(), &"a finished flex buffer"));
        }
        Ok(unsafe { FlexBuf::new_unchecked(bytes) })
    }
}
