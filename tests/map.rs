//! Map builder tests.

use flexbuf::{build_map, BuildError, FlexBuilder, FlexType, Value};

#[test]
fn test_map() {
    // {"key1": "string", "key2": 123, "key3": true, "key4": null,
    //  "key5": ["abc", false], "key6": {"key": true}}
    let buf = build_map(|builder| {
        builder.push_string("key1", "string")?;
        builder.push_i64("key2", 123)?;
        builder.push_bool("key3", true)?;
        builder.push_null("key4")?;

        let mut vector_builder = builder.push_vector("key5")?;
        vector_builder.push_string("abc")?;
        vector_builder.push_bool(false)?;
        vector_builder.finish()?;

        let mut map_builder = builder.push_map("key6")?;
        map_builder.push_bool("key", true)?;
        map_builder.finish()?;

        Ok(())
    })
    .unwrap();

    let map = match buf.root().unwrap() {
        Value::Map(map) => map,
        v => panic!("expected map, actual {:?}", v),
    };
    assert_eq!(map.len(), 6);
    assert!(!map.is_empty());

    assert!(matches!(map.get("key1").unwrap(), Some(Value::String("string"))));
    assert!(matches!(map.get("key2").unwrap(), Some(Value::Int(123))));
    assert!(matches!(map.get("key3").unwrap(), Some(Value::Bool(true))));
    assert!(matches!(map.get("key4").unwrap(), Some(Value::Null)));
    assert!(map.get("key7").unwrap().is_none());
    assert!(!map.contains_key("key7").unwrap());

    match map.get("key5").unwrap() {
        Some(Value::Vector(vector)) => {
            assert_eq!(vector.len(), 2);
            assert!(matches!(vector.get(0).unwrap(), Value::String("abc")));
            assert!(matches!(vector.get(1).unwrap(), Value::Bool(false)));
        }
        v => panic!("expected vector, actual {:?}", v),
    }
    match map.get("key6").unwrap() {
        Some(Value::Map(nested)) => {
            assert_eq!(nested.len(), 1);
            assert!(matches!(nested.get("key").unwrap(), Some(Value::Bool(true))));
        }
        v => panic!("expected map, actual {:?}", v),
    }
}

#[test]
fn test_map_layout() {
    let buf = build_map(|builder| {
        builder.push_i64("a", 1)?;
        builder.push_i64("b", 2)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(
        buf.as_bytes(),
        [
            0x61, 0x00, // "a"
            0x62, 0x00, // "b"
            0x02, 0x05, 0x04, // keys vector: length, offsets back to the keys
            0x02, 0x01, // keys vector offset, keys byte width
            0x02, // length
            0x01, 0x02, // values
            0x04, 0x04, // value types
            0x04, 0x24, 0x01, // root offset, packed type, root byte width
        ]
    );
}

#[test]
fn test_sorted_emission() {
    // Insertion order does not survive; key order does.
    let buf = build_map(|builder| {
        builder.push_i64("zeta", 1)?;
        builder.push_i64("alpha", 2)?;
        builder.push_i64("mid", 3)?;
        Ok(())
    })
    .unwrap();

    let map = match buf.root().unwrap() {
        Value::Map(map) => map,
        v => panic!("expected map, actual {:?}", v),
    };
    let keys: Vec<&str> = map.keys().unwrap().map(|k| k.unwrap()).collect();
    assert_eq!(keys, ["alpha", "mid", "zeta"]);

    assert!(matches!(map.get("zeta").unwrap(), Some(Value::Int(1))));
    assert!(matches!(map.get("alpha").unwrap(), Some(Value::Int(2))));
    assert!(matches!(map.get("mid").unwrap(), Some(Value::Int(3))));

    let entries: Vec<(&str, i64)> = map
        .iter()
        .unwrap()
        .map(|entry| {
            let (key, value) = entry.unwrap();
            match value {
                Value::Int(v) => (key, v),
                v => panic!("expected int, actual {:?}", v),
            }
        })
        .collect();
    assert_eq!(entries, [("alpha", 2), ("mid", 3), ("zeta", 1)]);
}

#[test]
fn test_key_order_is_byte_lexicographic() {
    let buf = build_map(|builder| {
        builder.push_i64("é", 1)?;
        builder.push_i64("z", 2)?;
        builder.push_i64("Z", 3)?;
        Ok(())
    })
    .unwrap();

    let map = match buf.root().unwrap() {
        Value::Map(map) => map,
        v => panic!("expected map, actual {:?}", v),
    };
    let keys: Vec<&str> = map.keys().unwrap().map(|k| k.unwrap()).collect();
    // "Z" < "z" < "é" in utf-8 byte order.
    assert_eq!(keys, ["Z", "z", "é"]);
}

#[test]
fn test_empty_map() {
    let buf = build_map(|_| Ok(())).unwrap();
    assert_eq!(buf.as_bytes(), [0x00, 0x00, 0x01, 0x00, 0x00, 0x24, 0x01]);

    match buf.root().unwrap() {
        Value::Map(map) => {
            assert_eq!(map.len(), 0);
            assert!(map.is_empty());
            assert!(map.get("key").unwrap().is_none());
            assert_eq!(map.keys().unwrap().count(), 0);
        }
        v => panic!("expected map, actual {:?}", v),
    }
}

#[test]
fn test_missing_key() {
    let mut builder = FlexBuilder::try_new().unwrap();
    builder.start_map().unwrap();
    assert!(matches!(builder.push_i64(1), Err(BuildError::MissingKey)));

    let mut builder = FlexBuilder::try_new().unwrap();
    builder.start_map().unwrap();
    assert!(matches!(builder.start_vector(), Err(BuildError::MissingKey)));
}

#[test]
fn test_misplaced_key() {
    // A key outside any map.
    let mut builder = FlexBuilder::try_new().unwrap();
    assert!(matches!(builder.push_key("k"), Err(BuildError::MisplacedKey)));

    // A key where a value belongs.
    let mut builder = FlexBuilder::try_new().unwrap();
    builder.start_map().unwrap();
    builder.push_key("k").unwrap();
    assert!(matches!(builder.push_key("l"), Err(BuildError::MisplacedKey)));

    // A key inside a vector.
    let mut builder = FlexBuilder::try_new().unwrap();
    builder.start_vector().unwrap();
    assert!(matches!(builder.push_key("k"), Err(BuildError::MisplacedKey)));
}

#[test]
fn test_odd_map_entries() {
    let mut builder = FlexBuilder::try_new().unwrap();
    builder.start_map().unwrap();
    builder.push_key("k").unwrap();
    assert!(matches!(builder.end_map(), Err(BuildError::OddMapEntries(1))));
}

#[test]
fn test_duplicate_keys_pass_through() {
    // The encoder does not deduplicate pairs; lookup among equal keys is
    // unspecified but must not fail.
    let mut builder = FlexBuilder::try_new().unwrap();
    builder.start_map().unwrap();
    builder.push_key("k").unwrap();
    builder.push_i64(1).unwrap();
    builder.push_key("k").unwrap();
    builder.push_i64(2).unwrap();
    builder.end_map().unwrap();
    let buf = builder.finish().unwrap();

    match buf.root().unwrap() {
        Value::Map(map) => {
            assert_eq!(map.len(), 2);
            let keys: Vec<&str> = map.keys().unwrap().map(|k| k.unwrap()).collect();
            assert_eq!(keys, ["k", "k"]);
            assert!(matches!(map.get("k").unwrap(), Some(Value::Int(1 | 2))));
        }
        v => panic!("expected map, actual {:?}", v),
    }
}

#[test]
fn test_determinism() {
    fn build() -> flexbuf::FlexBuf {
        build_map(|builder| {
            builder.push_string("name", "flexbuf")?;
            builder.push_ints("values", &[3, 1, 2])?;
            let mut nested = builder.push_map("nested")?;
            nested.push_f64("pi", 3.5)?;
            nested.finish()?;
            Ok(())
        })
        .unwrap()
    }

    assert_eq!(build(), build());
    assert_eq!(build().as_bytes(), build().as_bytes());
}

#[test]
fn test_map_typed_values() {
    let buf = build_map(|builder| {
        builder.push_uints("u", &[1, 2])?;
        builder.push_fixed_ints("fixed", &[4, 5, 6, 7])?;
        builder.push_bools("flags", &[true, false])?;
        builder.push_blob("blob", &[9, 9])?;
        builder.push_indirect_u64("big", u64::MAX)?;
        builder.push_raw_string("raw", b"plain")?;
        Ok(())
    })
    .unwrap();

    let map = match buf.root().unwrap() {
        Value::Map(map) => map,
        v => panic!("expected map, actual {:?}", v),
    };
    match map.get("fixed").unwrap() {
        Some(Value::Vector(vector)) => {
            assert_eq!(vector.flex_type(), FlexType::VectorInt4);
            assert_eq!(vector.len(), 4);
            assert!(matches!(vector.get(3).unwrap(), Value::Int(7)));
        }
        v => panic!("expected vector, actual {:?}", v),
    }
    match map.get("flags").unwrap() {
        Some(Value::Vector(vector)) => {
            assert_eq!(vector.flex_type(), FlexType::VectorBool);
            assert!(matches!(vector.get(1).unwrap(), Value::Bool(false)));
        }
        v => panic!("expected vector, actual {:?}", v),
    }
    assert!(matches!(map.get("blob").unwrap(), Some(Value::Blob([9, 9]))));
    assert!(matches!(map.get("big").unwrap(), Some(Value::UInt(u64::MAX))));
    // Raw bytes that happen to be valid utf-8 read back as a string.
    assert!(matches!(map.get("raw").unwrap(), Some(Value::String("plain"))));
}
