//! String and key sharing tests.

use flexbuf::{build_map, build_vector, Value};

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle)
        .count()
}

#[test]
fn test_string_dedup() {
    let buf = build_vector(|builder| {
        builder.push_string("hi")?;
        builder.push_string("hi")?;
        Ok(())
    })
    .unwrap();

    // The payload appears once; both slots point at it.
    assert_eq!(count_occurrences(buf.as_bytes(), b"hi\0"), 1);

    match buf.root().unwrap() {
        Value::Vector(vector) => {
            assert!(matches!(vector.get(0).unwrap(), Value::String("hi")));
            assert!(matches!(vector.get(1).unwrap(), Value::String("hi")));
        }
        v => panic!("expected vector, actual {:?}", v),
    }
}

#[test]
fn test_string_dedup_across_containers() {
    let buf = build_map(|builder| {
        builder.push_string("first", "shared-payload")?;
        let mut nested = builder.push_vector("second")?;
        nested.push_string("shared-payload")?;
        nested.push_string("shared-payload")?;
        nested.finish()?;
        Ok(())
    })
    .unwrap();

    assert_eq!(count_occurrences(buf.as_bytes(), b"shared-payload\0"), 1);
}

#[test]
fn test_key_dedup() {
    let buf = build_map(|builder| {
        builder.push_i64("count", 1)?;
        let mut nested = builder.push_map("inner")?;
        nested.push_i64("count", 2)?;
        nested.finish()?;
        Ok(())
    })
    .unwrap();

    assert_eq!(count_occurrences(buf.as_bytes(), b"count\0"), 1);

    match buf.root().unwrap() {
        Value::Map(map) => {
            assert!(matches!(map.get("count").unwrap(), Some(Value::Int(1))));
            match map.get("inner").unwrap() {
                Some(Value::Map(inner)) => {
                    assert!(matches!(inner.get("count").unwrap(), Some(Value::Int(2))));
                }
                v => panic!("expected map, actual {:?}", v),
            }
        }
        v => panic!("expected map, actual {:?}", v),
    }
}

#[test]
fn test_keys_and_strings_pool_separately() {
    // A key and a string with equal content do not share an emission: the
    // string needs its length prefix, the key does not.
    let buf = build_map(|builder| {
        builder.push_string("same", "same")?;
        Ok(())
    })
    .unwrap();

    assert_eq!(count_occurrences(buf.as_bytes(), b"same\0"), 2);
}

#[test]
fn test_empty_string_dedup() {
    let buf = build_vector(|builder| {
        builder.push_string("")?;
        builder.push_string("")?;
        builder.push_string("")?;
        Ok(())
    })
    .unwrap();

    match buf.root().unwrap() {
        Value::Vector(vector) => {
            assert_eq!(vector.len(), 3);
            for element in vector.iter() {
                assert!(matches!(element.unwrap(), Value::String("")));
            }
        }
        v => panic!("expected vector, actual {:?}", v),
    }
}
