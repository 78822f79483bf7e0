// src/typed_tests.rs
#[cfg(test)]
mod tests {
    use crate::{AnyKey, AnyValue, MapError, Slot, TypeDescriptor, TypedMap};
    use static_assertions::assert_impl_all;
    use std::sync::Arc;
    use std::thread;

    assert_impl_all!(TypedMap: Send, Sync, Clone, Default);

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct UserId(u32);

    #[derive(Debug, Clone, PartialEq)]
    struct Session {
        user: String,
        hits: u32,
    }

    #[test]
    fn test_basic_operations() -> Result<(), MapError> {
        let map = TypedMap::of::<UserId, Session>();
        assert!(map.is_empty());

        assert_eq!(map.get::<UserId, Session>(&UserId(1))?, None);

        let session = Session {
            user: "alice".to_string(),
            hits: 1,
        };
        map.put(UserId(1), session.clone())?;
        assert_eq!(map.get::<UserId, Session>(&UserId(1))?, Some(session));
        assert!(map.contains_key(&UserId(1))?);

        assert!(map.delete(&UserId(1))?);
        assert!(!map.delete(&UserId(1))?);
        assert_eq!(map.get::<UserId, Session>(&UserId(1))?, None);

        Ok(())
    }

    #[test]
    fn test_rejects_wrong_key_type() {
        let map = TypedMap::of::<i64, i64>();
        map.put(1i64, 10i64).unwrap();

        let err = map.put("x", 10i64).unwrap_err();
        assert_eq!(
            err,
            MapError::TypeMismatch {
                slot: Slot::Key,
                expected: "i64",
                found: "&str",
            }
        );
        assert_eq!(map.len(), 1);

        assert!(map.get::<i32, i64>(&1).is_err());
        assert!(map.delete(&1i32).is_err());
        assert!(map.contains_key(&1u64).is_err());
        assert!(map.put_unique("y", 1i64).is_err());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_rejects_wrong_value_type() {
        let map = TypedMap::of::<String, u8>();

        match map.put("a".to_string(), 300u16) {
            Err(MapError::TypeMismatch { slot: Slot::Value, expected, found }) => {
                assert_eq!(expected, "u8");
                assert_eq!(found, "u16");
            }
            other => panic!("Should have gotten a value mismatch, got {:?}", other),
        }
        assert!(map.is_empty());

        // Asking for the wrong value type is rejected too
        map.put("a".to_string(), 1u8).unwrap();
        assert!(map.get::<String, u16>(&"a".to_string()).is_err());
        assert_eq!(map.get::<String, u8>(&"a".to_string()), Ok(Some(1)));
    }

    #[test]
    fn test_put_unique_keeps_first_value() -> Result<(), MapError> {
        let map = TypedMap::of::<&'static str, i32>();
        assert!(map.put_unique("k", 1)?);
        assert!(!map.put_unique("k", 2)?);
        assert_eq!(map.get::<&str, i32>(&"k")?, Some(1));
        Ok(())
    }

    #[test]
    fn test_unconstrained_map_mixes_types() -> Result<(), MapError> {
        let map = TypedMap::new();
        assert!(map.contract().is_unconstrained());

        map.put(1i32, "narrow".to_string())?;
        map.put(1i64, 2.5f64)?;
        assert_eq!(map.len(), 2);

        assert_eq!(map.get::<i32, String>(&1)?, Some("narrow".to_string()));
        assert_eq!(map.get::<i64, f64>(&1)?, Some(2.5));

        // Stored value is an f64, not a String
        let err = map.get::<i64, String>(&1).unwrap_err();
        assert!(matches!(
            err,
            MapError::TypeMismatch { slot: Slot::Value, found: "f64", .. }
        ));

        // Mixed key types can't all be viewed as one type
        assert!(map.keys_as::<i32>().is_err());
        assert_eq!(map.keys().len(), 2);
        Ok(())
    }

    #[test]
    fn test_keys_as() -> Result<(), MapError> {
        let map = TypedMap::of::<String, ()>();
        map.put("a".to_string(), ())?;
        map.put("b".to_string(), ())?;

        let mut keys = map.keys_as::<String>()?;
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        assert!(map.keys_as::<&str>().is_err());
        Ok(())
    }

    #[test]
    fn test_with() -> Result<(), MapError> {
        let map = TypedMap::with_types(Some(TypeDescriptor::of::<&'static str>()), None);
        map.put("numbers", vec![1, 2, 3])?;

        assert_eq!(map.with(&"numbers", |v: &Vec<i32>| v.len())?, Some(3));
        assert_eq!(map.with(&"missing", |v: &Vec<i32>| v.len())?, None);
        assert!(map.with(&"numbers", |v: &String| v.len()).is_err());
        Ok(())
    }

    #[test]
    fn test_erased_operations() -> Result<(), MapError> {
        let map = TypedMap::of::<u32, String>();
        let key = AnyKey::new(7u32);

        map.put_any(key.clone(), AnyValue::new("seven".to_string()))?;
        let value = map.get_any(&key)?.expect("value should be present");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("seven"));

        assert!(!map.put_unique_any(key.clone(), AnyValue::new("again".to_string()))?);
        assert!(map.put_any(AnyKey::new(7u64), AnyValue::new(String::new())).is_err());
        assert!(map.get_any(&AnyKey::new("7")).is_err());

        assert!(map.delete_any(&key)?);
        assert!(map.is_empty());
        Ok(())
    }

    #[test]
    fn test_erased_arguments_through_generic_methods() -> Result<(), MapError> {
        let map = TypedMap::of::<u32, String>();
        let key = AnyKey::new(7u32);

        map.put(key.clone(), "seven".to_string())?;
        assert_eq!(map.get::<AnyKey, String>(&key)?, Some("seven".to_string()));
        assert!(map.contains_key(&key)?);
        assert_eq!(map.with(&key, |v: &String| v.len())?, Some(5));

        map.put(8u32, AnyValue::new("eight".to_string()))?;
        let value = map.get::<u32, AnyValue>(&8)?.expect("value should be present");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("eight"));
        assert_eq!(map.with(&8u32, |v: &AnyValue| v.is_type::<String>())?, Some(true));

        // Wrapped keys of the wrong type are still rejected
        assert!(map.get::<AnyKey, String>(&AnyKey::new(7u64)).is_err());
        assert!(map.contains_key(&AnyKey::new("7")).is_err());

        assert!(map.delete(&key)?);
        assert!(!map.contains_key(&key)?);
        Ok(())
    }

    #[test]
    fn test_erased_value_from_unconstrained_map() -> Result<(), MapError> {
        let map = TypedMap::new();
        map.put(1u8, 5i32)?;

        let value = map.get::<u8, AnyValue>(&1)?.expect("value should be present");
        assert_eq!(value.descriptor(), TypeDescriptor::of::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&5));
        Ok(())
    }

    #[test]
    fn test_accessors_and_debug() {
        let map = TypedMap::of::<u8, bool>();
        assert_eq!(map.key_type(), Some(TypeDescriptor::of::<u8>()));
        assert_eq!(map.value_type(), Some(TypeDescriptor::of::<bool>()));

        let out = format!("{:?}", map);
        assert!(out.contains("TypedMap"));
        assert!(out.contains("len: 0"));
    }

    #[test]
    fn test_put_unique_race() {
        let map = Arc::new(TypedMap::of::<&'static str, usize>());
        let handles: Vec<_> = (0..12)
            .map(|i| {
                let map = Arc::clone(&map);
                thread::spawn(move || (i, map.put_unique("slot", i).unwrap()))
            })
            .collect();

        let winners: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|(_, inserted)| *inserted)
            .map(|(i, _)| i)
            .collect();

        assert_eq!(winners.len(), 1);
        assert_eq!(map.get::<&str, usize>(&"slot"), Ok(Some(winners[0])));
    }
}
