use capsule_map::{CapsuleMap, Handle, Kind, MapError, SharedCapsuleMap, Size, Value};
use std::sync::Arc;
use std::thread;

#[test]
fn test_basic_operations() -> Result<(), MapError> {
    let store = SharedCapsuleMap::new();

    // Test empty state
    assert!(store.is_empty()?);
    assert_eq!(store.len()?, 0);

    // Test insertion and retrieval
    store.set("test", 42i32)?;
    assert_eq!(store.get("test")?, Value::Int(42));
    assert_eq!(store.get_as::<i32>("test")?, 42);

    // Test contains_key
    assert!(store.contains_key("test")?);
    assert!(!store.contains_key("nope")?);

    // Test removal
    assert_eq!(store.remove("test")?, Some(Value::Int(42)));
    assert_eq!(store.remove("test")?, None);
    assert!(store.is_empty()?);

    Ok(())
}

#[test]
fn test_keys() -> Result<(), MapError> {
    let store = SharedCapsuleMap::new();

    store.set("one", 1i32)?;
    store.set("two", 2i64)?;
    store.set("three", Size::new(3, 3))?;

    assert_eq!(store.keys()?, vec!["one", "three", "two"]);
    assert_eq!(store.len()?, 3);

    Ok(())
}

#[test]
fn test_error_handling() -> Result<(), MapError> {
    let store = SharedCapsuleMap::new();

    match store.get("nonexistent") {
        Err(MapError::KeyNotFound(key)) => assert_eq!(key, "nonexistent"),
        other => panic!("expected key not found, got {other:?}"),
    }

    store.set("key", 42i32)?;
    match store.get_as::<i64>("key") {
        Err(MapError::TypeMismatch { found, .. }) => assert_eq!(found, Kind::Int),
        other => panic!("expected type mismatch, got {other:?}"),
    }

    assert!(matches!(
        store.with("missing", |_| ()),
        Err(MapError::KeyNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_with_and_with_mut() -> Result<(), MapError> {
    let store = SharedCapsuleMap::new();
    store.set("numbers", vec![1i32, 2, 3])?;

    let length = store.with("numbers", |value| match value {
        Value::IntArray(v) => v.len(),
        _ => 0,
    })?;
    assert_eq!(length, 3);

    let new_len = store.with_mut("numbers", |value| match value {
        Value::IntArray(v) => {
            v.push(4);
            v.push(5);
            v.len()
        }
        _ => 0,
    })?;
    assert_eq!(new_len, 5);
    assert_eq!(store.get("numbers")?, Value::IntArray(vec![1, 2, 3, 4, 5]));

    let kinds = store.with_map(|map| map.kind("numbers"))?;
    assert_eq!(kinds, Some(Kind::IntArray));
    Ok(())
}

#[test]
fn test_thread_safety() -> Result<(), MapError> {
    let store = Arc::new(SharedCapsuleMap::new());
    store.set("counter", 0i32)?;

    let mut handles = vec![];
    for _ in 0..10 {
        let store_clone = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                store_clone
                    .with_mut("counter", |value| {
                        if let Value::Int(counter) = value {
                            *counter += 1;
                        }
                    })
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_as::<i32>("counter")?, 1000);
    Ok(())
}

#[test]
fn test_deep_copy_while_writers_run() -> Result<(), MapError> {
    let store = SharedCapsuleMap::new();
    store.set("ints", vec![0i32; 16])?;

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for round in 1..=50 {
                store
                    .with_mut("ints", |value| {
                        if let Value::IntArray(ints) = value {
                            ints.iter_mut().for_each(|i| *i = round);
                        }
                    })
                    .unwrap();
            }
        })
    };

    for _ in 0..50 {
        let snapshot = store.deep_copy()?;
        let ints = snapshot.get_int_array("ints").expect("ints");
        // A copy never observes a half-written array
        assert!(ints.iter().all(|i| *i == ints[0]));
    }

    writer.join().unwrap();
    Ok(())
}

#[test]
fn test_handles_survive_shared_copies() -> Result<(), MapError> {
    let handle = Handle::new("socket");
    let mut map = CapsuleMap::new();
    map.set_handle("socket", handle.clone());
    map.set_map("nested", CapsuleMap::new());

    let store = SharedCapsuleMap::from_map(map);
    let copy = store.deep_copy()?;
    assert!(copy.get_handle("socket").is_some_and(|h| h.ptr_eq(&handle)));

    let original = store.into_inner().expect("only handle");
    assert!(!std::ptr::eq(
        original.get_map("nested").expect("nested"),
        copy.get_map("nested").expect("nested"),
    ));
    Ok(())
}

#[test]
fn test_into_inner_with_other_handles() {
    let store = SharedCapsuleMap::new();
    let other = store.clone();
    let store = store.into_inner().expect_err("still shared");
    drop(other);
    assert!(store.into_inner().is_ok());
}

#[test]
fn test_poisoned_lock() {
    let store = SharedCapsuleMap::new();
    store.set("count", 1i32).expect("set");

    let writer = store.clone();
    let result = thread::spawn(move || {
        let _ = writer.with_mut("count", |value| {
            *value = Value::Int(2);
            panic!("writer failed");
        });
    })
    .join();
    assert!(result.is_err());

    assert_eq!(store.get("count"), Err(MapError::LockError));
    assert_eq!(store.deep_copy(), Err(MapError::LockError));

    let map = store.into_inner().expect("only handle");
    assert_eq!(map.get_int("count"), Some(2));
}
