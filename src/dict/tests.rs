use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::determinant::BoundedDeterminant;
use crate::test_util::{self, Offset, Planet, Sparse};

fn planets<V>() -> EnumDictionary<Planet, V> {
    test_util::init();
    EnumDictionary::for_enum().unwrap()
}

fn bounded<V>(size: usize) -> FixedSizeDictionary<usize, V, BoundedDeterminant> {
    test_util::init();
    FixedSizeDictionary::new(Arc::new(BoundedDeterminant::new(size))).unwrap()
}

#[test]
fn test_reject_zero_size() {
    let err = FixedSizeDictionary::<usize, (), _>::new(Arc::new(BoundedDeterminant::new(0)))
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }), "{err:?}");
}

#[test]
fn test_capacity_follows_determinant() {
    assert_eq!(planets::<()>().capacity(), 8);
    assert_eq!(EnumDictionary::<Sparse, ()>::for_enum().unwrap().capacity(), 11);
    assert_eq!(EnumDictionary::<Offset, ()>::for_enum().unwrap().capacity(), 1002);
}

#[test]
fn test_add_duplicate_keeps_first() {
    let mut dict = planets();
    dict.add(Planet::Mars, "red").unwrap();

    let version = dict.version();
    assert_eq!(dict.add(Planet::Mars, "rusty"), Err(Error::DuplicateKey { index: 3 }));
    assert_eq!(dict.version(), version);
    assert_eq!(dict.len(), 1);
    assert_eq!(dict[Planet::Mars], "red");
}

#[test]
fn test_set_overwrite() {
    let mut dict = planets();
    assert_eq!(dict.set(Planet::Earth, 1), None);
    assert_eq!(dict.set(Planet::Earth, 2), Some(1));

    assert_eq!(dict.len(), 1);
    assert_eq!(dict.lookup(&Planet::Earth), Ok(&2));
}

#[test]
fn test_overwrite_bumps_version() {
    let mut dict = planets();
    dict.set(Planet::Earth, 1);
    let version = dict.version();

    dict.set(Planet::Earth, 2);
    assert_ne!(dict.version(), version);

    let version = dict.version();
    *dict.get_mut(&Planet::Earth).unwrap() += 1;
    dict[Planet::Earth] += 1;
    assert_eq!(dict.version(), version);
    assert_eq!(dict[Planet::Earth], 4);
}

#[test]
fn test_remove() {
    let mut dict = planets();
    dict.set(Planet::Venus, "hot");
    dict.set(Planet::Uranus, "cold");

    assert!(dict.remove(&Planet::Venus));
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.lookup(&Planet::Venus), Err(Error::NotFound { index: 1 }));
    assert_eq!(dict.get(&Planet::Venus), None);
    assert!(!dict.contains_key(&Planet::Venus));

    let version = dict.version();
    assert!(!dict.remove(&Planet::Venus));
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.version(), version);

    assert_eq!(dict.take(&Planet::Uranus), Some("cold"));
    assert!(dict.is_empty());
}

#[test]
#[should_panic = "no value for the key at index 7"]
fn test_index_missing() {
    let dict = planets::<i32>();
    let _ = &dict[Planet::Neptune];
}

#[test]
fn test_iteration_order() {
    let mut dict = bounded(6);
    dict.set(3, 'c');
    dict.set(1, 'a');
    dict.set(4, 'd');

    assert_eq!(dict.iter().collect::<Vec<_>>(), [(1, &'a'), (3, &'c'), (4, &'d')]);
    assert_eq!(dict.keys().iter().collect::<Vec<_>>(), [1, 3, 4]);
    assert_eq!(dict.values().iter().collect::<String>(), "acd");
    assert_eq!(dict.into_iter().collect::<Vec<_>>(), [(1, 'a'), (3, 'c'), (4, 'd')]);
}

#[test]
fn test_iter_mut() {
    let mut dict = planets();
    dict.set(Planet::Saturn, 6);
    dict.set(Planet::Mercury, 1);

    for (planet, value) in &mut dict {
        if planet == Planet::Saturn {
            *value *= 10;
        }
    }
    for value in dict.values_mut() {
        *value += 1;
    }

    assert_eq!(dict.iter().collect::<Vec<_>>(), [(Planet::Mercury, &2), (Planet::Saturn, &61)]);
}

#[test]
fn test_sparse_keys() {
    let mut dict = EnumDictionary::<Sparse, &str>::for_enum().unwrap();
    dict.set(Sparse::Ten, "ten");
    dict.set(Sparse::Zero, "zero");

    assert_eq!(dict.iter().collect::<Vec<_>>(), [(Sparse::Zero, &"zero"), (Sparse::Ten, &"ten")]);
    assert!(!dict.contains_key(&Sparse::Five));
}

#[test]
fn test_cursor_detects_insertion() {
    let mut dict = planets();
    dict.set(Planet::Venus, 'v');
    dict.set(Planet::Mars, 'm');

    let mut cursor = dict.cursor();
    assert_eq!(cursor.advance(&dict), Ok(Some((Planet::Venus, &'v'))));

    dict.set(Planet::Jupiter, 'j');
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));
}

#[test]
fn test_cursor_detects_overwrite_and_clear() {
    let mut dict = planets();
    dict.set(Planet::Venus, 'v');

    let mut cursor = dict.cursor();
    dict.set(Planet::Venus, 'V');
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));

    cursor.reset(&dict);
    dict.clear();
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));
}

#[test]
fn test_cursor_detects_removal() {
    let mut dict = planets();
    dict.set(Planet::Mercury, 1);
    dict.set(Planet::Earth, 3);
    dict.set(Planet::Neptune, 8);

    let mut cursor = dict.cursor();
    assert_eq!(cursor.advance(&dict), Ok(Some((Planet::Mercury, &1))));
    assert!(dict.remove(&Planet::Earth));
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));

    cursor.reset(&dict);
    assert_eq!(dict.take(&Planet::Neptune), Some(8));
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));

    cursor.reset(&dict);
    dict.retain(|_, value| *value > 1);
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));
    assert!(dict.is_empty());
}

#[test]
fn test_cursor_survives_writes_without_effect() {
    let mut dict = planets();
    dict.set(Planet::Mars, 4);

    let mut cursor = dict.cursor();
    assert!(!dict.remove(&Planet::Venus));
    assert_eq!(dict.take(&Planet::Venus), None);
    dict.retain(|_, _| true);
    assert!(dict.add(Planet::Mars, 40).is_err());
    *dict.get_or_insert_with(Planet::Mars, || 0) += 1;
    assert_eq!(cursor.advance(&dict), Ok(Some((Planet::Mars, &5))));
    assert_eq!(cursor.advance(&dict), Ok(None));
}

#[test]
fn test_cursor_detects_add_and_extend() {
    let mut dict = planets();
    dict.set(Planet::Mars, 4);

    let mut cursor = dict.cursor();
    dict.add(Planet::Venus, 2).unwrap();
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));

    cursor.reset(&dict);
    dict.get_or_insert_with(Planet::Saturn, || 6);
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));

    cursor.reset(&dict);
    dict.extend([(Planet::Mars, 40)]);
    assert_eq!(cursor.advance(&dict), Err(Error::ConcurrentModification));
}

#[test]
fn test_cursor_is_restartable() {
    let mut dict = bounded(5);
    dict.set(0, "zero");
    dict.set(4, "four");

    let mut first = dict.cursor();
    let mut second = dict.cursor();
    assert_eq!(first.advance(&dict), Ok(Some((0, &"zero"))));
    assert_eq!(first.advance(&dict), Ok(Some((4, &"four"))));
    assert_eq!(first.advance(&dict), Ok(None));
    assert_eq!(first.advance(&dict), Ok(None));

    assert_eq!(second.advance(&dict), Ok(Some((0, &"zero"))));

    *dict.get_mut(&4).unwrap() = "FOUR";
    first.reset(&dict);
    assert_eq!(first.advance(&dict), Ok(Some((0, &"zero"))));
    assert_eq!(first.advance(&dict), Ok(Some((4, &"FOUR"))));
    assert_eq!(first.advance(&dict), Ok(None));
}

#[test]
fn test_copy_from_dictionary() {
    let mut a = bounded(3);
    a.set(1, String::from("x"));
    a.set(2, String::from("y"));

    let mut b = FixedSizeDictionary::from_dictionary(&a).unwrap();
    assert_eq!(b.len(), 2);
    assert_eq!(b.lookup(&1).unwrap(), "x");
    assert_eq!(b.lookup(&2).unwrap(), "y");
    assert!(Arc::ptr_eq(a.determinant(), b.determinant()));
    assert_eq!(a, b);

    b.set(1, String::from("changed"));
    b.remove(&2);
    assert_eq!(a.lookup(&1).unwrap(), "x");
    assert_eq!(a.lookup(&2).unwrap(), "y");
    assert_ne!(a, b);
}

#[test]
fn test_from_entries() {
    let determinant = Arc::new(EnumDeterminant::<Planet>::new().unwrap());
    let source: BTreeMap<_, _> = [(Planet::Neptune, 8), (Planet::Earth, 3)].into_iter().collect();

    let dict = FixedSizeDictionary::from_entries(Arc::clone(&determinant), source.clone()).unwrap();
    assert_eq!(dict.len(), source.len());
    assert!(dict.iter().map(|(planet, &value)| (planet, value)).eq(source));

    let err = FixedSizeDictionary::from_entries(
        determinant,
        [(Planet::Earth, 1), (Planet::Mars, 2), (Planet::Earth, 3)],
    )
    .unwrap_err();
    assert_eq!(err, Error::DuplicateKey { index: 2 });
}

#[test]
fn test_clear() {
    let mut dict = planets();
    for &planet in Planet::VARIANTS {
        dict.set(planet, planet as usize);
    }
    assert_eq!(dict.len(), 8);

    let version = dict.version();
    dict.clear();
    assert_eq!(dict.len(), 0);
    assert_eq!(dict.iter().count(), 0);
    assert_eq!(dict.capacity(), 8);
    assert_ne!(dict.version(), version);

    let version = dict.version();
    dict.clear();
    assert_ne!(dict.version(), version);
}

#[test]
fn test_get_or_insert_with() {
    let mut dict = planets::<Vec<&str>>();
    dict.get_or_insert_with(Planet::Jupiter, Vec::new).push("io");
    let version = dict.version();
    dict.get_or_insert_with(Planet::Jupiter, || unreachable!()).push("europa");

    assert_eq!(dict.version(), version);
    assert_eq!(dict[Planet::Jupiter], ["io", "europa"]);
}

#[test]
fn test_retain() {
    let mut dict = bounded(10);
    dict.extend((0..10).map(|key| (key, key * key)));

    let version = dict.version();
    dict.retain(|key, value| {
        *value += 1;
        key % 2 == 0
    });
    assert_ne!(dict.version(), version);
    assert_eq!(dict.values().iter().copied().collect::<Vec<_>>(), [1, 5, 17, 37, 65]);

    let version = dict.version();
    dict.retain(|_, _| true);
    assert_eq!(dict.version(), version);
}

#[test]
fn test_debug() {
    let mut dict = planets();
    dict.set(Planet::Mars, 4);
    dict.set(Planet::Earth, 3);
    assert_eq!(format!("{dict:?}"), "{Earth: 3, Mars: 4}");
}

macro_rules! test_copy_to {
    ($($name:ident: $len:literal @ $offset:literal => $expect:expr;)*) => {
        paste::paste! {
            $(
                #[test]
                fn [<test_copy_to_ $name>]() {
                    let mut dict = bounded(4);
                    dict.set(2, 20);
                    dict.set(0, 0);

                    let mut keys = vec![usize::MAX; $len];
                    let mut values = vec![-1; $len];
                    let keys_result = dict.keys().copy_to(&mut keys, $offset);
                    let values_result = dict.values().copy_to(&mut values, $offset);

                    let expect: Result<(Vec<usize>, Vec<i32>)> = $expect;
                    match expect {
                        Ok((expect_keys, expect_values)) => {
                            assert_eq!(keys_result, Ok(()));
                            assert_eq!(values_result, Ok(()));
                            assert_eq!(keys, expect_keys);
                            assert_eq!(values, expect_values);
                        }
                        Err(err) => {
                            assert_eq!(keys_result, Err(err.clone()));
                            assert_eq!(values_result, Err(err));
                        }
                    }
                }
            )*
        }
    }
}

test_copy_to! {
    exact: 2 @ 0 => Ok((vec![0, 2], vec![0, 20]));
    offset: 4 @ 1 => Ok((vec![usize::MAX, 0, 2, usize::MAX], vec![-1, 0, 20, -1]));
    offset_at_end: 3 @ 1 => Ok((vec![usize::MAX, 0, 2], vec![-1, 0, 20]));
    too_short: 1 @ 0 => Err(Error::Capacity { offset: 0, available: 1, required: 2 });
    offset_too_far: 3 @ 2 => Err(Error::Capacity { offset: 2, available: 1, required: 2 });
    offset_out_of_bounds: 3 @ 5 => Err(Error::Capacity { offset: 5, available: 0, required: 2 });
}

#[test]
fn test_keys_contains() {
    let mut dict = planets();
    dict.set(Planet::Earth, ());
    let keys = dict.keys();
    assert!(keys.contains(&Planet::Earth));
    assert!(!keys.contains(&Planet::Mars));
    assert_eq!(keys.len(), 1);
}

#[test]
fn test_random_operations_match_model() {
    test_util::init();

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut dict = bounded(32);
    let mut model = BTreeMap::new();

    for step in 0..2000_u32 {
        let key = rng.gen_range(0..32);
        match rng.gen_range(0..10) {
            0..=3 => assert_eq!(dict.set(key, step), model.insert(key, step)),
            4..=5 => {
                let result = dict.add(key, step);
                if let std::collections::btree_map::Entry::Vacant(entry) = model.entry(key) {
                    entry.insert(step);
                    assert_eq!(result, Ok(()));
                } else {
                    assert_eq!(result, Err(Error::DuplicateKey { index: key }));
                }
            }
            6..=8 => assert_eq!(dict.remove(&key), model.remove(&key).is_some()),
            _ => {
                if rng.gen_bool(0.1) {
                    dict.clear();
                    model.clear();
                }
            }
        }

        assert_eq!(dict.len(), model.len());
        assert_eq!(dict.iter().count(), dict.len());
    }

    assert!(dict.into_iter().eq(model));
}
