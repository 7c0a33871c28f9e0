#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can inspect
// bucket chains directly.

use crate::entry::Entry;
use crate::hash_funcs::hash_int;
use crate::hash_table::{EraseError, HashTable, InsertError};
use proptest::prelude::*;
use std::collections::HashMap;

type Table<H> = HashTable<i32, i64, H>;

// Pool-indexed operations: indices shrink to earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i64),
    Erase(usize),
    Lookup(usize),
    ApplyIf(i32, i64),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i32>, Vec<Op>)> {
    proptest::collection::vec(-500i32..500, 1..=40).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i64>()).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Erase),
            2 => idx.clone().prop_map(Op::Lookup),
            1 => (2i32..5, -3i64..3).prop_map(|(m, d)| Op::ApplyIf(m, d)),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_state_machine<H>(mut sut: Table<H>, pool: Vec<i32>, ops: Vec<Op>) -> Result<(), TestCaseError>
where
    H: crate::hash_funcs::KeyHasher<i32>,
{
    let mut model: HashMap<i32, i64> = HashMap::new();
    for op in ops {
        let (pre_len, pre_cap) = (sut.len(), sut.capacity());
        let pre_load = pre_len as f64 / pre_cap as f64;
        match op {
            Op::Insert(i, v) => {
                let k = pool[i];
                let already = model.contains_key(&k);
                match sut.insert(&Entry::new(&k, &v)) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k, v);
                        let expected = if pre_load >= 0.75 { pre_cap * 2 } else { pre_cap };
                        prop_assert_eq!(sut.capacity(), expected);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(sut.capacity(), pre_cap);
                    }
                    Err(e) => prop_assert!(false, "unexpected insert error: {e}"),
                }
            }
            Op::Erase(i) => {
                let k = pool[i];
                match sut.erase(&k) {
                    Ok(()) => {
                        prop_assert!(model.remove(&k).is_some());
                        let expected = if pre_load <= 0.25 { (pre_cap / 2).max(1) } else { pre_cap };
                        prop_assert_eq!(sut.capacity(), expected);
                        prop_assert!(sut.lookup(&k).is_none());
                    }
                    Err(EraseError::Empty) => {
                        prop_assert!(model.is_empty());
                        prop_assert_eq!(sut.capacity(), pre_cap);
                    }
                    Err(EraseError::MissingKey) => {
                        prop_assert!(!model.contains_key(&k));
                        prop_assert_eq!(sut.capacity(), pre_cap);
                    }
                    Err(e) => prop_assert!(false, "unexpected erase error: {e}"),
                }
            }
            Op::Lookup(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.lookup(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::ApplyIf(m, d) => {
                let n = sut.apply_if(|k| k.rem_euclid(m) == 0, |v| *v = v.wrapping_add(d));
                let mut expected = 0;
                for (k, v) in model.iter_mut() {
                    if k.rem_euclid(m) == 0 {
                        *v = v.wrapping_add(d);
                        expected += 1;
                    }
                }
                prop_assert_eq!(n, expected);
            }
        }

        // Post-conditions after each op.
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert_eq!(
            sut.load_factor(),
            Some(sut.len() as f64 / sut.capacity() as f64)
        );
        let chained: usize = (0..sut.capacity())
            .map(|b| sut.bucket(b).map_or(0, |c| c.len()))
            .sum();
        prop_assert_eq!(chained, sut.len());
    }

    // Every key sits in the bucket its hash selects, exactly once.
    for b in 0..sut.capacity() {
        let chain = sut.bucket(b).expect("bucket in range");
        for e in chain {
            prop_assert_eq!(sut.bucket_index(e.key()), b);
            prop_assert_eq!(model.get(e.key()), Some(e.value()));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate inserts fail; missing-key and empty-table erases fail; none
//   of the failures change size or capacity.
// - Growth/shrink happen once, decided on the load before the operation.
// - `load_factor() == len / capacity` and capacity stays a power of two.
// - Chain lengths add up to `len`; every entry sits in its own bucket.
// - `apply_if` mutates and counts exactly the matching entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut = HashTable::new(hash_int as fn(&i32) -> u64).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

// Property: same invariants when every key hashes to one bucket; key
// equality alone tells entries apart.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = HashTable::new((|_: &i32| 0u64) as fn(&i32) -> u64).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}
