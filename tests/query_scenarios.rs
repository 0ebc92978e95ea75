//! End-to-end query scenarios against the reference store

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shale::prelude::*;
use std::collections::HashMap;

fn key(path: &str) -> Key {
    Key::parse(path).unwrap()
}

fn object(fields: &[(&str, Value)]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
    )
}

fn scenario_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.put(key("/k1"), Value::from("a"));
    store.put(key("/k2"), Value::from("b"));
    store.put(key("/k3"), Value::from("c"));
    store
}

fn values(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.value().as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Concrete scenarios
// ============================================================================

#[test]
fn exclude_one_key_ascending_windowed() {
    let store = scenario_store();
    let query = Query::new()
        .filter(Filter::key_prefix(key("/k2")).negate())
        .order(Order::key_asc())
        .offset(0)
        .limit(10);

    let out = store.query(&query).unwrap().collect().unwrap();

    assert_eq!(values(&out), vec!["a", "c"]);
}

#[test]
fn descending_limit_one_takes_the_largest_key() {
    let store = scenario_store();
    let query = Query::new().order(Order::key_desc()).limit(1);

    let out = store.query(&query).unwrap().collect().unwrap();

    assert_eq!(values(&out), vec!["c"]);
}

#[test]
fn offset_at_and_past_entry_count_is_empty() {
    let store = scenario_store();

    for offset in [3usize, 4, 100] {
        let out = store
            .query(&Query::new().offset(offset))
            .unwrap()
            .collect()
            .unwrap();
        assert!(out.is_empty(), "offset {offset} should yield nothing");
    }
}

#[test]
fn limit_zero_is_empty() {
    let store = scenario_store();
    let out = store
        .query(&Query::new().limit(0))
        .unwrap()
        .collect()
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn repeated_execution_is_identical() {
    let store = scenario_store();
    let query = Query::new().order(Order::key_desc()).limit(2);

    let first = store.query(&query).unwrap().collect().unwrap();
    let second = store.query(&query).unwrap().collect().unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Stable sort law
// ============================================================================

#[test]
fn equal_entries_keep_scan_order() {
    // Insertion order is irrelevant (the store scans in key order), so a
    // shuffled insert must not disturb the law: entries tying on every
    // order spec appear in scan (key) order.
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut paths: Vec<String> = (0..20).map(|i| format!("/item/{i:02}")).collect();
    paths.shuffle(&mut rng);

    let store = MemoryStore::new();
    for path in &paths {
        // Same group everywhere: every entry ties under the order below.
        store.put(key(path), object(&[("group", Value::Int(1))]));
    }

    let query = Query::new().order(Order::field_asc("group"));
    let out = store.query(&query).unwrap().collect().unwrap();

    let got: Vec<String> = out.iter().map(|e| e.key().to_string()).collect();
    let mut expected = paths.clone();
    expected.sort();
    assert_eq!(got, expected);
}

#[test]
fn tie_break_orders_apply_in_sequence() {
    let store = MemoryStore::new();
    store.put(
        key("/u/a"),
        object(&[("group", Value::Int(1)), ("age", Value::Int(30))]),
    );
    store.put(
        key("/u/b"),
        object(&[("group", Value::Int(1)), ("age", Value::Int(20))]),
    );
    store.put(
        key("/u/c"),
        object(&[("group", Value::Int(0)), ("age", Value::Int(99))]),
    );

    let query = Query::new()
        .order(Order::field_asc("group"))
        .order(Order::field_asc("age"));
    let out = store.query(&query).unwrap().collect().unwrap();

    let got: Vec<String> = out.iter().map(|e| e.key().to_string()).collect();
    assert_eq!(got, vec!["/u/c", "/u/b", "/u/a"]);
}

// ============================================================================
// Error surface
// ============================================================================

#[test]
fn field_filter_over_non_object_fails_the_query() {
    let store = scenario_store(); // string values, no objects
    let query = Query::new().filter(Filter::field_eq("age", 1i64));

    let result = store.query(&query).unwrap().collect();
    assert!(result.unwrap_err().is_field_access());
}

#[test]
fn field_order_over_mixed_types_fails_the_query() {
    let store = MemoryStore::new();
    store.put(key("/a"), object(&[("v", Value::Int(1))]));
    store.put(key("/b"), object(&[("v", Value::from("one"))]));

    let query = Query::new().order(Order::field_asc("v"));
    let result = store.query(&query).unwrap().collect();
    assert!(result.unwrap_err().is_field_access());
}

// ============================================================================
// Pushdown parity on the store itself
// ============================================================================

fn populated(caps: Capabilities) -> MemoryStore {
    let store = MemoryStore::with_capabilities(caps);
    for (i, age) in [(1, 30), (2, 25), (3, 30), (4, 40), (5, 25)] {
        store.put(
            key(&format!("/users/u{i}")),
            object(&[("age", Value::Int(age))]),
        );
    }
    store
}

proptest! {
    #[test]
    fn capability_combinations_do_not_change_results(
        prefix_native in any::<bool>(),
        range_native in any::<bool>(),
        order_native in any::<bool>(),
        paging_native in any::<bool>(),
        offset in 0usize..6,
        limit in 0usize..6,
    ) {
        let mut caps = Capabilities::none();
        if prefix_native {
            caps = caps.with_filter_kind(FilterKind::KeyPrefix);
        }
        if range_native {
            caps = caps.with_filter_kind(FilterKind::FieldRange);
        }
        if order_native {
            caps = caps.with_ordering();
        }
        if paging_native {
            caps = caps.with_paging();
        }

        let query = Query::new()
            .filter(Filter::key_prefix(key("/users")))
            .filter(Filter::field_range("age", RangeOp::Ge, 25i64))
            .order(Order::field_asc("age"))
            .order(Order::key_asc())
            .offset(offset)
            .limit(limit);

        let reference = populated(Capabilities::none());
        let candidate = populated(caps);

        let expected = reference.query(&query).unwrap().collect().unwrap();
        let actual = candidate.query(&query).unwrap().collect().unwrap();

        prop_assert_eq!(actual, expected);
    }
}
