//! End-to-end behavior of the configuration engine

use std::io::Write;

use kvcfg::{hash, ConfigStore, Error};
use tempfile::NamedTempFile;

const SAMPLE: &str = "host = localhost\nport=5432\n# comment\nuser = admin\n";

fn store_with(src: &str, capacity: usize) -> ConfigStore {
    let mut store = ConfigStore::new(Some(capacity)).unwrap();
    store.parse_buffer(src).unwrap();
    store
}

#[test_log::test]
fn test_end_to_end_sample() {
    let mut store = store_with(SAMPLE, 4);

    assert_eq!(store.len(), 3);
    assert_eq!(store.get("port").unwrap(), Some("5432"));
    assert_eq!(store.get_i64("port", 10).unwrap(), 5432);
    assert_eq!(store.get("missing").unwrap(), None);
}

#[test_log::test]
fn test_parse_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let mut store = ConfigStore::new(None).unwrap();
    store.parse_file(file.path()).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.get("user").unwrap(), Some("admin"));
}

#[test]
fn test_parse_missing_file() {
    let mut store = ConfigStore::new(None).unwrap();
    let result = store.parse_file("/nonexistent/kvcfg/app.conf");
    assert!(matches!(result, Err(Error::FileOpen { .. })));
}

#[test]
fn test_values_round_trip_through_get() {
    let lines = [
        ("name", "kvcfg"),
        ("path", "/var/log/messages"),
        ("expr", "a = b + c"),
        ("quoted", "\"spaced out\""),
        ("unicode", "grüße"),
    ];
    let src: String = lines.iter().map(|(k, v)| format!("{} = {}\n", k, v)).collect();
    let mut store = store_with(&src, 2);

    for (key, value) in lines {
        assert_eq!(store.get(key).unwrap(), Some(value), "key {}", key);
    }
}

#[test]
fn test_whitespace_and_comments() {
    let spaced = store_with("  a  =  b  \n", 4);
    let tight = store_with("a=b\n", 4);
    assert_eq!(spaced.entries().unwrap(), tight.entries().unwrap());

    let commented = store_with("#note\na=b\n", 4);
    assert_eq!(commented.len(), 1);
    assert_eq!(commented.key(0).unwrap(), Some("a"));
    assert_eq!(commented.value(0).unwrap(), Some("b"));
}

#[test]
fn test_escape_and_continuation() {
    let mut store = store_with("a=x\\ny\nb=foo\\\nbar\n", 4);

    let a = store.get("a").unwrap().unwrap();
    assert_eq!(a, "x\ny");
    assert_eq!(a.chars().count(), 3);

    assert_eq!(store.get("b").unwrap(), Some("foobar"));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_absent_and_ignored_lines() {
    let store = store_with("no_equals\nempty =\nblank = \"\"\n", 4);

    assert_eq!(store.len(), 2);
    let empty = store.entry(0).unwrap().unwrap();
    assert_eq!(empty.key(), "empty");
    assert_eq!(empty.value(), None);
    assert_eq!(store.value(1).unwrap(), Some("\"\""));
}

#[test]
fn test_cache_agrees_with_scan_for_all_sizes() {
    for n in 1..=12 {
        let src: String = (0..n).map(|i| format!("key{} = value{}\n", i, i)).collect();

        for capacity in 1..=n {
            let mut store = store_with(&src, capacity);

            for _round in 0..2 {
                for i in 0..n {
                    let key = format!("key{}", i);
                    let ordinal = store.index_of(&key).unwrap().unwrap();
                    let direct = store.value(ordinal).unwrap().map(str::to_string);
                    assert_eq!(
                        store.get(&key).unwrap().map(str::to_string),
                        direct,
                        "n={} capacity={} key={}",
                        n,
                        capacity,
                        key
                    );
                }
            }

            let stats = store.cache_stats();
            assert_eq!(stats.hits() + stats.misses(), 2 * n as u64);
            if capacity == n {
                assert_eq!(stats.hits(), n as u64);
            }
        }
    }
}

#[test]
fn test_float_value_with_unit_suffix() {
    let mut store = store_with("indent = 2em\nscale = 1.5E\n", 4);

    assert_eq!(store.get_f64("indent").unwrap(), 2.0);
    assert_eq!(store.get_f64("scale").unwrap(), 1.5);
}

#[test]
fn test_set_value() {
    let mut store = store_with(SAMPLE, 2);

    store.set("host", "db.internal").unwrap();
    assert_eq!(store.get("host").unwrap(), Some("db.internal"));

    let before: Vec<_> = store.entries().unwrap().to_vec();
    let result = store.set("missing", "x");
    assert!(matches!(result, Err(Error::KeyNotFound(_))));
    assert_eq!(store.entries().unwrap(), &before[..]);
}

#[test]
fn test_ordinal_enumeration_in_source_order() {
    let store = store_with("c=3\na=1\n# skip\nb=2\n", 4);

    let keys: Vec<_> = (0..store.len())
        .map(|i| store.key(i).unwrap().unwrap())
        .collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
    assert_eq!(store.entry(store.len()).unwrap(), None);
}

#[test]
fn test_hash_identity_is_shared_by_value_lookup() {
    let store = store_with("primary = 10.0.0.1\nsecondary = 10.0.0.2\n", 4);

    assert_eq!(store.key_of("10.0.0.2").unwrap(), Some("secondary"));
    let entry = store.entry(0).unwrap().unwrap();
    assert_eq!(entry.key_hash(), hash(Some("primary")));
    assert_eq!(entry.value_hash(), hash(Some("10.0.0.1")));
}

#[test]
fn test_teardown_then_queries_fail() {
    let mut store = store_with(SAMPLE, 4);
    store.teardown().unwrap();

    assert!(matches!(store.get("host"), Err(Error::Init)));
    assert!(matches!(store.get_i64("port", 10), Err(Error::Init)));
    assert!(matches!(store.get_i64("port", 1), Err(Error::Init)));
    assert!(matches!(store.get_u64("port", 10), Err(Error::Init)));
    assert!(matches!(store.get_f64("port"), Err(Error::Init)));
    assert!(matches!(store.entry(0), Err(Error::Init)));
    assert!(matches!(store.key(0), Err(Error::Init)));
    assert!(matches!(store.value(0), Err(Error::Init)));
    assert!(matches!(store.index_of("host"), Err(Error::Init)));
    assert!(matches!(store.key_of("admin"), Err(Error::Init)));
    assert!(matches!(store.set("host", "x"), Err(Error::Init)));
    assert!(matches!(store.clear_cache(), Err(Error::Init)));
}
