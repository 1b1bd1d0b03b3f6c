//! Fuzzing harnesses for `yamldiff-core`.
//!
//! Each function takes raw bytes so it can be driven from `cargo fuzz`
//! targets as well as from ordinary tests. Parse failures are ignored;
//! violated comparison invariants panic, which is what the fuzzer reports.
//!
//! ```
//! yamldiff_fuzz::fuzz_parse(b"metadata: {name: a}\n---\nkind: B\n");
//! yamldiff_fuzz::fuzz_compare(&[7, 1, 2, 3, 4, 5]);
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use yamldiff_core::{
    compare, Document, Engine, IdentifierPath, KeyedSet, Mapping, Number, RenderConfig, Value,
};

const MAX_DEPTH: usize = 3;
const MAX_DOCUMENTS: u8 = 8;
const MAX_SEQUENCE_LEN: u8 = 4;
const MAX_MAPPING_LEN: u8 = 5;
const KEYS: [&str; 6] = ["metadata", "name", "spec", "kind", "data", "v"];
const NAMES: [&str; 4] = ["web", "db", "cache", ""];

/// Parses bytes as a YAML stream and compares the result with itself.
///
/// ```
/// yamldiff_fuzz::fuzz_parse(b"{not: [valid");
/// ```
pub fn fuzz_parse(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(documents) = yamldiff_core::parse_documents(text) else {
        return;
    };
    let result = Engine::default().compare(documents.clone(), documents);
    assert!(!result.has_differences(), "a stream differs from itself");
    let _ = result.render(&RenderConfig::default().with_verbose(true));
}

/// Compares two generated collections and checks the bucket invariants.
///
/// ```
/// yamldiff_fuzz::fuzz_compare(b"compare");
/// ```
pub fn fuzz_compare(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Ok(old) = random_collection(&mut unstructured) else {
        return;
    };
    let Ok(new) = random_collection(&mut unstructured) else {
        return;
    };

    let path = IdentifierPath::default();
    let old = KeyedSet::build(old, &path);
    let new = KeyedSet::build(new, &path);
    let result = compare(&old, &new);

    for key in old.keys().chain(new.keys()) {
        let hits = [
            result.added().contains_key(key),
            result.deleted().contains_key(key),
            result.modified().contains_key(key),
        ]
        .into_iter()
        .filter(|hit| *hit)
        .count();
        let unchanged = matches!(
            (old.get(key), new.get(key)),
            (Some(lhs), Some(rhs)) if lhs.raw() == rhs.raw()
        );
        assert_eq!(hits + usize::from(unchanged), 1, "identifier {key:?} misclassified");
    }
    assert!(!compare(&old, &old).has_differences(), "a collection differs from itself");
    assert_eq!(result, compare(&old, &new), "comparison is not deterministic");
    let _ = result.render(&RenderConfig::default());
}

fn random_collection(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<Document>> {
    let len = u.int_in_range::<u8>(0..=MAX_DOCUMENTS)?;
    let mut documents = Vec::with_capacity(usize::from(len));
    for _ in 0..len {
        let mut root = random_mapping(u, 1)?;
        if u.arbitrary()? {
            let mut metadata = Mapping::new();
            metadata.insert("name".into(), Value::from(*u.choose(&NAMES)?));
            root.insert("metadata".into(), Value::Mapping(metadata));
        }
        documents.push(Document::new(root).map_err(|_| arbitrary::Error::IncorrectFormat)?);
    }
    Ok(documents)
}

fn random_mapping(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Mapping> {
    let len = u.int_in_range::<u8>(0..=MAX_MAPPING_LEN)?;
    let mut map = Mapping::new();
    for _ in 0..len {
        let key = *u.choose(&KEYS)?;
        map.insert(key.to_string(), random_value(u, depth + 1)?);
    }
    Ok(map)
}

fn random_value(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Value> {
    let upper: u8 = if depth >= MAX_DEPTH { 3 } else { 5 };
    let choice = u.int_in_range(0..=upper)?;
    Ok(match choice {
        0 => Value::Null,
        1 => Value::Bool(u.arbitrary()?),
        2 => Value::Number(random_number(u)?),
        3 => Value::String(random_string(u)?),
        4 => {
            let len = u.int_in_range::<u8>(0..=MAX_SEQUENCE_LEN)?;
            let mut items = Vec::with_capacity(usize::from(len));
            for _ in 0..len {
                items.push(random_value(u, depth + 1)?);
            }
            Value::Sequence(items)
        }
        _ => Value::Mapping(random_mapping(u, depth)?),
    })
}

fn random_number(u: &mut Unstructured<'_>) -> arbitrary::Result<Number> {
    Ok(match u.int_in_range::<u8>(0..=2)? {
        0 => Number::Int(u.arbitrary()?),
        1 => Number::UInt(u.arbitrary()?),
        _ => Number::Float(f64::from(u.arbitrary::<i16>()?) / 8.0),
    })
}

fn random_string(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
    let len = u.int_in_range::<u8>(0..=8)?;
    (0..len).map(|_| u.int_in_range::<u8>(0x20..=0x7e).map(char::from)).collect()
}
