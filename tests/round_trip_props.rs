//! Property-based tests for the round-trip and idempotence laws.

#![allow(clippy::expect_used, clippy::float_cmp)]

use std::collections::BTreeMap;

use jsonseam::api::{
    EngineConfig, EngineKind, ErrorKind, JsonSerializer, JsonSerializerExt, serializer,
};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u64,
    label: String,
    score: i32,
    ratio: Option<f64>,
    flags: Vec<bool>,
    attrs: BTreeMap<String, i64>,
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        ".*",
        any::<i32>(),
        proptest::option::of((-4_000_000i32..4_000_000).prop_map(|n| f64::from(n) / 4.0)),
        prop::collection::vec(any::<bool>(), 0..8),
        prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..6),
    )
        .prop_map(|(id, label, score, ratio, flags, attrs)| Record {
            id,
            label,
            score,
            ratio,
            flags,
            attrs,
        })
}

/// 128-bit fields; only the serde engine reads integers beyond 64 bits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Wide {
    total: u128,
    delta: i128,
    parts: Vec<u128>,
}

fn arb_wide() -> impl Strategy<Value = Wide> {
    let edge_u128 = prop_oneof![Just(u128::MAX), Just(u128::from(u64::MAX) + 1), any::<u128>()];
    let edge_i128 = prop_oneof![Just(i128::MIN), Just(i128::from(i64::MIN) - 1), any::<i128>()];
    (
        edge_u128.clone(),
        edge_i128,
        prop::collection::vec(edge_u128, 0..4),
    )
        .prop_map(|(total, delta, parts)| Wide {
            total,
            delta,
            parts,
        })
}

/// Documents without floats, so structural equality is exact for every engine.
fn arb_document() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_config() -> impl Strategy<Value = EngineConfig> {
    (prop_oneof![Just(EngineKind::Serde), Just(EngineKind::Simd)], any::<bool>()).prop_map(
        |(kind, pretty)| EngineConfig::new().with_kind(kind).with_pretty(pretty),
    )
}

proptest! {
    #[test]
    fn records_round_trip(record in arb_record(), config in arb_config()) {
        let serializer = serializer(config);
        let text = serializer.encode(&record).expect("encode");
        let decoded: Record = serializer.decode_as(&text).expect("decode");
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn wide_integers_round_trip(wide in arb_wide(), pretty in any::<bool>()) {
        let serializer = serializer(EngineConfig::new().with_pretty(pretty));
        let text = serializer.encode(&wide).expect("encode");
        let decoded: Wide = serializer.decode_as(&text).expect("decode");
        prop_assert_eq!(decoded, wide);
    }

    #[test]
    fn repeated_fields_never_decode(
        record in arb_record(),
        label in "[ -~]{0,12}",
        config in arb_config(),
    ) {
        let serializer = serializer(config);
        let text = serializer.encode(&record).expect("encode");
        let extra = serde_json::to_string(&label).expect("label");
        // Re-open the object and append a second `label` member.
        let open = text.trim_end().strip_suffix('}').expect("object");
        let repeated = format!("{open},\"label\":{extra}}}");
        let err = serializer.decode_as::<Record>(&repeated).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn documents_round_trip(document in arb_document(), config in arb_config()) {
        let serializer = serializer(config);
        let text = serializer.encode(&document).expect("encode");
        let decoded: Value = serializer.decode_as(&text).expect("decode");
        prop_assert_eq!(decoded, document);
    }

    #[test]
    fn encoding_twice_is_identical(record in arb_record(), config in arb_config()) {
        let serializer = serializer(config);
        let first = serializer.encode(&record).expect("first");
        let second = serializer.encode(&record).expect("second");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn strings_never_decode_as_records(text in "[ -~]{0,24}") {
        let serializer = serializer(EngineConfig::new());
        let encoded = serializer.encode(&text).expect("encode");
        let err = serializer.decode_as::<Record>(&encoded).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn truncated_objects_are_malformed(record in arb_record()) {
        let serializer = serializer(EngineConfig::new());
        let text = serializer.encode(&record).expect("encode");
        let truncated = &text[..text.len() - 1];
        let err = serializer.decode_as::<Value>(truncated).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Decoding);
    }
}
