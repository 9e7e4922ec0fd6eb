// Property-based round-trips through the encoder and the streaming decoder.
//
// Sizes and depth are kept small to keep CI fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use msgpack_codec::{
    decode, decode_with, is_valid_utf8, pack, pack_with, unpack, CodecProfile, DecodeLimits,
    FloatWidth, IntWidth, Value,
};

fn arb_float() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("NaN never compares equal", |f| !f.is_nan())
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        arb_float().prop_map(Value::Float),
        ".{0,40}".prop_map(Value::text),
        proptest::collection::vec(any::<u8>(), 0..40).prop_map(Value::Bytes),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
            proptest::collection::vec((inner.clone(), inner), 0..20).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn roundtrip_default_profile(v in arb_value()) {
        let bytes = pack(&v).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), v);
    }

    #[test]
    fn roundtrip_narrow_profile(xs in proptest::collection::vec(any::<i16>(), 0..32), f in any::<f32>()) {
        prop_assume!(!f.is_nan());
        let profile = CodecProfile::new(IntWidth::W16, FloatWidth::F32);
        let mut items: Vec<Value> = xs.into_iter().map(Value::from).collect();
        items.push(Value::from(f));
        let v = Value::Array(items);
        let bytes = pack_with(&v, profile).unwrap();
        prop_assert_eq!(decode_with(&bytes, profile, DecodeLimits::UNBOUNDED).unwrap(), v);
    }

    #[test]
    fn byte_strings_pick_str_or_bin(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let encoded = pack(&Value::Bytes(bytes.clone())).unwrap();
        let is_str = matches!(encoded[0], 0xa0..=0xbf | 0xd9);
        prop_assert_eq!(is_str, is_valid_utf8(&bytes));
        prop_assert_eq!(decode(&encoded).unwrap(), Value::Bytes(bytes));
    }

    #[test]
    fn stream_yields_one_call_per_value(values in proptest::collection::vec(arb_value(), 0..8)) {
        let mut buf = Vec::new();
        for v in &values {
            buf.extend(pack(v).unwrap());
        }
        let mut seen = Vec::new();
        let out = unpack(&buf, Some(|v: Value| {
            seen.push(v);
            Ok::<(), ()>(())
        }))
        .unwrap();
        prop_assert_eq!(out.values, values.len());
        prop_assert_eq!(out.consumed, buf.len());
        prop_assert_eq!(seen, values);
    }

    #[test]
    fn truncated_tail_is_silent(v in arb_value(), cut in any::<prop::sample::Index>()) {
        let head = pack(&Value::Bool(true)).unwrap();
        let tail = pack(&v).unwrap();
        let keep = cut.index(tail.len());
        let mut buf = head.clone();
        buf.extend_from_slice(&tail[..keep]);

        let mut calls = 0usize;
        let out = unpack(&buf, Some(|_: Value| {
            calls += 1;
            Ok::<(), ()>(())
        }))
        .unwrap();
        prop_assert_eq!(calls, 1);
        prop_assert_eq!(out.consumed, head.len());
    }

    #[test]
    fn arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = unpack(&bytes, Some(|_: Value| Ok::<(), ()>(())));
    }
}
