#![no_main]

use libfuzzer_sys::fuzz_target;

use msgpack_codec::{pack, unpack, Value};

fuzz_target!(|data: &[u8]| {
    let mut values = Vec::new();
    let Ok(out) = unpack(
        data,
        Some(|v: Value| {
            values.push(v);
            Ok::<(), ()>(())
        }),
    ) else {
        return;
    };
    assert!(out.consumed <= data.len());
    assert_eq!(out.values, values.len());

    // Every decoded value re-encodes and decodes to itself (NaN aside).
    for v in values {
        let bytes = pack(&v).expect("re-encode");
        let mut again = Vec::new();
        unpack(
            &bytes,
            Some(|w: Value| {
                again.push(w);
                Ok::<(), ()>(())
            }),
        )
        .expect("re-decode");
        assert_eq!(again.len(), 1);
        if !contains_nan(&v) {
            assert_eq!(again[0], v);
        }
    }
});

fn contains_nan(v: &Value) -> bool {
    match v {
        Value::Float(f) => f.is_nan(),
        Value::Array(items) => items.iter().any(contains_nan),
        Value::Map(entries) => entries.iter().any(|(k, v)| contains_nan(k) || contains_nan(v)),
        _ => false,
    }
}
