#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use msgpack_codec::{decode, pack, unpack, DecodeContext, StreamDecoder, Value};

fn sample_small() -> Vec<u8> {
    vec![0x81, 0xa1, b'a', 0x01] // {"a":1}
}

fn sample_medium() -> Value {
    let mut entries = Vec::new();
    for i in 0..64_i64 {
        entries.push((
            Value::text(format!("k{i:03}")),
            Value::Array(vec![Value::Int(i), Value::Float(0.5), Value::bytes(vec![0xff; 8])]),
        ));
    }
    Value::Map(entries)
}

fn bench_codec(c: &mut Criterion) {
    let small = sample_small();
    c.bench_function("decode_small", |b| {
        b.iter(|| {
            let v = decode(black_box(&small)).unwrap();
            black_box(v);
        })
    });

    let medium = sample_medium();
    c.bench_function("pack_medium", |b| {
        b.iter(|| {
            let bytes = pack(black_box(&medium)).unwrap();
            black_box(bytes);
        })
    });

    let encoded = pack(&medium).unwrap();
    c.bench_function("decode_medium", |b| {
        b.iter(|| {
            let v = decode(black_box(&encoded)).unwrap();
            black_box(v);
        })
    });

    let mut stream = Vec::new();
    for _ in 0..32 {
        stream.extend_from_slice(&encoded);
    }
    c.bench_function("unpack_stream_32x_medium", |b| {
        b.iter(|| {
            let out = unpack(
                black_box(&stream),
                Some(|v: Value| {
                    black_box(v);
                    Ok::<(), ()>(())
                }),
            )
            .unwrap();
            black_box(out);
        })
    });

    let dec = StreamDecoder::new();
    let mut ctx = DecodeContext::new();
    c.bench_function("unpack_in_stream_32x_medium", |b| {
        b.iter(|| {
            let out = dec
                .unpack_in(
                    &mut ctx,
                    black_box(&stream),
                    Some(|v: Value| {
                        black_box(v);
                        Ok::<(), ()>(())
                    }),
                )
                .unwrap();
            black_box(out);
        })
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
