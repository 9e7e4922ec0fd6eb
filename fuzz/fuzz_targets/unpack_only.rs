#![no_main]

use libfuzzer_sys::fuzz_target;

use msgpack_codec::{DecodeLimits, StreamDecoder, Value};

fuzz_target!(|data: &[u8]| {
    let mut limits = DecodeLimits::for_bytes(data.len());
    limits.max_depth = 64;
    let _ = StreamDecoder::new()
        .with_limits(limits)
        .unpack(data, Some(|_: Value| Ok::<(), ()>(())));
});
