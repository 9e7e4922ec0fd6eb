use msgpack_codec::{
    pack, pack_with, CodecProfile, Encoder, ErrorCode, ErrorKind, FloatWidth, IntWidth, Value,
};

const W16: CodecProfile = CodecProfile::new(IntWidth::W16, FloatWidth::F64);
const W32: CodecProfile = CodecProfile::new(IntWidth::W32, FloatWidth::F64);
const F32: CodecProfile = CodecProfile::new(IntWidth::W64, FloatWidth::F32);

#[test]
fn text_is_fixstr() {
    assert_eq!(
        pack(&Value::text("hallo")).unwrap(),
        vec![0xa5, b'h', b'a', b'l', b'l', b'o']
    );
    assert_eq!(pack(&Value::text("")).unwrap(), vec![0xa0]);
}

#[test]
fn invalid_utf8_is_bin() {
    assert_eq!(
        pack(&Value::bytes(vec![0xff, 0xfe])).unwrap(),
        vec![0xc4, 0x02, 0xff, 0xfe]
    );
    // Lone surrogate encoded as UTF-8 is not text.
    assert_eq!(
        pack(&Value::bytes(vec![0xed, 0xa0, 0x80])).unwrap(),
        vec![0xc4, 0x03, 0xed, 0xa0, 0x80]
    );
}

#[test]
fn scalars() {
    assert_eq!(pack(&Value::Nil).unwrap(), vec![0xc0]);
    assert_eq!(pack(&Value::Bool(false)).unwrap(), vec![0xc2]);
    assert_eq!(pack(&Value::Bool(true)).unwrap(), vec![0xc3]);
}

#[test]
fn integers_use_the_profile_width_whatever_the_magnitude() {
    assert_eq!(
        pack(&Value::Int(1)).unwrap(),
        vec![0xd3, 0, 0, 0, 0, 0, 0, 0, 1]
    );
    assert_eq!(pack_with(&Value::Int(1), W16).unwrap(), vec![0xd1, 0x00, 0x01]);
    assert_eq!(
        pack_with(&Value::Int(-1), W32).unwrap(),
        vec![0xd2, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn floats_use_the_profile_precision() {
    assert_eq!(
        pack(&Value::Float(1.5)).unwrap(),
        vec![0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        pack_with(&Value::Float(1.5), F32).unwrap(),
        vec![0xca, 0x3f, 0xc0, 0x00, 0x00]
    );
}

#[test]
fn empty_containers() {
    assert_eq!(pack(&Value::Array(vec![])).unwrap(), vec![0x90]);
    assert_eq!(pack(&Value::Map(vec![])).unwrap(), vec![0x80]);
}

#[test]
fn map_entries_keep_insertion_order() {
    let v = Value::map(vec![
        (Value::text("b"), Value::Nil),
        (Value::text("a"), Value::Bool(true)),
    ]);
    assert_eq!(
        pack(&v).unwrap(),
        vec![0x82, 0xa1, b'b', 0xc0, 0xa1, b'a', 0xc3]
    );
}

#[test]
fn sixteen_items_need_array16() {
    let v = Value::Array(vec![Value::Nil; 16]);
    let bytes = pack(&v).unwrap();
    assert_eq!(&bytes[..3], &[0xdc, 0x00, 0x10]);
    assert_eq!(bytes.len(), 3 + 16);
}

#[test]
fn thirty_two_byte_text_needs_str8() {
    let text = "x".repeat(32);
    let bytes = pack(&Value::text(text)).unwrap();
    assert_eq!(&bytes[..2], &[0xd9, 0x20]);
}

#[test]
fn out_of_range_integer_is_range_error() {
    let err = pack_with(&Value::Int(i64::from(i16::MAX) + 1), W16).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntegerOutOfRange);
    assert_eq!(err.kind(), ErrorKind::Range);

    let nested = Value::Array(vec![Value::Int(0), Value::Int(i64::from(i32::MIN) - 1)]);
    let err = pack_with(&nested, W32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(err.offset, 6);
}

#[test]
fn incremental_encoder_matches_tree_encoding() {
    let mut enc = Encoder::new();
    enc.map_header(1).unwrap();
    enc.bytes(b"k").unwrap();
    enc.array_header(2).unwrap();
    enc.int(3).unwrap();
    enc.nil().unwrap();

    let tree = Value::map(vec![(
        Value::text("k"),
        Value::Array(vec![Value::Int(3), Value::Nil]),
    )]);
    assert_eq!(enc.as_bytes(), pack(&tree).unwrap().as_slice());
    assert!(!enc.is_empty());
}

#[test]
fn value_to_msgpack_uses_the_default_profile() {
    let v = Value::Array(vec![Value::Int(-2), Value::Float(0.5)]);
    assert_eq!(v.to_msgpack().unwrap(), pack(&v).unwrap());
    assert_eq!(v.to_msgpack_with(W16).unwrap(), pack_with(&v, W16).unwrap());
}
