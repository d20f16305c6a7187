#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use smithy_codec::{Handle, RawAlign, SerialReader, SerialWriter, Terminated, Write};
use std::mem::discriminant;

#[derive(Arbitrary, Debug, Clone, PartialEq)]
enum Value {
    Bool(bool),
    Char(char),
    U8(u8),
    U16(u16),
    I32(i32),
    U64(u64),
    I128(i128),
    F64(u64),
    OptionU32(Option<u32>),
    ArrayU16([u16; 3]),
    VecU8(Vec<u8>),
    VecI64(Vec<i64>),
    VecOption(Vec<Option<u16>>),
    String(String),
    Bytes(Vec<u8>),
    Terminated(Vec<u32>),
    Tuple(u8, u64, String),
}

#[derive(Arbitrary, Debug)]
enum Op {
    Append(Value),
    Formatted(String, u32),
    Raw(Vec<u8>, u8),
    Overwrite(usize, Value),
    Drop(u16),
}

/// Appends a value, returning its handle and encoded size.
fn append(writer: &mut SerialWriter, value: &Value) -> (Handle, usize) {
    let offset = writer.len();
    let (handle, size) = match value {
        Value::Bool(v) => (writer.append(v), v.encode_size(offset)),
        Value::Char(v) => (writer.append(v), v.encode_size(offset)),
        Value::U8(v) => (writer.append(v), v.encode_size(offset)),
        Value::U16(v) => (writer.append(v), v.encode_size(offset)),
        Value::I32(v) => (writer.append(v), v.encode_size(offset)),
        Value::U64(v) => (writer.append(v), v.encode_size(offset)),
        Value::I128(v) => (writer.append(v), v.encode_size(offset)),
        Value::F64(bits) => {
            let v = f64::from_bits(*bits);
            (writer.append(&v), v.encode_size(offset))
        }
        Value::OptionU32(v) => (writer.append(v), v.encode_size(offset)),
        Value::ArrayU16(v) => (writer.append(v), v.encode_size(offset)),
        Value::VecU8(v) => (writer.append(v), v.encode_size(offset)),
        Value::VecI64(v) => (writer.append(v), v.encode_size(offset)),
        Value::VecOption(v) => (writer.append(v), v.encode_size(offset)),
        Value::String(v) => (writer.append(v), v.encode_size(offset)),
        Value::Bytes(v) => {
            let v = Bytes::copy_from_slice(v);
            (writer.append(&v), v.encode_size(offset))
        }
        Value::Terminated(v) => {
            let elems: Vec<u32> = v.iter().copied().filter(|e| *e != 0).collect();
            let v = Terminated::from_vec(elems).expect("sentinels filtered out");
            (writer.append(&v), v.encode_size(offset))
        }
        Value::Tuple(a, b, c) => {
            let v = (*a, *b, c.clone());
            (writer.append(&v), v.encode_size(offset))
        }
    };
    let handle = handle.expect("append of an in-memory value failed");
    assert_eq!(writer.len() - offset, size);
    assert!(handle.end() == writer.len());
    (handle, size)
}

/// Rewrites `handle` with `value` if the layout permits, returning whether it did.
fn overwrite(writer: &mut SerialWriter, handle: Handle, value: &Value) -> bool {
    macro_rules! attempt {
        ($v:expr) => {{
            let v = $v;
            if !writer.can_overwrite(handle, v) {
                return false;
            }
            assert_eq!(writer.overwrite(handle, v), handle);
            true
        }};
    }
    match value {
        Value::Bool(v) => attempt!(v),
        Value::U16(v) => attempt!(v),
        Value::U64(v) => attempt!(v),
        Value::VecU8(v) => attempt!(v),
        Value::VecI64(v) => attempt!(v),
        Value::String(v) => attempt!(v),
        _ => false,
    }
}

/// Decodes a value of the same kind as `expected` and compares it.
fn check(reader: &mut SerialReader<'_>, expected: &Value) {
    let decoded = match expected {
        Value::Bool(_) => Value::Bool(reader.next()),
        Value::Char(_) => Value::Char(reader.next()),
        Value::U8(_) => Value::U8(reader.next()),
        Value::U16(_) => Value::U16(reader.next()),
        Value::I32(_) => Value::I32(reader.next()),
        Value::U64(_) => Value::U64(reader.next()),
        Value::I128(_) => Value::I128(reader.next()),
        Value::F64(_) => Value::F64(reader.next::<f64>().to_bits()),
        Value::OptionU32(_) => Value::OptionU32(reader.next()),
        Value::ArrayU16(_) => Value::ArrayU16(reader.next()),
        Value::VecU8(_) => Value::VecU8(reader.next()),
        Value::VecI64(_) => Value::VecI64(reader.next()),
        Value::VecOption(_) => Value::VecOption(reader.next()),
        Value::String(_) => Value::String(reader.next()),
        Value::Bytes(_) => Value::Bytes(reader.next::<Bytes>().to_vec()),
        Value::Terminated(_) => {
            Value::Terminated(reader.next::<Terminated<u32>>().as_slice().to_vec())
        }
        Value::Tuple(..) => {
            let (a, b, c) = reader.next();
            Value::Tuple(a, b, c)
        }
    };
    let expected = match expected {
        Value::Terminated(v) => Value::Terminated(v.iter().copied().filter(|e| *e != 0).collect()),
        other => other.clone(),
    };
    assert_eq!(decoded, expected);
}

fuzz_target!(|ops: Vec<Op>| {
    let mut writer = SerialWriter::new();
    // Values still present in the buffer, in order, with their handles.
    let mut values: Vec<(Handle, Option<Value>)> = Vec::new();

    for op in ops {
        match op {
            Op::Append(value) => {
                let (handle, _) = append(&mut writer, &value);
                values.push((handle, Some(value)));
            }
            Op::Formatted(text, n) => {
                let start = writer.len();
                match writer.append_formatted(format_args!("{text}{n}")) {
                    Ok(handle) => values.push((handle, Some(Value::String(format!("{text}{n}"))))),
                    Err(_) => assert_eq!(writer.len(), start),
                }
            }
            Op::Raw(bytes, align) => {
                let align = RawAlign::To(1 << (align % 4));
                let handle = writer.append_raw(&bytes, align).unwrap();
                assert_eq!(writer.get(handle), &bytes[..]);
                // Raw bytes have no decodable shape.
                values.push((handle, None));
            }
            Op::Overwrite(index, value) => {
                if values.is_empty() {
                    continue;
                }
                let index = index % values.len();
                let (handle, existing) = &values[index];
                let handle = *handle;
                // Only rewrite with the same kind of value, so every value stays decodable.
                let same_kind = existing
                    .as_ref()
                    .is_some_and(|existing| discriminant(existing) == discriminant(&value));
                if !same_kind {
                    continue;
                }
                let before = writer.as_slice().to_vec();
                if overwrite(&mut writer, handle, &value) {
                    let after = writer.as_slice();
                    assert_eq!(after[..handle.offset], before[..handle.offset]);
                    assert_eq!(after[handle.end()..], before[handle.end()..]);
                    values[index].1 = Some(value);
                }
            }
            Op::Drop(n) => {
                // Only drop whole values, so the remaining ones stay decodable.
                let keep = values.len().saturating_sub(usize::from(n % 4));
                let end = values.get(keep).map_or(writer.len(), |(handle, _)| handle.offset);
                let n = writer.len() - end;
                writer.drop(n);
                values.truncate(keep);
            }
        }
    }

    // Raw blobs break the decode chain, so only check the values before the first one.
    let mut reader = writer.reader();
    for (_, value) in &values {
        match value {
            Some(value) => check(&mut reader, value),
            None => break,
        }
    }
});
