//! Integration tests for the Serial derive macro.

use smithy_codec::{Error, Handle, Serial, SerialReader, SerialWriter, Shape, Write};
use zerocopy::{Immutable, IntoBytes, KnownLayout, TryFromBytes};

#[derive(Debug, Clone, PartialEq, Serial)]
struct SimpleStruct {
    a: u32,
    b: u64,
    c: bool,
}

#[derive(Debug, Clone, PartialEq, Serial)]
struct TupleStruct(u32, u64, bool);

#[derive(Debug, Clone, PartialEq, Serial)]
struct UnitStruct;

#[derive(Debug, Clone, PartialEq, Serial)]
struct NestedStruct {
    simple: SimpleStruct,
    value: u16,
}

#[derive(Debug, Clone, PartialEq, Serial)]
struct Borrowed<'a> {
    name: &'a str,
    bytes: &'a [u8],
    flag: &'a u8,
}

#[derive(Debug, Clone, PartialEq, Serial)]
struct Generic<T> {
    value: T,
    tail: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, TryFromBytes, Immutable, Serial)]
#[repr(u8)]
#[serial(scalar)]
enum Color {
    Red = 1,
    Green = 2,
    Blue = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, IntoBytes, TryFromBytes, Immutable, KnownLayout, Serial)]
#[repr(C)]
#[serial(scalar)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, IntoBytes, TryFromBytes, Immutable, Serial)]
#[repr(C, packed)]
#[serial(scalar)]
struct Packed {
    tag: u8,
    value: u32,
}

#[derive(Debug, Clone, PartialEq, Serial)]
struct Shapes {
    colors: Vec<Color>,
    origin: Option<Point>,
    corners: [Point; 2],
    label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_struct_derive() {
        let original = SimpleStruct {
            a: 42,
            b: 1337,
            c: true,
        };

        // u32, padding to 8, u64, bool
        assert_eq!(original.encode_size(0), 4 + 4 + 8 + 1);

        let mut writer = SerialWriter::new();
        let handle = writer.append(&original).unwrap();
        assert_eq!(handle, Handle::new(0, 17));
        assert_eq!(writer.reader().next::<SimpleStruct>(), original);
        assert_eq!(SimpleStruct::SHAPE, Shape::Struct);
    }

    #[test]
    fn test_tuple_struct_derive() {
        let original = TupleStruct(42, 1337, true);
        let mut writer = SerialWriter::new();
        let handle = writer.append(&original).unwrap();
        assert_eq!(handle, Handle::new(0, 17));
        assert_eq!(writer.reader().next::<TupleStruct>(), original);
    }

    #[test]
    fn test_unit_struct_derive() {
        let mut writer = SerialWriter::new();
        writer.append(&1u8).unwrap();
        assert_eq!(UnitStruct.encode_size(1), 0);
        assert_eq!(writer.append(&UnitStruct).unwrap(), Handle::EMPTY);
        assert_eq!(writer.len(), 1);

        let mut reader = writer.reader();
        reader.next::<u8>();
        assert_eq!(reader.next::<UnitStruct>(), UnitStruct);
    }

    #[test]
    fn test_nested_struct_derive() {
        let original = NestedStruct {
            simple: SimpleStruct {
                a: 42,
                b: 1337,
                c: true,
            },
            value: 256,
        };

        let mut writer = SerialWriter::new();
        writer.append(&1u8).unwrap();
        // Leading padding counts toward the encoded size but not toward the handle.
        assert_eq!(original.encode_size(1), 19);
        let handle = writer.append(&original).unwrap();
        assert_eq!(handle, Handle::new(4, 16));

        let mut reader = writer.reader();
        reader.next::<u8>();
        assert_eq!(reader.next::<NestedStruct>(), original);
    }

    #[test]
    fn test_borrowed_fields() {
        let flag = 9u8;
        let original = Borrowed {
            name: "hi",
            bytes: b"xyz",
            flag: &flag,
        };

        let mut writer = SerialWriter::new();
        assert_eq!(writer.append(&original).unwrap(), Handle::new(0, 10));
        let buf = writer.into_vec();

        let decoded: Borrowed = SerialReader::new(&buf).next();
        assert_eq!(decoded, original);
        // Decoded borrows point into the buffer.
        assert!(buf.as_ptr_range().contains(&decoded.name.as_ptr()));
    }

    #[test]
    fn test_generic_struct() {
        let mut writer = SerialWriter::new();
        writer
            .append(&Generic {
                value: 0xBEEFu16,
                tail: 1,
            })
            .unwrap();
        writer
            .append(&Generic {
                value: String::from("generic"),
                tail: 2,
            })
            .unwrap();

        let mut reader = writer.reader();
        assert_eq!(
            reader.next::<Generic<u16>>(),
            Generic {
                value: 0xBEEF,
                tail: 1
            }
        );
        assert_eq!(reader.next::<Generic<String>>().value, "generic");
    }

    #[test]
    fn test_scalar_derive() {
        let original = Shapes {
            colors: vec![Color::Red, Color::Blue, Color::Green],
            origin: Some(Point { x: -1, y: 1 }),
            corners: [Point { x: 0, y: 0 }, Point { x: 10, y: 20 }],
            label: String::from("box"),
        };
        let mut writer = SerialWriter::new();
        writer.append(&original).unwrap();
        writer.append(&None::<Point>).unwrap();

        let mut reader = writer.reader();
        assert_eq!(reader.next::<Shapes>(), original);
        assert_eq!(reader.next::<Option<Point>>(), None);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_packed_scalar() {
        let original = Packed {
            tag: 7,
            value: 0xDEAD_BEEF,
        };
        let mut writer = SerialWriter::new();
        writer.append(&1u8).unwrap();
        // No interior or leading padding.
        assert_eq!(writer.append(&original).unwrap(), Handle::new(1, 5));
        assert_eq!(writer.append(&[original; 2][..]).unwrap(), Handle::new(6, 12));

        let mut reader = writer.reader();
        reader.next::<u8>();
        assert_eq!(reader.next::<Packed>(), original);
        assert_eq!(reader.next::<Vec<Packed>>(), vec![original; 2]);
    }

    #[test]
    fn test_invalid_enum_image() {
        let mut writer = SerialWriter::new();
        writer.append(&[1u8, 9][..]).unwrap();
        let mut reader = writer.reader();
        assert_eq!(
            reader.try_next::<Vec<Color>>(),
            Err(Error::InvalidData("Color", "invalid image"))
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_scalar_overwrite() {
        let mut writer = SerialWriter::new();
        let handle = writer.append(&Point { x: 1, y: 2 }).unwrap();
        assert!(writer.can_overwrite(handle, &Point { x: 3, y: 4 }));
        writer.overwrite(handle, &Point { x: 3, y: 4 });
        assert_eq!(writer.reader().next::<Point>(), Point { x: 3, y: 4 });
    }

    #[test]
    fn test_struct_not_overwritable() {
        let mut writer = SerialWriter::new();
        let value = TupleStruct(1, 2, false);
        let handle = writer.append(&value).unwrap();
        assert!(!writer.can_overwrite(handle, &value));
    }
}
