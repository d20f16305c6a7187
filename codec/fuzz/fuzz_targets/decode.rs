#![no_main]

use libfuzzer_sys::fuzz_target;
use smithy_codec::{SerialReader, Terminated};
use std::ffi::CStr;

// Decoding arbitrary bytes must fail cleanly, never panic, and never move the cursor on failure.
fuzz_target!(|data: &[u8]| {
    let mut reader = SerialReader::new(data);
    loop {
        let start = reader.position();
        let decoded = match data.get(start).copied().unwrap_or_default() % 9 {
            0 => reader.try_next::<(u8, u32)>().map(|_| ()),
            1 => reader.try_next::<Vec<u64>>().map(|_| ()),
            2 => reader.try_next::<&str>().map(|_| ()),
            3 => reader.try_next::<Option<char>>().map(|_| ()),
            4 => reader.try_next::<Terminated<u16>>().map(|_| ()),
            5 => reader.try_next::<&CStr>().map(|_| ()),
            6 => reader.try_next::<&[u8]>().map(|_| ()),
            7 => reader.try_next::<Vec<()>>().map(|_| ()),
            _ => reader.try_next::<[bool; 3]>().map(|_| ()),
        };
        match decoded {
            Ok(()) if reader.position() > start => {}
            Ok(()) => break,
            Err(_) => {
                assert_eq!(reader.position(), start);
                break;
            }
        }
    }
});
