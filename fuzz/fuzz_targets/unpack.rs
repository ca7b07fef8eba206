#![no_main]
use libfuzzer_sys::fuzz_target;
use intpack::{encode, Unpacker, POS_MULTI_MARKER};

fuzz_target!(|data: &[u8]| {
    let mut unpacker = Unpacker::new(data);
    let mut start = 0;
    while let Some(Ok(v)) = unpacker.next() {
        let field = &data[start..unpacker.position()];
        // Anything accepted must be exactly what the encoder produces, apart from the empty-tail
        // form of the smallest multi-byte value
        if field != [POS_MULTI_MARKER] {
            assert_eq!(field, &encode(v)[..]);
        }
        start = unpacker.position();
    }
});
