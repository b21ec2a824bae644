#![no_main]
use libfuzzer_sys::fuzz_target;
use zenexr::{GrowableSink, WriteAt};

// Interpret the input as a sequence of (offset, length, payload) write
// ops and check the sink against a plain model buffer after every op.
fuzz_target!(|data: &[u8]| {
    let mut sink = GrowableSink::new();
    let mut model: Vec<u8> = Vec::new();
    let mut rest = data;
    while rest.len() >= 3 {
        let offset = u16::from_le_bytes([rest[0], rest[1]]) as usize;
        let len = (rest[2] as usize).min(rest.len() - 3);
        let payload = &rest[3..3 + len];
        rest = &rest[3 + len..];

        sink.write_at(offset as u64, payload).unwrap();

        let end = offset + payload.len();
        if end > model.len() {
            model.resize(end, 0);
        }
        model[offset..end].copy_from_slice(payload);

        assert_eq!(sink.len(), model.len());
        assert_eq!(sink.as_bytes(), model.as_slice());
        assert!(sink.capacity() >= sink.len());
    }
});
