#![no_main]

use embedpack::{unpack_with, ArchiveReader, CompressionMethod};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Unpacking must never panic, whatever the codec
    for method in [
        CompressionMethod::None,
        CompressionMethod::Lz4,
        CompressionMethod::Zstd,
    ] {
        let store = match unpack_with(data, &method) {
            Ok(store) => store,
            Err(_) => continue, // Expected for invalid data
        };

        // Every listed path must resolve
        for path in store.paths() {
            assert!(store.contains(path));
            let _ = store.read_file(path);
        }

        // Strict decoding must not panic either
        let _ = ArchiveReader::with_codec(method).strict(true).read(data);
    }
});
