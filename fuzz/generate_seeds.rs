//! Generate seed corpus for fuzzing

use embedpack::{pack, pack_with, CompressionMethod, FileEntry};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let corpus_dir = "fuzz/corpus/fuzz_unpack";
    fs::create_dir_all(corpus_dir)?;

    println!("Generating seed corpus...");

    // Seed 1: Empty archive (no files)
    {
        let path = format!("{}/seed_empty.pack", corpus_dir);
        fs::write(&path, pack(&mut [], 19)?)?;
        println!("Generated: {}", path);
    }

    // Seed 2: Single small file
    {
        let path = format!("{}/seed_single_small.pack", corpus_dir);
        let mut files = vec![FileEntry::new("test.txt", b"Hello, World!".to_vec())];
        fs::write(&path, pack(&mut files, 19)?)?;
        println!("Generated: {}", path);
    }

    // Seed 3: Multiple files, one per codec
    for method in [
        CompressionMethod::None,
        CompressionMethod::Lz4,
        CompressionMethod::Zstd,
    ] {
        let path = format!("{}/seed_multi_{}.pack", corpus_dir, method);
        let mut files = vec![
            FileEntry::new("file1.txt", b"First file".to_vec()),
            FileEntry::new("file2.txt", b"Second file".to_vec()),
            FileEntry::new("dir/file3.txt", b"Third file in directory".to_vec()),
        ];
        fs::write(&path, pack_with(&mut files, &method, 3)?)?;
        println!("Generated: {}", path);
    }

    // Seed 4: Larger compressible file
    {
        let path = format!("{}/seed_large.pack", corpus_dir);
        let mut files = vec![FileEntry::new("large.txt", b"Lorem ipsum ".repeat(1000))];
        fs::write(&path, pack(&mut files, 6)?)?;
        println!("Generated: {}", path);
    }

    println!("Seed corpus complete");
    Ok(())
}
