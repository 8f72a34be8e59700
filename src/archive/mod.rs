mod codec;
mod entry;
mod format;
mod reader;
mod writer;

pub use codec::{CompressionMethod, EntryCodec, DEFAULT_QUALITY};
pub use entry::{FileEntry, DEFAULT_MODE};
pub use format::{
    decode_record, encode_record, file_count, COUNT_FIELD_SIZE, LENGTH_FIELD_SIZE,
    MAX_FILE_COUNT, MAX_PATH_LENGTH, PACKING_LEVEL, RECORD_FIXED_SIZE,
};
pub use reader::{unpack, unpack_with, ArchiveReader};
pub use writer::{pack, pack_into, pack_with, ArchiveWriter};
