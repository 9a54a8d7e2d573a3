use std::io;
use std::path::PathBuf;

use thiserror::Error;


/// Why a TNEF stream could not be decoded.
#[derive(Debug, Error)]
pub enum TnefError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a TNEF stream (expected signature 0x{expected:08X}, obtained 0x{obtained:08X})")]
    NotATnefFile { expected: u32, obtained: u32 },

    #[error("unknown attribute level 0x{level:02X} at offset {offset}")]
    UnknownLevel { level: u8, offset: u64 },

    #[error("unsupported MAPI type 0x{prop_type:04X} for property 0x{tag:04X}")]
    UnsupportedPropertyType { tag: u16, prop_type: u16 },

    #[error("invalid name kind 0x{obtained:08X} for named property 0x{tag:04X}")]
    InvalidNameKind { tag: u16, obtained: u32 },

    #[error("checksum mismatch for attribute 0x{tag:04X}: calculated 0x{calculated:04X}, obtained 0x{obtained:04X}")]
    ChecksumMismatch { tag: u16, obtained: u16, calculated: u16 },
}


/// Why an LZFU block could not be decompressed.
#[derive(Debug, Error)]
pub enum LzfuError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("header too short (expected {expected} bytes, obtained {obtained})")]
    HeaderTooShort { expected: usize, obtained: usize },

    #[error("unsupported compression 0x{magic:08X}")]
    UnsupportedCompression { magic: u32 },

    #[error("compressed size {declared} is smaller than the header")]
    InvalidCompressedSize { declared: u32 },

    #[error("back-reference to offset {offset} reads unwritten dictionary data")]
    InvalidReference { offset: u16 },

    #[error("decompressed to {produced} bytes but the header declares {declared}")]
    SizeMismatch { declared: u32, produced: usize },
}


/// Why an attachment could not be extracted.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("attachment has no data in the stream")]
    NoData,

    #[error("attachment has neither a file name nor a name")]
    NoFileName,

    #[error("no attachment called {0:?}")]
    NotFound(String),

    #[error("failed to publish {path:?}: {error}")]
    Persist { path: PathBuf, error: io::Error },
}
