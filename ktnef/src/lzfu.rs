//! Decompression of compressed RTF (PR_RTF_COMPRESSED, "LZFu").


use std::io::{Cursor, Read, Write};

use from_to_repr::from_to_other;
use log::{debug, warn};

use crate::binread::BinaryReader;
use crate::error::LzfuError;


pub const HEADER_LENGTH: usize = 16;

/// Bytes of the header counted by its compressed-size field.
const COUNTED_HEADER_LENGTH: u32 = 12;

const DICTIONARY_CAPACITY: usize = 4096;

const INIT_DICTIONARY: [u8; 207] = *b"{\\rtf1\\ansi\\mac\\deff0\\deftab720{\\fonttbl;}{\\f0\\fnil \\froman \\fswiss \\fmodern \\fscript \\fdecor MS Sans SerifSymbolArialTimes New RomanCourier{\\colortbl\\red0\\green0\\blue0\r\n\\par \\pard\\plain\\f0\\fs20\\b\\i\\u\\tab\\tx";


#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u32, derive_compare = "as_int")]
pub enum CompressionType {
    /// "LZFu"
    Compressed = 0x75465A4C,
    /// "MELA"
    Uncompressed = 0x414C454D,
    Other(u32),
}


#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LzfuHeader {
    /// Length of everything after this field.
    pub compressed_size: u32,
    pub raw_size: u32,
    pub compression_type: CompressionType,
    /// Not verified.
    pub crc: u32,
}
impl LzfuHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, LzfuError> {
        let mut buf = [0u8; HEADER_LENGTH];
        let mut obtained = 0;
        while obtained < HEADER_LENGTH {
            let count = reader.read(&mut buf[obtained..])?;
            if count == 0 {
                return Err(LzfuError::HeaderTooShort { expected: HEADER_LENGTH, obtained });
            }
            obtained += count;
        }

        let mut cursor = Cursor::new(&buf[..]);
        let compressed_size = cursor.read_u32_le()?;
        let raw_size = cursor.read_u32_le()?;
        let compression_type = CompressionType::from_base_type(cursor.read_u32_le()?);
        let crc = cursor.read_u32_le()?;
        Ok(Self { compressed_size, raw_size, compression_type, crc })
    }

    /// Length of the payload following the 16-byte header.
    pub fn body_length(&self) -> Result<u32, LzfuError> {
        self.compressed_size.checked_sub(COUNTED_HEADER_LENGTH)
            .ok_or(LzfuError::InvalidCompressedSize { declared: self.compressed_size })
    }
}


#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
struct CompressedRtfDict {
    data: Box<[u8]>,
    write_pos: usize,
    read_pos: usize,
    /// How many bytes have been written so far, preamble included.
    filled: usize,
}
impl CompressedRtfDict {
    fn read_from_read_pos(&mut self) -> u8 {
        let b = self.data[self.read_pos];
        self.read_pos = (self.read_pos + 1) % DICTIONARY_CAPACITY;
        b
    }

    fn write_at_write_pos(&mut self, value: u8) {
        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % DICTIONARY_CAPACITY;
        if self.filled < DICTIONARY_CAPACITY {
            self.filled += 1;
        }
    }

    pub fn literal_read(&mut self, value: u8) {
        self.write_at_write_pos(value);
    }

    pub fn is_decompression_complete(&self, offset: u16) -> bool {
        usize::from(offset) == self.write_pos
    }

    /// Copies `length + 2` bytes from `offset` to the output and back into the
    /// dictionary. Fails on reading a slot that has never been written.
    pub fn reference_read(&mut self, offset: u16, length: u16, output: &mut Vec<u8>) -> Result<(), LzfuError> {
        let actual_length = usize::from(length) + 2;

        self.read_pos = usize::from(offset);
        for _ in 0..actual_length {
            if self.filled < DICTIONARY_CAPACITY && self.read_pos >= self.filled {
                return Err(LzfuError::InvalidReference { offset });
            }
            let b = self.read_from_read_pos();
            output.push(b);
            self.write_at_write_pos(b);
        }
        Ok(())
    }

    pub fn new() -> Self {
        let data_vec = vec![0u8; DICTIONARY_CAPACITY];
        let mut data = data_vec.into_boxed_slice();
        data[0..INIT_DICTIONARY.len()].copy_from_slice(&INIT_DICTIONARY);

        Self {
            data,
            write_pos: INIT_DICTIONARY.len(),
            read_pos: 0,
            filled: INIT_DICTIONARY.len(),
        }
    }
}


/// Whether `data` starts with a header of either compression type.
pub fn is_compressed_rtf(data: &[u8]) -> bool {
    if data.len() < HEADER_LENGTH {
        return false;
    }
    let magic = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
    !matches!(CompressionType::from_base_type(magic), CompressionType::Other(_))
}

/// Decompresses a complete compressed-RTF block, header included.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, LzfuError> {
    let mut cursor = Cursor::new(compressed);
    let header = LzfuHeader::read(&mut cursor)?;
    let available = &compressed[HEADER_LENGTH..];
    decompress_body(&header, available)
}

/// Decompresses the block read from `reader` into `writer`, returning the
/// number of bytes written.
pub fn decompress_to<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<usize, LzfuError> {
    let header = LzfuHeader::read(reader)?;
    let body_length = match header.compression_type {
        CompressionType::Uncompressed => header.raw_size,
        _ => header.body_length()?,
    };
    let mut body = Vec::new();
    Read::take(&mut *reader, u64::from(body_length)).read_to_end(&mut body)?;

    let decompressed = decompress_body(&header, &body)?;
    writer.write_all(&decompressed)?;
    Ok(decompressed.len())
}

fn decompress_body(header: &LzfuHeader, available: &[u8]) -> Result<Vec<u8>, LzfuError> {
    debug!(
        "compressed RTF: compressed_size={} raw_size={} type={:?} crc=0x{:08X}",
        header.compressed_size, header.raw_size, header.compression_type, header.crc,
    );
    let raw_size: usize = header.raw_size.try_into().unwrap_or(usize::MAX);

    match header.compression_type {
        CompressionType::Uncompressed => {
            if available.len() < raw_size {
                return Err(LzfuError::SizeMismatch { declared: header.raw_size, produced: available.len() });
            }
            Ok(available[..raw_size].to_vec())
        },
        CompressionType::Compressed => {
            let body_length: usize = header.body_length()?
                .try_into()
                .unwrap_or(usize::MAX);
            if available.len() < body_length {
                warn!("compressed RTF declares {} bytes but only {} are present", body_length, available.len());
            }
            let body = &available[..body_length.min(available.len())];
            let ret = decompress_lzfu(body, header.raw_size)?;
            if ret.len() != raw_size {
                return Err(LzfuError::SizeMismatch { declared: header.raw_size, produced: ret.len() });
            }
            Ok(ret)
        },
        CompressionType::Other(magic) => Err(LzfuError::UnsupportedCompression { magic }),
    }
}

fn decompress_lzfu(body: &[u8], raw_size: u32) -> Result<Vec<u8>, LzfuError> {
    let raw_size_usize: usize = raw_size.try_into().unwrap_or(usize::MAX);
    let body_len = body.len() as u64;
    let mut cursor = Cursor::new(body);
    let mut dict = CompressedRtfDict::new();
    let mut ret = Vec::with_capacity(raw_size_usize.min(16 * 1024 * 1024));

    'blocks: while let Some(control) = cursor.read_u8_or_eof()? {
        for bit_index in 0..8 {
            if cursor.position() >= body_len {
                break 'blocks;
            }

            if control & (1 << bit_index) == 0 {
                let literal = cursor.read_u8()?;
                ret.push(literal);
                dict.literal_read(literal);
            } else {
                let dict_ref = cursor.read_u16_be()?; // yes, big endian
                let length = dict_ref & 0b1111;
                let offset = (dict_ref >> 4) & 0b1111_1111_1111;

                if dict.is_decompression_complete(offset) {
                    debug!("end of compressed RTF after {} bytes", ret.len());
                    break 'blocks;
                }
                dict.reference_read(offset, length, &mut ret)?;
            }

            if ret.len() > raw_size_usize {
                return Err(LzfuError::SizeMismatch { declared: raw_size, produced: ret.len() });
            }
        }
    }
    Ok(ret)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn block(compression_type: u32, raw_size: u32, body: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(body.len() as u32 + 12).to_le_bytes());
        data.extend_from_slice(&raw_size.to_le_bytes());
        data.extend_from_slice(&compression_type.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    const LZFU: u32 = 0x75465A4C;
    const MELA: u32 = 0x414C454D;

    #[test]
    fn test_reference_vector() {
        let data = [
            0x2d, 0x00, 0x00, 0x00, 0x2b, 0x00, 0x00, 0x00, 0x4c, 0x5a, 0x46, 0x75, 0xf1, 0xc5, 0xc7, 0xa7,
            0x03, 0x00, 0x0a, 0x00, 0x72, 0x63, 0x70, 0x67, 0x31, 0x32, 0x35, 0x42, 0x32, 0x0a, 0xf3, 0x20,
            0x68, 0x65, 0x6c, 0x09, 0x00, 0x20, 0x62, 0x77, 0x05, 0xb0, 0x6c, 0x64, 0x7d, 0x0a, 0x80, 0x0f,
            0xa0,
        ];
        assert!(is_compressed_rtf(&data));
        let rtf = decompress(&data).unwrap();
        assert_eq!(rtf, b"{\\rtf1\\ansi\\ansicpg1252\\pard hello world}\r\n");
    }

    #[test]
    fn test_uncompressed() {
        let data = block(MELA, 5, b"{\\rtf}");
        assert_eq!(decompress(&data).unwrap(), b"{\\rtf");

        let short = block(MELA, 10, b"{\\rtf}");
        assert!(matches!(decompress(&short), Err(LzfuError::SizeMismatch { declared: 10, produced: 6 })));
    }

    #[test]
    fn test_literals_only() {
        let data = block(LZFU, 3, &[0x00, b'a', b'b', b'c']);
        assert_eq!(decompress(&data).unwrap(), b"abc");
    }

    #[test]
    fn test_reference_and_end_marker() {
        // "{\rtf1" from the preamble, then the end marker at write position 213
        let data = block(LZFU, 6, &[0x03, 0x00, 0x04, 0x0D, 0x50, 0xAA, 0xBB]);
        assert_eq!(decompress(&data).unwrap(), b"{\\rtf1");
    }

    #[test]
    fn test_unwritten_reference() {
        let data = block(LZFU, 4, &[0x01, 0x12, 0xC0]);
        assert!(matches!(decompress(&data), Err(LzfuError::InvalidReference { offset: 300 })));
    }

    #[test]
    fn test_size_mismatch() {
        let data = block(LZFU, 5, &[0x00, b'a', b'b', b'c']);
        assert!(matches!(decompress(&data), Err(LzfuError::SizeMismatch { declared: 5, produced: 3 })));

        let data = block(LZFU, 2, &[0x00, b'a', b'b', b'c']);
        assert!(matches!(decompress(&data), Err(LzfuError::SizeMismatch { declared: 2, produced: 3 })));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(decompress(b"LZFu"), Err(LzfuError::HeaderTooShort { expected: 16, obtained: 4 })));
        assert!(!is_compressed_rtf(b"LZFu"));

        let data = block(0x12345678, 0, &[]);
        assert!(!is_compressed_rtf(&data));
        assert!(matches!(decompress(&data), Err(LzfuError::UnsupportedCompression { magic: 0x12345678 })));

        let mut undersized = block(LZFU, 0, &[]);
        undersized[0] = 4;
        assert!(matches!(decompress(&undersized), Err(LzfuError::InvalidCompressedSize { declared: 4 })));
    }

    #[test]
    fn test_decompress_to() {
        let data = block(LZFU, 3, &[0x00, b'x', b'y', b'z']);
        let mut reader = Cursor::new(data);
        let mut out = Vec::new();
        assert_eq!(decompress_to(&mut reader, &mut out).unwrap(), 3);
        assert_eq!(out, b"xyz");
    }
}
