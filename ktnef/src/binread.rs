use std::io::{self, Read, Seek, SeekFrom, Write};


macro_rules! declare_read {
    ($func_name:ident, $or_eof_func_name:ident, $type:ty) => {
        fn $func_name(&mut self) -> Result<$type, io::Error>;
        fn $or_eof_func_name(&mut self) -> Result<Option<$type>, io::Error>;
    };
}
macro_rules! impl_read {
    ($func_name:ident, $or_eof_func_name:ident, $type:ty, $byte_count:expr, $from_bytes_func_name:ident) => {
        fn $func_name(&mut self) -> Result<$type, io::Error> {
            let mut buf = [0u8; $byte_count];
            self.read_exact(&mut buf)?;
            Ok(<$type>::$from_bytes_func_name(buf))
        }

        fn $or_eof_func_name(&mut self) -> Result<Option<$type>, io::Error> {
            let mut buf = [0u8; $byte_count];

            // the first read may hit the end
            let bytes_read = self.read(&mut buf[0..1])?;
            if bytes_read == 0 {
                return Ok(None);
            }

            // the rest must not
            if $byte_count > 1 {
                self.read_exact(&mut buf[1..$byte_count])?;
            }

            Ok(Some(<$type>::$from_bytes_func_name(buf)))
        }
    };
}
macro_rules! declare_write {
    ($func_name:ident, $type:ty) => {
        fn $func_name(&mut self, value: $type) -> Result<(), io::Error>;
    };
}
macro_rules! impl_write {
    ($func_name:ident, $type:ty, $to_bytes_func_name:ident) => {
        fn $func_name(&mut self, value: $type) -> Result<(), io::Error> {
            self.write_all(&value.$to_bytes_func_name())
        }
    };
}


/// Number of padding bytes needed to bring `length` up to a multiple of 4.
#[inline]
pub fn padding_to_4(length: usize) -> usize {
    (4 - (length % 4)) % 4
}


/// Little-endian (and the odd big-endian) reads on top of any byte source.
pub trait BinaryReader {
    declare_read!(read_u8, read_u8_or_eof, u8);
    declare_read!(read_u16_le, read_u16_le_or_eof, u16);
    declare_read!(read_u16_be, read_u16_be_or_eof, u16);
    declare_read!(read_u32_le, read_u32_le_or_eof, u32);
    declare_read!(read_u64_le, read_u64_le_or_eof, u64);
    declare_read!(read_f64_le, read_f64_le_or_eof, f64);

    /// Reads exactly `count` bytes into a fresh buffer.
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, io::Error>;

    /// Swallows the padding following a value of `bytes_read` bytes.
    fn pad_to_4(&mut self, bytes_read: usize) -> Result<(), io::Error>;
}

impl<R: Read> BinaryReader for R {
    impl_read!(read_u8, read_u8_or_eof, u8, 1, from_le_bytes);
    impl_read!(read_u16_le, read_u16_le_or_eof, u16, 2, from_le_bytes);
    impl_read!(read_u16_be, read_u16_be_or_eof, u16, 2, from_be_bytes);
    impl_read!(read_u32_le, read_u32_le_or_eof, u32, 4, from_le_bytes);
    impl_read!(read_u64_le, read_u64_le_or_eof, u64, 8, from_le_bytes);
    impl_read!(read_f64_le, read_f64_le_or_eof, f64, 8, from_le_bytes);

    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, io::Error> {
        // don't trust the declared count with a huge allocation up front
        let mut buf = Vec::with_capacity(count.min(64 * 1024));
        let obtained = Read::take(&mut *self, count as u64).read_to_end(&mut buf)?;
        if obtained != count {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, obtained {}", count, obtained),
            ));
        }
        Ok(buf)
    }

    #[inline]
    fn pad_to_4(&mut self, bytes_read: usize) -> Result<(), io::Error> {
        let pad_count = padding_to_4(bytes_read);
        if pad_count == 0 {
            return Ok(());
        }
        let mut pad_buf = [0u8; 3];
        self.read_exact(&mut pad_buf[0..pad_count])
    }
}


/// Position bookkeeping for seekable byte sources.
///
/// The parser records absolute offsets (attachment data, attribute ends) and
/// jumps back to them, so everything it reads from must be seekable.
pub trait StreamCursor: BinaryReader + Seek {
    fn tell(&mut self) -> Result<u64, io::Error> {
        self.stream_position()
    }

    fn seek_to(&mut self, offset: u64) -> Result<u64, io::Error> {
        self.seek(SeekFrom::Start(offset))
    }

    /// Moves `count` bytes forward without looking at them.
    fn skip(&mut self, count: u64) -> Result<u64, io::Error> {
        let target = self.tell()? + count;
        self.seek_to(target)
    }
}

impl<R: Read + Seek> StreamCursor for R {
}


/// The writing counterpart of [`BinaryReader`].
pub trait BinaryWriter {
    declare_write!(write_u8, u8);
    declare_write!(write_u16_le, u16);
    declare_write!(write_u32_le, u32);
    declare_write!(write_u64_le, u64);
    declare_write!(write_f64_le, f64);

    /// Writes the zero padding following a value of `bytes_written` bytes.
    fn write_padding_to_4(&mut self, bytes_written: usize) -> Result<(), io::Error>;
}

impl<W: Write> BinaryWriter for W {
    impl_write!(write_u8, u8, to_le_bytes);
    impl_write!(write_u16_le, u16, to_le_bytes);
    impl_write!(write_u32_le, u32, to_le_bytes);
    impl_write!(write_u64_le, u64, to_le_bytes);
    impl_write!(write_f64_le, f64, to_le_bytes);

    fn write_padding_to_4(&mut self, bytes_written: usize) -> Result<(), io::Error> {
        let pad_buf = [0u8; 3];
        self.write_all(&pad_buf[0..padding_to_4(bytes_written)])
    }
}
