/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// Print on standard error; a no-op without the `std` feature.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "std")]
        eprintln!($($arg)*);
    };
}

/// Number of bytes transferred by a slice operation, successful or not.
#[inline(always)]
fn transferred<E>(result: &Result<usize, ShortTransfer<E>>) -> usize {
    match result {
        Ok(n) => *n,
        Err(e) => e.bytes,
    }
}

/// Wrapping struct that keeps track of written bits. Optionally,
/// prints to standard error information about methods called.
///
/// The count includes the bits of the bytes a failed
/// [`write_bytes`](BitWrite::write_bytes) managed to write and the padding
/// written by an [`align`](BitWrite::align) whose flush failed, but not the
/// padding written by [`close`](BitWrite::close).
#[derive(Debug, Clone)]
pub struct CountBitWriter<BW, const PRINT: bool = false> {
    bit_write: BW,
    bits_written: u64,
}

impl<BW: BitWrite, const PRINT: bool> CountBitWriter<BW, PRINT> {
    pub fn new(bit_write: BW) -> Self {
        Self {
            bit_write,
            bits_written: 0,
        }
    }

    /// The number of bits written so far on the underlying [`BitWrite`].
    #[inline(always)]
    #[must_use]
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    pub fn get_ref(&self) -> &BW {
        &self.bit_write
    }

    pub fn into_inner(self) -> BW {
        self.bit_write
    }
}

impl<BW: BitWrite, const PRINT: bool> BitWrite for CountBitWriter<BW, PRINT> {
    type Error = BW::Error;

    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize, Self::Error> {
        self.bit_write.write_bits(value, n).inspect(|&x| {
            self.bits_written += x as u64;
            if PRINT {
                trace!(
                    "write_bits({:#016x}, {}) = {} (total = {})",
                    value, n, x, self.bits_written
                );
            }
        })
    }

    fn write_bits_unchecked(&mut self, value: u64, n: usize) -> Result<usize, Self::Error> {
        self.bit_write.write_bits_unchecked(value, n).inspect(|&x| {
            self.bits_written += x as u64;
            if PRINT {
                trace!(
                    "write_bits_unchecked({:#016x}, {}) = {} (total = {})",
                    value, n, x, self.bits_written
                );
            }
        })
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.bit_write.write_byte(byte).inspect(|_| {
            self.bits_written += 8;
            if PRINT {
                trace!("write_byte({:#04x}) (total = {})", byte, self.bits_written);
            }
        })
    }

    fn write_bool(&mut self, bit: bool) -> Result<(), Self::Error> {
        self.bit_write.write_bool(bit).inspect(|_| {
            self.bits_written += 1;
            if PRINT {
                trace!("write_bool({}) (total = {})", bit, self.bits_written);
            }
        })
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, ShortTransfer<Self::Error>> {
        let result = self.bit_write.write_bytes(buf);
        let bytes = transferred(&result);
        self.bits_written += 8 * bytes as u64;
        if PRINT {
            trace!(
                "write_bytes([{} bytes]) = {} (total = {})",
                buf.len(),
                bytes,
                self.bits_written
            );
        }
        result
    }

    #[inline(always)]
    fn bits_in_cache(&self) -> usize {
        self.bit_write.bits_in_cache()
    }

    fn align(&mut self) -> Result<usize, Self::Error> {
        let cached = self.bit_write.bits_in_cache();
        let result = self.bit_write.align();
        let padding = match result {
            Ok(padding) => padding,
            // The padded byte was written, but the flush failed
            Err(_) if cached > 0 && self.bit_write.bits_in_cache() == 0 => 8 - cached,
            Err(_) => 0,
        };
        self.bits_written += padding as u64;
        if PRINT {
            trace!(
                "align() = {} (total = {}, ok = {})",
                padding,
                self.bits_written,
                result.is_ok()
            );
        }
        result
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if PRINT {
            trace!("close() (total = {})", self.bits_written);
        }
        self.bit_write.close()
    }
}

/// Wrapping struct that keeps track of read bits. Optionally,
/// prints to standard error information about methods called.
///
/// The count includes the bits skipped by [`align`](BitRead::align) and the
/// bits of the bytes a failed [`read_bytes`](BitRead::read_bytes) managed to
/// read.
#[derive(Debug, Clone)]
pub struct CountBitReader<BR, const PRINT: bool = false> {
    bit_read: BR,
    bits_read: u64,
}

impl<BR: BitRead, const PRINT: bool> CountBitReader<BR, PRINT> {
    pub fn new(bit_read: BR) -> Self {
        Self {
            bit_read,
            bits_read: 0,
        }
    }

    /// The number of bits read (or skipped) so far from the underlying
    /// [`BitRead`].
    #[inline(always)]
    #[must_use]
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn get_ref(&self) -> &BR {
        &self.bit_read
    }

    pub fn into_inner(self) -> BR {
        self.bit_read
    }
}

impl<BR: BitRead, const PRINT: bool> BitRead for CountBitReader<BR, PRINT> {
    type Error = BR::Error;

    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error> {
        self.bit_read.read_bits(n).inspect(|&x| {
            self.bits_read += n as u64;
            if PRINT {
                trace!("read_bits({}) = {:#016x} (total = {})", n, x, self.bits_read);
            }
        })
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.bit_read.read_byte().inspect(|&x| {
            self.bits_read += 8;
            if PRINT {
                trace!("read_byte() = {:#04x} (total = {})", x, self.bits_read);
            }
        })
    }

    fn read_bool(&mut self) -> Result<bool, Self::Error> {
        self.bit_read.read_bool().inspect(|&x| {
            self.bits_read += 1;
            if PRINT {
                trace!("read_bool() = {} (total = {})", x, self.bits_read);
            }
        })
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ShortTransfer<Self::Error>> {
        let result = self.bit_read.read_bytes(buf);
        let bytes = transferred(&result);
        self.bits_read += 8 * bytes as u64;
        if PRINT {
            trace!(
                "read_bytes([{} bytes]) = {} (total = {})",
                buf.len(),
                bytes,
                self.bits_read
            );
        }
        result
    }

    fn align(&mut self) -> usize {
        let skipped = self.bit_read.align();
        self.bits_read += skipped as u64;
        if PRINT {
            trace!("align() = {} (total = {})", skipped, self.bits_read);
        }
        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{BitReader, BitWriter, MemByteReader, MemByteWriter, MemByteWriterVec};

    #[test]
    fn test_count() -> Result<(), Box<dyn core::error::Error>> {
        let mut buffer = Vec::new();
        let bit_write = BitWriter::new(MemByteWriterVec::new(&mut buffer));
        let mut count_bit_write = CountBitWriter::<_, true>::new(bit_write);

        count_bit_write.write_bool(true)?;
        assert_eq!(count_bit_write.bits_written(), 1);
        count_bit_write.write_bits(0x1234, 20)?;
        assert_eq!(count_bit_write.bits_written(), 21);
        count_bit_write.write_byte(0x56)?;
        assert_eq!(count_bit_write.bits_written(), 29);
        count_bit_write.write_bytes(&[0x78, 0x9a])?;
        assert_eq!(count_bit_write.bits_written(), 45);
        assert_eq!(count_bit_write.align()?, 3);
        assert_eq!(count_bit_write.bits_written(), 48);
        count_bit_write.write_bits_unchecked(0x3, 2)?;
        count_bit_write.close()?;
        assert_eq!(count_bit_write.bits_written(), 50);
        drop(count_bit_write);
        assert_eq!(buffer.len(), 7);

        let bit_read = BitReader::new(MemByteReader::new(&buffer));
        let mut count_bit_read = CountBitReader::<_, true>::new(bit_read);

        assert!(count_bit_read.read_bool()?);
        assert_eq!(count_bit_read.bits_read(), 1);
        assert_eq!(count_bit_read.read_bits(20)?, 0x1234);
        assert_eq!(count_bit_read.bits_read(), 21);
        assert_eq!(count_bit_read.read_byte()?, 0x56);
        let mut buf = [0; 2];
        assert_eq!(count_bit_read.read_bytes(&mut buf)?, 2);
        assert_eq!(buf, [0x78, 0x9a]);
        assert_eq!(count_bit_read.bits_read(), 45);
        assert_eq!(count_bit_read.align(), 3);
        assert_eq!(count_bit_read.bits_read(), 48);
        assert_eq!(count_bit_read.read_bits(2)?, 0x3);
        assert_eq!(count_bit_read.bits_read(), 50);

        Ok(())
    }

    #[test]
    fn test_count_partial() {
        let mut reader = CountBitReader::<_>::new(BitReader::new(MemByteReader::new([0xc1_u8])));
        assert!(reader.read_bits(17).is_err());
        assert_eq!(reader.bits_read(), 0);

        let mut bytes = [0_u8; 1];
        let mut writer = CountBitWriter::<_>::new(BitWriter::new(MemByteWriter::new(&mut bytes)));
        writer.write_bool(true).unwrap();
        let err = writer.write_bytes(&[0x01, 0x02]).unwrap_err();
        assert_eq!(err.bytes, 1);
        assert_eq!(writer.bits_written(), 9);
        assert!(writer.close().is_err());
        assert_eq!(writer.bits_written(), 9);
    }
}
