/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bitio::prelude::*;
use core::convert::Infallible;
use core::fmt::{Display, Formatter};

const READ_DATA: [u8; 12] = [
    3, 255, 0xcc, 0x1a, 0xbc, 0xde, 0x80, 0x01, 0x02, 0xf8, 0x08, 0xf0,
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Refused;

impl core::error::Error for Refused {}
impl Display for Refused {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Refused")
    }
}

/// A source counting the calls it receives.
struct CallCounter<R> {
    inner: R,
    calls: usize,
}

impl<R: ByteRead> ByteRead for CallCounter<R> {
    type Error = R::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        self.calls += 1;
        self.inner.read_byte()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.calls += 1;
        self.inner.read_bytes(buf)
    }
}

/// A sink refusing every byte after the first `limit`, counting the calls
/// it receives.
struct Refusing {
    written: Vec<u8>,
    limit: usize,
    calls: usize,
}

impl Refusing {
    fn new(limit: usize) -> Self {
        Self {
            written: Vec::new(),
            limit,
            calls: 0,
        }
    }
}

impl ByteWrite for Refusing {
    type Error = Refused;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.calls += 1;
        if self.written.len() == self.limit {
            return Err(Refused);
        }
        self.written.push(byte);
        Ok(())
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>> {
        self.calls += 1;
        let n = buf.len().min(self.limit - self.written.len());
        self.written.extend_from_slice(&buf[..n]);
        if n < buf.len() {
            return Err(ShortTransfer::new(n, Refused));
        }
        Ok(())
    }
}

#[test]
fn test_sticky_count_reader() {
    let mut reader = StickyBitReader::new(CountBitReader::<_>::new(BitReader::new(
        MemByteReader::new(READ_DATA),
    )));

    assert_eq!(reader.read_byte(), 3);
    assert_eq!(reader.get_ref().bits_read(), 8);
    assert_eq!(reader.read_bits(8), 255);
    assert_eq!(reader.read_bits(4), 0xc);
    assert_eq!(reader.read_bits(8), 0xc1);
    assert_eq!(reader.read_bits(20), 0xabcde);
    assert_eq!(reader.get_ref().bits_read(), 48);
    assert!(reader.read_bool());
    assert!(!reader.read_bool());
    assert_eq!(reader.align(), 6);
    assert_eq!(reader.get_ref().bits_read(), 56);

    let mut s = [0; 2];
    assert_eq!(reader.read_bytes(&mut s), 2);
    assert_eq!(s, [0x01, 0x02]);
    assert_eq!(reader.read_bits(4), 0xf);
    assert_eq!(reader.read_bytes(&mut s), 2);
    assert_eq!(s, [0x80, 0x8f]);
    assert_eq!(reader.get_ref().bits_read(), 92);
    assert!(reader.is_ok());
    assert_eq!(reader.error(), None);
}

#[test]
fn test_sticky_count_writer() -> Result<(), StreamError<Infallible>> {
    let mut writer = StickyBitWriter::new(CountBitWriter::<_>::new(BitWriter::new(
        MemByteWriterVec::new(Vec::new()),
    )));

    writer.write_byte(0xc1);
    assert_eq!(writer.get_ref().bits_written(), 8);
    writer.write_bool(false);
    writer.write_bits(0x3f, 6);
    writer.write_bool(true);
    writer.write_byte(0xac);
    writer.write_bits(0x01, 1);
    writer.write_bits(0x1248f, 20);
    assert_eq!(writer.get_ref().bits_written(), 45);
    assert_eq!(writer.align(), 3);
    assert_eq!(writer.write_bytes(&[0x01, 0x02]), 2);
    writer.write_bits(0x0f, 4);
    assert_eq!(writer.write_bytes(&[0x80, 0x8f]), 2);
    assert_eq!(writer.align(), 4);
    assert_eq!(writer.align(), 0);
    writer.write_bits(0x01, 1);
    writer.write_byte(0xff);
    assert!(writer.is_ok());
    assert_eq!(writer.align(), 7);
    writer.write_bits_unchecked(0x1234, 16);
    assert_eq!(writer.get_ref().bits_written(), 120);

    let bytes = writer.close()?.into_inner().into_inner().into_inner();
    assert_eq!(
        bytes,
        [
            0xc1, 0x7f, 0xac, 0x89, 0x24, 0x78, 0x01, 0x02, 0xf8, 0x08, 0xf0, 0xff, 0x80, 0x12,
            0x34
        ]
    );
    Ok(())
}

#[test]
fn test_sticky_reader_eof() {
    let mut reader = StickyBitReader::new(CountBitReader::<_>::new(BitReader::new(
        MemByteReader::new([0x01_u8]),
    )));
    assert_eq!(reader.read_byte(), 1);
    assert!(reader.is_ok());
    assert_eq!(reader.get_ref().bits_read(), 8);
    assert_eq!(reader.read_byte(), 0);
    assert_eq!(reader.error(), Some(&StreamError::EndOfData));
    assert!(!reader.read_bool());
    assert_eq!(reader.read_bits(1), 0);
    assert_eq!(reader.read_bytes(&mut [0; 2]), 0);
    assert_eq!(reader.error(), Some(&StreamError::EndOfData));
    assert_eq!(reader.get_ref().bits_read(), 8);

    let mut reader = StickyBitReader::new(CountBitReader::<_>::new(BitReader::new(
        MemByteReader::new([0x01_u8]),
    )));
    assert_eq!(reader.read_bits(17), 0);
    assert_eq!(reader.error(), Some(&StreamError::EndOfData));
    assert_eq!(reader.get_ref().bits_read(), 0);

    let mut reader = StickyBitReader::new(CountBitReader::<_>::new(BitReader::new(
        MemByteReader::new([0xc1_u8, 0x01]),
    )));
    assert!(reader.read_bool());
    assert_eq!(reader.read_byte(), 0x82);
    assert!(reader.is_ok());
    assert_eq!(reader.get_ref().bits_read(), 9);
    assert_eq!(reader.read_byte(), 0);
    assert_eq!(reader.error(), Some(&StreamError::EndOfData));
    assert_eq!(reader.get_ref().bits_read(), 9);
}

#[test]
fn test_sticky_short_circuit() {
    let mut reader = StickyBitReader::new(BitReader::new(CallCounter {
        inner: MemByteReader::new([0xff_u8]),
        calls: 0,
    }));
    assert_eq!(reader.read_bits(4), 0xf);
    assert_eq!(reader.read_bits(8), 0);
    assert!(!reader.is_ok());
    let calls = reader.get_ref().get_ref().calls;
    assert_eq!(reader.read_bits(4), 0);
    assert!(!reader.read_bool());
    assert_eq!(reader.read_byte(), 0);
    assert_eq!(reader.read_bytes(&mut [0; 4]), 0);
    assert_eq!(reader.align(), 0);
    let bit_reader = reader.into_inner();
    assert_eq!(bit_reader.bits_in_cache(), 4);
    assert_eq!(bit_reader.into_inner().calls, calls);
}

#[test]
fn test_sticky_writer_errors() {
    let mut writer = StickyBitWriter::new(CountBitWriter::<_>::new(BitWriter::new(
        Refusing::new(1),
    )));
    writer.write_bool(true);
    assert!(writer.is_ok());
    assert_eq!(writer.write_bytes(&[0x01, 0x02]), 1);
    assert_eq!(writer.error(), Some(&StreamError::Sink(Refused)));
    assert_eq!(writer.get_ref().bits_written(), 9);
    let calls = writer.get_ref().get_ref().get_ref().calls;
    // later calls do not reach the sink
    writer.write_bits(0xff, 8);
    writer.write_byte(0xff);
    assert_eq!(writer.write_bytes(&[0xff]), 0);
    assert_eq!(writer.align(), 0);
    assert_eq!(writer.get_ref().bits_written(), 9);
    assert_eq!(writer.get_ref().get_ref().get_ref().calls, calls);
    assert!(matches!(writer.close(), Err(StreamError::Sink(Refused))));

    let mut writer = StickyBitWriter::new(BitWriter::new(Refusing::new(0)));
    writer.write_bits(0x00, 7);
    assert!(writer.is_ok());
    writer.write_bool(false);
    assert_eq!(writer.error(), Some(&StreamError::Sink(Refused)));

    let mut writer = StickyBitWriter::new(BitWriter::new(Refusing::new(0)));
    writer.write_bool(true);
    assert_eq!(writer.align(), 0);
    assert_eq!(writer.error(), Some(&StreamError::Flush(Refused)));
    assert!(writer.into_result().is_err());
}
