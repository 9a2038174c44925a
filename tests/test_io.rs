/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bitio::prelude::*;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};

/// A writer whose data reaches `flushed` only when flushed.
#[derive(Default)]
struct Staging {
    staged: Vec<u8>,
    flushed: Vec<u8>,
}

impl Write for Staging {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.staged.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushed.append(&mut self.staged);
        Ok(())
    }
}

#[test]
fn test_file_round_trip() -> Result<(), Box<dyn Error>> {
    let path = std::env::temp_dir().join(format!("bitio-test-{}.bin", std::process::id()));

    let mut writer = BitWriter::new(ByteAdapter::buffered_writer(File::create(&path)?));
    for i in 0..1000_u64 {
        writer.write_bits(i, (i % 17) as usize + 1)?;
        writer.write_bool(i % 3 == 0)?;
    }
    writer.close()?;
    drop(writer);

    let mut reader = BitReader::new(ByteAdapter::buffered_reader(File::open(&path)?));
    for i in 0..1000_u64 {
        let n = (i % 17) as usize + 1;
        assert_eq!(reader.read_bits(n)?, i & ((1 << n) - 1));
        assert_eq!(reader.read_bool()?, i % 3 == 0);
    }
    reader.align();
    assert!(matches!(reader.read_byte(), Err(StreamError::EndOfData)));

    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_close_flushes() -> Result<(), Box<dyn Error>> {
    let mut writer = BitWriter::new(ByteAdapter::buffered_writer(Staging::default()));
    writer.write_bits(0x5, 3)?;
    writer.write_byte(0xff)?;
    writer.close()?;
    let staging = writer
        .into_inner()
        .into_inner()
        .into_inner()
        .map_err(|e| e.into_error())?;
    assert!(staging.staged.is_empty());
    assert_eq!(staging.flushed, [0xbf, 0xe0]);
    Ok(())
}

#[test]
fn test_io_write() -> Result<(), Box<dyn Error>> {
    let mut writer = BitWriter::new(MemByteWriterVec::new(Vec::new()));
    writer.write_bits(0x1, 1)?;
    // the byte-level view keeps the bit offset
    writer.write_all(&[0x02, 0x04])?;
    write!(writer, "A")?;
    Write::flush(&mut writer)?;
    assert_eq!(writer.bits_in_cache(), 1);
    writer.close()?;
    assert_eq!(writer.into_inner().into_inner(), [0x81, 0x02, 0x20, 0x80]);
    Ok(())
}

#[test]
fn test_io_write_short() {
    let mut bytes = [0_u8; 2];
    let mut writer = BitWriter::new(MemByteWriter::new(&mut bytes));
    writer.write_bool(true).unwrap();
    assert_eq!(writer.write(&[0x01, 0x02, 0x03]).unwrap(), 2);
    assert!(writer.write(&[0x04]).is_err());
    assert_eq!(bytes, [0x80, 0x81]);
}

#[test]
fn test_io_read() -> Result<(), Box<dyn Error>> {
    let mut reader = BitReader::new(BufReader::new(&[0xf0_u8, 0x0f, 0xaa][..]));
    assert_eq!(reader.read_bits(4)?, 0xf);
    let mut buf = [0; 4];
    // a short read, as the stream has only two bytes left after the offset
    assert_eq!(Read::read(&mut reader, &mut buf)?, 2);
    assert_eq!(buf[..2], [0x00, 0xfa]);
    assert_eq!(Read::read(&mut reader, &mut buf)?, 0);
    assert_eq!(reader.read_bits(4)?, 0xa);

    let mut reader = BitReader::new(MemByteReader::new([0x12_u8, 0x34]));
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    assert_eq!(text, "\u{12}4");
    Ok(())
}

#[test]
fn test_lend_endpoint() -> Result<(), Box<dyn Error>> {
    let mut sink = MemByteWriterVec::new(Vec::new());
    {
        let mut writer = BitWriter::new(&mut sink);
        writer.write_bits(0xabc, 12)?;
        writer.close()?;
    }
    {
        let mut writer = BitWriter::new(&mut sink);
        writer.write_bits(0xd, 4)?;
        writer.close()?;
    }
    let bytes = sink.into_inner();
    assert_eq!(bytes, [0xab, 0xc0, 0xd0]);

    let mut source = MemByteReader::new(&bytes);
    {
        let mut reader = BitReader::new(&mut source);
        assert_eq!(reader.read_bits(12)?, 0xabc);
    }
    assert_eq!(source.byte_pos(), 2);
    Ok(())
}
