/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use crate::traits::mask;
use alloc::vec;
use alloc::vec::Vec;
use arbitrary::Arbitrary;

const DEBUG: bool = false;

macro_rules! debugln {
    ($($arg:tt)*) => {
        if DEBUG {
            #[cfg(feature = "std")]
            println!($($arg)*);
        }
    };
}

/// A script of writes, replayed as reads on the written bytes and then on
/// the first `cut` bytes only.
#[derive(Arbitrary, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzCase {
    pub commands: Vec<RandomCommand>,
    pub cut: u16,
}

#[derive(Arbitrary, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RandomCommand {
    /// Write the lowest `n % 65` bits of the value, which may have other
    /// bits set.
    Bits(u64, u8),
    /// As `Bits`, but with the value masked and written unchecked.
    UncheckedBits(u64, u8),
    Byte(u8),
    Bool(bool),
    Bytes(Vec<u8>),
    Align,
}

fn push_bits(bits: &mut Vec<bool>, value: u64, n: usize) {
    for i in (0..n).rev() {
        bits.push((value >> i) & 1 == 1);
    }
}

fn pack(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0_u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }
    bytes
}

/// Replay `commands` as reads, stopping at the first failure, and return the
/// number of commands fully replayed.
fn replay<BR: BitRead>(commands: &[RandomCommand], reader: &mut StickyBitReader<BR>) -> usize {
    for (i, command) in commands.iter().enumerate() {
        match command {
            RandomCommand::Bits(value, n) | RandomCommand::UncheckedBits(value, n) => {
                let n = (*n % 65) as usize;
                let read = reader.read_bits(n);
                if reader.is_ok() {
                    assert_eq!(read, value & mask(n), "read_bits({})", n);
                }
            }
            RandomCommand::Byte(byte) => {
                let read = reader.read_byte();
                if reader.is_ok() {
                    assert_eq!(read, *byte);
                }
            }
            RandomCommand::Bool(bit) => {
                let read = reader.read_bool();
                if reader.is_ok() {
                    assert_eq!(read, *bit);
                }
            }
            RandomCommand::Bytes(bytes) => {
                let mut buf = vec![0; bytes.len()];
                let n = reader.read_bytes(&mut buf);
                assert_eq!(buf[..n], bytes[..n]);
                if n < bytes.len() {
                    // short read at a byte boundary, or a failure
                    return i;
                }
            }
            RandomCommand::Align => {
                reader.align();
            }
        }
        if !reader.is_ok() {
            return i;
        }
    }
    commands.len()
}

pub fn harness(data: FuzzCase) {
    debugln!("{:?}", data);
    let mut bits = Vec::new();
    let mut buffer = Vec::new();

    // write, keeping the expected bits and the padding of each align
    let mut paddings = Vec::new();
    {
        let mut writer =
            CountBitWriter::<_>::new(BitWriter::new(MemByteWriterVec::new(&mut buffer)));
        for command in &data.commands {
            match command {
                RandomCommand::Bits(value, n) => {
                    let n = (*n % 65) as usize;
                    assert_eq!(writer.write_bits(*value, n).unwrap(), n);
                    push_bits(&mut bits, *value, n);
                }
                RandomCommand::UncheckedBits(value, n) => {
                    let n = (*n % 65) as usize;
                    let value = *value & mask(n);
                    assert_eq!(writer.write_bits_unchecked(value, n).unwrap(), n);
                    push_bits(&mut bits, value, n);
                }
                RandomCommand::Byte(byte) => {
                    writer.write_byte(*byte).unwrap();
                    push_bits(&mut bits, *byte as u64, 8);
                }
                RandomCommand::Bool(bit) => {
                    writer.write_bool(*bit).unwrap();
                    bits.push(*bit);
                }
                RandomCommand::Bytes(bytes) => {
                    assert_eq!(writer.write_bytes(bytes).unwrap(), bytes.len());
                    for &byte in bytes {
                        push_bits(&mut bits, byte as u64, 8);
                    }
                }
                RandomCommand::Align => {
                    let padding = (8 - bits.len() % 8) % 8;
                    assert_eq!(writer.align().unwrap(), padding);
                    assert_eq!(writer.align().unwrap(), 0);
                    bits.resize(bits.len() + padding, false);
                    paddings.push(padding);
                }
            }
            assert_eq!(writer.bits_written(), bits.len() as u64);
        }
        writer.close().unwrap();
        writer.close().unwrap();
    }
    assert_eq!(buffer, pack(&bits));

    // read back everything
    let mut reader = CountBitReader::<_>::new(BitReader::new(MemByteReader::new(&buffer)));
    let mut paddings = paddings.into_iter();
    let mut expected = 0;
    for command in &data.commands {
        match command {
            RandomCommand::Bits(value, n) | RandomCommand::UncheckedBits(value, n) => {
                let n = (*n % 65) as usize;
                assert_eq!(reader.read_bits(n).unwrap(), value & mask(n));
                expected += n;
            }
            RandomCommand::Byte(byte) => {
                assert_eq!(reader.read_byte().unwrap(), *byte);
                expected += 8;
            }
            RandomCommand::Bool(bit) => {
                assert_eq!(reader.read_bool().unwrap(), *bit);
                expected += 1;
            }
            RandomCommand::Bytes(bytes) => {
                let mut buf = vec![0; bytes.len()];
                assert_eq!(reader.read_bytes(&mut buf).unwrap(), bytes.len());
                assert_eq!(&buf, bytes);
                expected += 8 * bytes.len();
            }
            RandomCommand::Align => {
                let padding = paddings.next().unwrap();
                assert_eq!(reader.align(), padding);
                expected += padding;
            }
        }
        assert_eq!(reader.bits_read(), expected as u64);
    }
    reader.align();
    assert_eq!(reader.bits_read(), 8 * buffer.len() as u64);
    assert!(matches!(reader.read_bool(), Err(StreamError::EndOfData)));

    // read back a prefix: everything before the first failure matches
    let cut = data.cut as usize % (buffer.len() + 1);
    let mut reader = StickyBitReader::new(CountBitReader::<_>::new(BitReader::new(
        MemByteReader::new(&buffer[..cut]),
    )));
    let replayed = replay(&data.commands, &mut reader);
    let bits_read = reader.get_ref().bits_read();
    assert!(bits_read <= 8 * cut as u64);
    if let Some(error) = reader.error() {
        assert_eq!(error, &StreamError::EndOfData);
        assert!(replayed < data.commands.len());
    }
    debugln!("replayed {} commands, {} bits", replayed, bits_read);
}
