/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// A reader that records the first error instead of returning it.
///
/// All methods return plain values. After the first failure the error is
/// kept, and every later call returns a zero value without touching the
/// wrapped reader, so a sequence of reads can be checked once at the end
/// with [`error`](StickyBitReader::error) or
/// [`into_result`](StickyBitReader::into_result).
///
/// # Example
/// ```
/// use bitio::prelude::*;
///
/// let mut reader = StickyBitReader::new(BitReader::new(MemByteReader::new([0xa5_u8])));
/// let high = reader.read_bits(4);
/// let low = reader.read_bits(4);
/// let more = reader.read_byte();
/// assert_eq!((high, low, more), (0xa, 0x5, 0));
/// assert_eq!(reader.error(), Some(&StreamError::EndOfData));
/// ```
#[derive(Debug)]
pub struct StickyBitReader<BR: BitRead> {
    bit_read: BR,
    error: Option<BR::Error>,
}

/// Run `op` unless an error was already recorded, recording its error.
#[inline(always)]
fn attempt<S, T: Default, E>(
    stream: &mut S,
    error: &mut Option<E>,
    op: impl FnOnce(&mut S) -> Result<T, E>,
) -> T {
    if error.is_some() {
        return T::default();
    }
    match op(stream) {
        Ok(value) => value,
        Err(e) => {
            *error = Some(e);
            T::default()
        }
    }
}

/// Like [`attempt`], for slice operations, returning the number of bytes
/// transferred.
#[inline(always)]
fn attempt_bytes<S, E>(
    stream: &mut S,
    error: &mut Option<E>,
    op: impl FnOnce(&mut S) -> Result<usize, ShortTransfer<E>>,
) -> usize {
    if error.is_some() {
        return 0;
    }
    match op(stream) {
        Ok(bytes) => bytes,
        Err(ShortTransfer { bytes, error: e }) => {
            *error = Some(e);
            bytes
        }
    }
}

impl<BR: BitRead> StickyBitReader<BR> {
    pub fn new(bit_read: BR) -> Self {
        Self {
            bit_read,
            error: None,
        }
    }

    /// Return the first error encountered, if any.
    #[must_use]
    pub fn error(&self) -> Option<&BR::Error> {
        self.error.as_ref()
    }

    /// Return whether no read failed so far.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn get_ref(&self) -> &BR {
        &self.bit_read
    }

    pub fn into_inner(self) -> BR {
        self.bit_read
    }

    /// Return the wrapped reader, or the first error encountered.
    pub fn into_result(self) -> Result<BR, BR::Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.bit_read),
        }
    }

    /// See [`BitRead::read_bits`]; returns zero after a failure.
    pub fn read_bits(&mut self, n: usize) -> u64 {
        attempt(&mut self.bit_read, &mut self.error, |r| r.read_bits(n))
    }

    /// See [`BitRead::read_byte`]; returns zero after a failure.
    pub fn read_byte(&mut self) -> u8 {
        attempt(&mut self.bit_read, &mut self.error, |r| r.read_byte())
    }

    /// See [`BitRead::read_bool`]; returns `false` after a failure.
    pub fn read_bool(&mut self) -> bool {
        attempt(&mut self.bit_read, &mut self.error, |r| r.read_bool())
    }

    /// See [`BitRead::read_bytes`]. Returns the number of bytes read, which
    /// is zero if an error was already recorded.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        attempt_bytes(&mut self.bit_read, &mut self.error, |r| r.read_bytes(buf))
    }

    /// See [`BitRead::align`]; returns zero after a failure.
    pub fn align(&mut self) -> usize {
        if self.error.is_some() {
            return 0;
        }
        self.bit_read.align()
    }
}

/// A writer that records the first error instead of returning it.
///
/// After the first failure every later call does nothing. Closing the writer
/// with [`close`](StickyBitWriter::close) reports the recorded error, if
/// any, so a failed write is never lost.
///
/// # Example
/// ```
/// use bitio::prelude::*;
///
/// let mut bytes = [0_u8; 1];
/// let mut writer = StickyBitWriter::new(BitWriter::new(MemByteWriter::new(&mut bytes)));
/// writer.write_bits(0x5, 3);
/// writer.write_byte(0xff);
/// writer.write_byte(0xff);
/// assert!(writer.error().is_some());
/// assert!(writer.close().is_err());
/// assert_eq!(bytes, [0xbf]);
/// ```
#[derive(Debug)]
pub struct StickyBitWriter<BW: BitWrite> {
    bit_write: BW,
    error: Option<BW::Error>,
}

impl<BW: BitWrite> StickyBitWriter<BW> {
    pub fn new(bit_write: BW) -> Self {
        Self {
            bit_write,
            error: None,
        }
    }

    /// Return the first error encountered, if any.
    #[must_use]
    pub fn error(&self) -> Option<&BW::Error> {
        self.error.as_ref()
    }

    /// Return whether no write failed so far.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn get_ref(&self) -> &BW {
        &self.bit_write
    }

    /// Return the wrapped writer without closing it.
    pub fn into_inner(self) -> BW {
        self.bit_write
    }

    /// Return the wrapped writer, or the first error encountered.
    pub fn into_result(self) -> Result<BW, BW::Error> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.bit_write),
        }
    }

    /// Close the wrapped writer and return it.
    ///
    /// If an error was recorded, the writer is not closed and the error is
    /// returned; otherwise, the result of [`BitWrite::close`] is returned.
    pub fn close(self) -> Result<BW, BW::Error> {
        let mut bit_write = self.into_result()?;
        bit_write.close()?;
        Ok(bit_write)
    }

    /// See [`BitWrite::write_bits`].
    pub fn write_bits(&mut self, value: u64, n: usize) {
        attempt(&mut self.bit_write, &mut self.error, |w| w.write_bits(value, n));
    }

    /// See [`BitWrite::write_bits_unchecked`].
    pub fn write_bits_unchecked(&mut self, value: u64, n: usize) {
        attempt(&mut self.bit_write, &mut self.error, |w| {
            w.write_bits_unchecked(value, n)
        });
    }

    /// See [`BitWrite::write_byte`].
    pub fn write_byte(&mut self, byte: u8) {
        attempt(&mut self.bit_write, &mut self.error, |w| w.write_byte(byte));
    }

    /// See [`BitWrite::write_bool`].
    pub fn write_bool(&mut self, bit: bool) {
        attempt(&mut self.bit_write, &mut self.error, |w| w.write_bool(bit));
    }

    /// See [`BitWrite::write_bytes`]. Returns the number of bytes written,
    /// which is zero if an error was already recorded.
    pub fn write_bytes(&mut self, buf: &[u8]) -> usize {
        attempt_bytes(&mut self.bit_write, &mut self.error, |w| w.write_bytes(buf))
    }

    /// See [`BitWrite::align`]; returns zero after a failure.
    pub fn align(&mut self) -> usize {
        attempt(&mut self.bit_write, &mut self.error, |w| w.align())
    }
}
