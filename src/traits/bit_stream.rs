/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;
use core::fmt::{Display, Formatter};

use crate::traits::ShortTransfer;

/// The error returned by bit streams built on a byte endpoint whose error
/// type is `E`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError<E> {
    /// The source was exhausted before the requested bits could be read.
    EndOfData,
    /// The source failed for a reason other than exhaustion.
    Source(E),
    /// The sink rejected a byte.
    Sink(E),
    /// Writing the padding byte or flushing the sink failed during an
    /// [`align`](BitWrite::align) or [`close`](BitWrite::close).
    Flush(E),
}

impl<E: Display> Display for StreamError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamError::EndOfData => write!(f, "Unexpected end of data"),
            StreamError::Source(e) => write!(f, "Error while reading from the source: {}", e),
            StreamError::Sink(e) => write!(f, "Error while writing to the sink: {}", e),
            StreamError::Flush(e) => write!(f, "Error while flushing the sink: {}", e),
        }
    }
}

impl<E: Error + 'static> Error for StreamError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::EndOfData => None,
            StreamError::Source(e) | StreamError::Sink(e) | StreamError::Flush(e) => Some(e),
        }
    }
}

/// Return a word with the lowest `n` bits set.
#[inline(always)]
#[must_use]
pub(crate) fn mask(n: usize) -> u64 {
    u64::MAX.checked_shr(64 - n as u32).unwrap_or(0)
}

/// Sequential, streaming bit-by-bit reads.
///
/// Bits are read most significant first. Implementations also provide a
/// byte-level view of the stream through [`read_byte`](BitRead::read_byte)
/// and [`read_bytes`](BitRead::read_bytes), which are fastest when the
/// stream is at a byte boundary.
///
/// A failed read does not consume any bit: the bits that were available
/// before the call can still be read. Bytes already pulled from the
/// underlying source by the failed call, however, are not given back.
pub trait BitRead {
    type Error: Error + Send + Sync + 'static;

    /// Read `n` bits and return them in the lowest bits.
    ///
    /// `n` must be at most 64; this is checked only in debug mode.
    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error>;

    /// Read the next 8 bits as a byte.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Read a single bit, returning `true` if it is one.
    fn read_bool(&mut self) -> Result<bool, Self::Error>;

    /// Fill `buf` with the next bytes of the stream and return how many were
    /// read.
    ///
    /// Short reads are possible when the stream is at a byte boundary, as
    /// the call is then passed to the source. On failure, the returned
    /// [`ShortTransfer`] tells how many bytes of `buf` were filled.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ShortTransfer<Self::Error>>;

    /// Move to the next byte boundary, discarding the bits left in the
    /// current byte, and return how many bits were discarded.
    fn align(&mut self) -> usize;
}

/// Sequential, streaming bit-by-bit writes.
///
/// Bits are written most significant first. Bits are handed to the sink one
/// byte at a time; the last partial byte reaches the sink only after a call
/// to [`align`](BitWrite::align) or [`close`](BitWrite::close).
pub trait BitWrite {
    type Error: Error + Send + Sync + 'static;

    /// Write the lowest `n` bits of `value` and return the number of bits
    /// written, that is, `n`.
    ///
    /// The other bits of `value` are ignored. `n` must be at most 64; this is
    /// checked only in debug mode.
    #[inline(always)]
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize, Self::Error> {
        self.write_bits_unchecked(value & mask(n), n)
    }

    /// Write the lowest `n` bits of `value` and return the number of bits
    /// written, that is, `n`, assuming that the other bits of `value` are
    /// zero.
    ///
    /// If `value` has bits set at positions `n` or higher the stream will
    /// contain garbage: the extra bits are or'd into the bits around the
    /// written ones. With the feature `checks`, this method panics instead.
    fn write_bits_unchecked(&mut self, value: u64, n: usize) -> Result<usize, Self::Error>;

    /// Write 8 bits.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write a single bit: one if `bit` is `true`, zero otherwise.
    fn write_bool(&mut self, bit: bool) -> Result<(), Self::Error>;

    /// Write all bytes in `buf` and return how many were written, that is,
    /// `buf.len()`.
    ///
    /// On failure, the returned [`ShortTransfer`] tells how many bytes of
    /// `buf` were written.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, ShortTransfer<Self::Error>>;

    /// Return the number of bits accepted but not yet handed to the sink.
    fn bits_in_cache(&self) -> usize;

    /// Pad the current byte with zeros, write it out, and flush the sink.
    ///
    /// Return the number of padding bits written. If writing the padded byte
    /// fails, the bits it contains are kept and a later call can retry. If
    /// only the flush fails, the padded byte has already reached the sink
    /// and [`bits_in_cache`](BitWrite::bits_in_cache) is zero.
    fn align(&mut self) -> Result<usize, Self::Error>;

    /// Write out the bits still cached, as [`align`](BitWrite::align) does.
    ///
    /// The sink itself is flushed but not closed. A second call with nothing
    /// written in between returns immediately.
    fn close(&mut self) -> Result<(), Self::Error>;
}
