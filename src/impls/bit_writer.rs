/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`BitWrite`] for a [`ByteWrite`].
///
/// The writer accumulates bits in a one-byte cache and hands each byte to
/// the sink as soon as it is complete. The last partial byte is written,
/// padded with zeros, only by [`align`](BitWrite::align) or
/// [`close`](BitWrite::close): there is no [`Drop`] implementation, so a
/// writer that is not closed loses the bits in its cache.
///
/// When the cache is empty the stream is at a byte boundary, and
/// [`write_byte`](BitWrite::write_byte) and
/// [`write_bytes`](BitWrite::write_bytes) delegate directly to the sink.
///
/// A writer owns its sink exclusively and is not meant to be shared between
/// threads; to keep ownership of the sink, pass a mutable reference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BitWriter<W> {
    /// The sink to which we write bytes.
    backend: W,
    /// The bits not written yet, in the highest `bits_in_cache` positions;
    /// the other bits are zero.
    cache: u8,
    /// The number of bits in `cache`, always less than 8.
    bits_in_cache: usize,
    /// Whether the writer was closed and nothing was written since.
    closed: bool,
}

impl<W> BitWriter<W> {
    /// Create a new [`BitWriter`] writing to `backend`.
    #[must_use]
    pub fn new(backend: W) -> Self {
        Self {
            backend,
            cache: 0,
            bits_in_cache: 0,
            closed: false,
        }
    }

    /// Return the sink.
    ///
    /// Bits still in the cache are lost: call [`close`](BitWrite::close)
    /// first.
    pub fn into_inner(self) -> W {
        self.backend
    }

    pub fn get_ref(&self) -> &W {
        &self.backend
    }

    /// Return the number of bits accepted but not yet handed to the sink.
    #[inline(always)]
    #[must_use]
    pub fn bits_in_cache(&self) -> usize {
        self.bits_in_cache
    }

    /// Return whether the stream is at a byte boundary.
    #[inline(always)]
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.bits_in_cache == 0
    }
}

impl<W: ByteWrite> BitWriter<W> {
    #[inline(always)]
    fn emit(&mut self, byte: u8) -> Result<(), StreamError<W::Error>> {
        self.backend.write_byte(byte).map_err(StreamError::Sink)
    }

    /// Write 8 bits when the cache is not empty.
    ///
    /// The number of bits in the cache does not change.
    #[inline]
    fn write_unaligned_byte(&mut self, byte: u8) -> Result<(), StreamError<W::Error>> {
        let bits = self.bits_in_cache;
        self.emit(self.cache | (byte >> bits))?;
        self.cache = (byte & ((1 << bits) - 1)) << (8 - bits);
        Ok(())
    }
}

impl<W: ByteWrite> BitWrite for BitWriter<W> {
    type Error = StreamError<W::Error>;

    #[inline]
    fn write_bits_unchecked(&mut self, value: u64, n: usize) -> Result<usize, Self::Error> {
        debug_assert!(n <= 64, "Cannot write {} > 64 bits", n);
        #[cfg(feature = "checks")]
        assert!(
            value & !mask(n) == 0,
            "Value {} does not fit in {} bits",
            value,
            n
        );

        if n == 0 {
            return Ok(0);
        }
        self.closed = false;

        let new_bits = self.bits_in_cache + n;
        if new_bits < 8 {
            // Everything fits in the cache
            self.cache |= (value as u8) << (8 - new_bits);
            self.bits_in_cache = new_bits;
            return Ok(n);
        }

        if new_bits == 8 {
            self.emit(self.cache | value as u8)?;
            self.cache = 0;
            self.bits_in_cache = 0;
            return Ok(n);
        }

        // Complete the cache with the highest bits of value
        let mut left = n - (8 - self.bits_in_cache);
        self.emit(self.cache | (value >> left) as u8)?;
        self.cache = 0;
        self.bits_in_cache = 0;

        while left >= 8 {
            left -= 8;
            // The cast drops the bits above the current byte
            self.emit((value >> left) as u8)?;
        }

        if left > 0 {
            self.cache = (value as u8 & ((1 << left) - 1)) << (8 - left);
            self.bits_in_cache = left;
        }
        Ok(n)
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.closed = false;
        if self.bits_in_cache == 0 {
            return self.emit(byte);
        }
        self.write_unaligned_byte(byte)
    }

    #[inline]
    fn write_bool(&mut self, bit: bool) -> Result<(), Self::Error> {
        self.closed = false;
        if self.bits_in_cache == 7 {
            self.emit(self.cache | bit as u8)?;
            self.cache = 0;
            self.bits_in_cache = 0;
            return Ok(());
        }

        self.bits_in_cache += 1;
        if bit {
            self.cache |= 1 << (8 - self.bits_in_cache);
        }
        Ok(())
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, ShortTransfer<Self::Error>> {
        self.closed = false;
        if self.bits_in_cache == 0 {
            self.backend
                .write_bytes(buf)
                .map_err(|e| e.map_err(StreamError::Sink))?;
            return Ok(buf.len());
        }

        for (i, &byte) in buf.iter().enumerate() {
            self.write_unaligned_byte(byte)
                .map_err(|e| ShortTransfer::new(i, e))?;
        }
        Ok(buf.len())
    }

    #[inline(always)]
    fn bits_in_cache(&self) -> usize {
        self.bits_in_cache
    }

    fn align(&mut self) -> Result<usize, Self::Error> {
        let mut padding = 0;
        if self.bits_in_cache > 0 {
            self.backend
                .write_byte(self.cache)
                .map_err(StreamError::Flush)?;
            padding = 8 - self.bits_in_cache;
            self.cache = 0;
            self.bits_in_cache = 0;
        }
        self.backend.flush().map_err(StreamError::Flush)?;
        Ok(padding)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if self.closed {
            return Ok(());
        }
        self.align()?;
        self.closed = true;
        Ok(())
    }
}

/// The byte-level view of the stream.
///
/// A failure after some bytes have been written is reported as a short
/// write. [`flush`](std::io::Write::flush) flushes the sink, but does not
/// write the bits in the cache: use [`align`](BitWrite::align) for that.
#[cfg(feature = "std")]
impl<W: ByteWrite> std::io::Write for BitWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.write_bytes(buf) {
            Ok(n) => Ok(n),
            Err(ShortTransfer { bytes, .. }) if bytes > 0 => Ok(bytes),
            Err(ShortTransfer { error, .. }) => Err(std::io::Error::other(error)),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.backend.flush().map_err(std::io::Error::other)
    }
}
