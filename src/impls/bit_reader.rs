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

/// An implementation of [`BitRead`] for a [`ByteRead`].
///
/// The reader keeps the bits of the last byte read from the source that have
/// not been returned yet in a one-byte cache. Reads that fit in the cache do
/// not touch the source; the others consume the cache and then fetch bytes
/// one at a time.
///
/// When the cache is empty the stream is at a byte boundary, and
/// [`read_byte`](BitRead::read_byte) and [`read_bytes`](BitRead::read_bytes)
/// delegate directly to the source.
///
/// A reader owns its source exclusively and is not meant to be shared
/// between threads; to keep ownership of the source, pass a mutable
/// reference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BitReader<R> {
    /// The source from which we read bytes.
    backend: R,
    /// The unread bits of the last byte read, in the lowest
    /// `bits_in_cache` positions; the other bits are zero.
    cache: u8,
    /// The number of unread bits in `cache`, always less than 8.
    bits_in_cache: usize,
}

impl<R> BitReader<R> {
    /// Create a new [`BitReader`] reading from `backend`.
    #[must_use]
    pub fn new(backend: R) -> Self {
        Self {
            backend,
            cache: 0,
            bits_in_cache: 0,
        }
    }

    /// Return the source, discarding the bits in the cache.
    pub fn into_inner(self) -> R {
        self.backend
    }

    pub fn get_ref(&self) -> &R {
        &self.backend
    }

    /// Return the number of bits read from the source but not yet returned.
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

impl<R: ByteRead> BitReader<R> {
    #[inline(always)]
    fn next_byte(&mut self) -> Result<u8, StreamError<R::Error>> {
        match self.backend.read_byte() {
            Ok(Some(byte)) => Ok(byte),
            Ok(None) => Err(StreamError::EndOfData),
            Err(e) => Err(StreamError::Source(e)),
        }
    }

    /// Read the next 8 bits when the cache is not empty.
    ///
    /// The number of bits in the cache does not change.
    #[inline]
    fn read_unaligned_byte(&mut self) -> Result<u8, StreamError<R::Error>> {
        let bits = self.bits_in_cache;
        let next = self.next_byte()?;
        let byte = (self.cache << (8 - bits)) | (next >> bits);
        self.cache = next & ((1 << bits) - 1);
        Ok(byte)
    }
}

impl<R: ByteRead> BitRead for BitReader<R> {
    type Error = StreamError<R::Error>;

    #[inline]
    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error> {
        debug_assert!(n <= 64, "Cannot read {} > 64 bits", n);

        if n < self.bits_in_cache {
            // The cache has more bits than needed
            let shift = self.bits_in_cache - n;
            let value = self.cache >> shift;
            self.cache &= (1 << shift) - 1;
            self.bits_in_cache = shift;
            return Ok(value as u64);
        }

        if n == self.bits_in_cache {
            let value = self.cache;
            self.cache = 0;
            self.bits_in_cache = 0;
            return Ok(value as u64);
        }

        // The whole cache is needed, and more bytes too. The cache is
        // updated only at the end, so a failure leaves it untouched.
        let mut value = self.cache as u64;
        let mut needed = n - self.bits_in_cache;
        while needed >= 8 {
            value = (value << 8) | self.next_byte()? as u64;
            needed -= 8;
        }

        if needed > 0 {
            let byte = self.next_byte()?;
            let shift = 8 - needed;
            value = (value << needed) | (byte >> shift) as u64;
            self.cache = byte & ((1 << shift) - 1);
            self.bits_in_cache = shift;
        } else {
            self.cache = 0;
            self.bits_in_cache = 0;
        }
        Ok(value)
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        if self.bits_in_cache == 0 {
            return self.next_byte();
        }
        self.read_unaligned_byte()
    }

    #[inline]
    fn read_bool(&mut self) -> Result<bool, Self::Error> {
        if self.bits_in_cache == 0 {
            let byte = self.next_byte()?;
            self.cache = byte & 0x7f;
            self.bits_in_cache = 7;
            return Ok((byte & 0x80) != 0);
        }

        self.bits_in_cache -= 1;
        let bit = (self.cache & (1 << self.bits_in_cache)) != 0;
        self.cache &= (1 << self.bits_in_cache) - 1;
        Ok(bit)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ShortTransfer<Self::Error>> {
        if self.bits_in_cache == 0 {
            return match self.backend.read_bytes(buf) {
                Ok(0) if !buf.is_empty() => Err(ShortTransfer::new(0, StreamError::EndOfData)),
                Ok(n) => Ok(n),
                Err(e) => Err(ShortTransfer::new(0, StreamError::Source(e))),
            };
        }

        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self
                .read_unaligned_byte()
                .map_err(|e| ShortTransfer::new(i, e))?;
        }
        Ok(buf.len())
    }

    #[inline]
    fn align(&mut self) -> usize {
        let skipped = self.bits_in_cache;
        self.cache = 0;
        self.bits_in_cache = 0;
        skipped
    }
}

/// The byte-level view of the stream.
///
/// A failure after some bytes have been read is reported as a short read;
/// end of data is reported as a read of zero bytes.
#[cfg(feature = "std")]
impl<R: ByteRead> std::io::Read for BitReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.read_bytes(buf) {
            Ok(n) => Ok(n),
            Err(ShortTransfer { bytes, .. }) if bytes > 0 => Ok(bytes),
            Err(ShortTransfer {
                error: StreamError::EndOfData,
                ..
            }) => Ok(0),
            Err(ShortTransfer { error, .. }) => Err(std::io::Error::other(error)),
        }
    }
}
