/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;
use core::fmt::{Display, Formatter};

/// The error returned by slice transfers that stopped before the end of the
/// slice.
///
/// Bytes transferred before the error are not rolled back: `bytes` tells how
/// many of them made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortTransfer<E> {
    /// The number of bytes transferred before `error` happened.
    pub bytes: usize,
    /// The error that stopped the transfer.
    pub error: E,
}

impl<E> ShortTransfer<E> {
    pub fn new(bytes: usize, error: E) -> Self {
        Self { bytes, error }
    }

    /// Convert the inner error, keeping the byte count.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> ShortTransfer<F> {
        ShortTransfer {
            bytes: self.bytes,
            error: f(self.error),
        }
    }

    pub fn into_error(self) -> E {
        self.error
    }
}

impl<E: Display> Display for ShortTransfer<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Transfer stopped after {} bytes: {}",
            self.bytes, self.error
        )
    }
}

impl<E: Error + 'static> Error for ShortTransfer<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Sequential, streaming byte-by-byte reads.
///
/// This is the only capability bit readers need from their source. Types
/// with a cheap single-byte path (memory, buffered readers) should implement
/// it directly; other sources can be wrapped in a buffering adapter such as
/// [`ByteAdapter::buffered_reader`](crate::impls::ByteAdapter::buffered_reader).
pub trait ByteRead {
    type Error: Error + Send + Sync + 'static;

    /// Read the next byte, or return `None` at the end of the data.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Read bytes into `buf`, returning how many were read.
    ///
    /// Short reads are allowed; returning zero for a nonempty `buf` means
    /// the data ended.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Sequential, streaming byte-by-byte writes.
pub trait ByteWrite {
    type Error: Error + Send + Sync + 'static;

    /// Write a byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write all of `buf`.
    ///
    /// On failure, the returned [`ShortTransfer`] tells how many bytes of
    /// `buf` were written before the error.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>>;

    /// Flush bytes buffered by the sink, if any.
    #[inline(always)]
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: ByteRead + ?Sized> ByteRead for &mut T {
    type Error = T::Error;

    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_bytes(buf)
    }
}

impl<T: ByteWrite + ?Sized> ByteWrite for &mut T {
    type Error = T::Error;

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    #[inline(always)]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>> {
        (**self).write_bytes(buf)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}
