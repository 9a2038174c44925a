/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::convert::Infallible;

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`ByteRead`] for a slice.
///
/// # Example
/// ```
/// use bitio::prelude::*;
///
/// let mut byte_reader = MemByteReader::new([0x01_u8, 0x23, 0x45]);
///
/// assert_eq!(byte_reader.byte_pos(), 0);
/// assert_eq!(byte_reader.read_byte().unwrap(), Some(0x01));
/// let mut buf = [0; 4];
/// assert_eq!(byte_reader.read_bytes(&mut buf).unwrap(), 2);
/// assert_eq!(buf[..2], [0x23, 0x45]);
/// assert_eq!(byte_reader.byte_pos(), 3);
/// assert_eq!(byte_reader.read_byte().unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteReader<B> {
    data: B,
    byte_index: usize,
}

impl<B: AsRef<[u8]>> MemByteReader<B> {
    /// Create a new [`MemByteReader`] from a slice of data
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            byte_index: 0,
        }
    }

    /// Return the number of bytes read so far.
    #[must_use]
    pub fn byte_pos(&self) -> usize {
        self.byte_index
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsRef<[u8]>> ByteRead for MemByteReader<B> {
    type Error = Infallible;

    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let byte = self.data.as_ref().get(self.byte_index).copied();
        if byte.is_some() {
            self.byte_index += 1;
        }
        Ok(byte)
    }

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = &self.data.as_ref()[self.byte_index..];
        let n = buf.len().min(rest.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.byte_index += n;
        Ok(n)
    }
}
