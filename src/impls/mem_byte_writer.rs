/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "alloc")]
use core::convert::Infallible;

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The error of a [`MemByteWriter`] that ran out of space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemByteError {
    EndOfSpace { byte_pos: usize },
}

impl core::error::Error for MemByteError {}
impl core::fmt::Display for MemByteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MemByteError::EndOfSpace { byte_pos } => {
                write!(f, "No space left at byte position {}", byte_pos)
            }
        }
    }
}

/// An implementation of [`ByteWrite`] for a mutable slice of memory.
///
/// Writing past the end of the slice fails with
/// [`MemByteError::EndOfSpace`].
///
/// # Example
/// ```
/// use bitio::prelude::*;
///
/// let mut bytes = [0_u8; 2];
///
/// let mut byte_writer = MemByteWriter::new(&mut bytes);
///
/// assert_eq!(byte_writer.byte_pos(), 0);
/// assert!(byte_writer.write_byte(0x01).is_ok());
/// assert_eq!(byte_writer.byte_pos(), 1);
///
/// // partial writes report how many bytes fit
/// let err = byte_writer.write_bytes(&[0x23, 0x45]).unwrap_err();
/// assert_eq!(err.bytes, 1);
/// assert_eq!(err.error, MemByteError::EndOfSpace { byte_pos: 2 });
/// assert_eq!(bytes, [0x01, 0x23]);
/// ```
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteWriter<B> {
    data: B,
    byte_index: usize,
}

impl<B: AsMut<[u8]>> MemByteWriter<B> {
    /// Create a new [`MemByteWriter`] writing from the start of `data`.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            byte_index: 0,
        }
    }

    /// Return the number of bytes written so far.
    #[must_use]
    pub fn byte_pos(&self) -> usize {
        self.byte_index
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsMut<[u8]>> ByteWrite for MemByteWriter<B> {
    type Error = MemByteError;

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        match self.data.as_mut().get_mut(self.byte_index) {
            Some(byte_ref) => {
                *byte_ref = byte;
                self.byte_index += 1;
                Ok(())
            }
            None => Err(MemByteError::EndOfSpace {
                byte_pos: self.byte_index,
            }),
        }
    }

    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>> {
        let rest = &mut self.data.as_mut()[self.byte_index..];
        let n = buf.len().min(rest.len());
        rest[..n].copy_from_slice(&buf[..n]);
        self.byte_index += n;
        if n < buf.len() {
            return Err(ShortTransfer::new(
                n,
                MemByteError::EndOfSpace {
                    byte_pos: self.byte_index,
                },
            ));
        }
        Ok(())
    }
}

/// An implementation of [`ByteWrite`] for a growing [`Vec<u8>`](alloc::vec::Vec).
///
/// Bytes are appended to the vector, which can be passed by value or by
/// mutable reference.
///
/// # Example
/// ```
/// use bitio::prelude::*;
///
/// let mut bytes = vec![0xff];
///
/// let mut byte_writer = MemByteWriterVec::new(&mut bytes);
/// assert!(byte_writer.write_byte(0x01).is_ok());
/// assert!(byte_writer.write_bytes(&[0x23, 0x45]).is_ok());
/// assert_eq!(bytes, [0xff, 0x01, 0x23, 0x45]);
/// ```
#[derive(Debug, PartialEq)]
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteWriterVec<B> {
    data: B,
}

#[cfg(feature = "alloc")]
impl<B: AsMut<alloc::vec::Vec<u8>>> MemByteWriterVec<B> {
    /// Create a new [`MemByteWriterVec`] appending to `data`.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

#[cfg(feature = "alloc")]
impl<B: AsMut<alloc::vec::Vec<u8>>> ByteWrite for MemByteWriterVec<B> {
    type Error = Infallible;

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.data.as_mut().push(byte);
        Ok(())
    }

    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>> {
        self.data.as_mut().extend_from_slice(buf);
        Ok(())
    }
}
