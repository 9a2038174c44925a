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
use std::io::{BufRead, BufReader, BufWriter, Cursor, ErrorKind, Read, Write};

/// An adapter from [`Read`] and [`Write`] to [`ByteRead`] and [`ByteWrite`],
/// respectively.
///
/// Instances of this struct can be created using [`ByteAdapter::new`]. They
/// turn every standard source or destination of bytes (such as
/// [`std::fs::File`], sockets, etc.) into a byte endpoint.
///
/// Single-byte operations are performed with a one-byte
/// [`read`](Read::read) or [`write`](Write::write) on the backend, which is
/// slow on unbuffered backends: [`ByteAdapter::buffered_reader`] and
/// [`ByteAdapter::buffered_writer`] add a buffer. [`BufReader`],
/// [`BufWriter`] and [`Cursor`] need no adapter, as they are endpoints
/// themselves.
///
/// [`flush`](ByteWrite::flush) flushes the backend, so aligning or closing
/// a [`BitWriter`](crate::impls::BitWriter) on a buffered adapter writes out
/// the buffer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct ByteAdapter<B> {
    backend: B,
}

impl<B> ByteAdapter<B> {
    /// Create a new ByteAdapter
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}

impl<R: Read> ByteAdapter<BufReader<R>> {
    /// Create a new ByteAdapter reading from `backend` through a
    /// [`BufReader`].
    pub fn buffered_reader(backend: R) -> Self {
        Self::new(BufReader::new(backend))
    }
}

impl<W: Write> ByteAdapter<BufWriter<W>> {
    /// Create a new ByteAdapter writing to `backend` through a
    /// [`BufWriter`].
    pub fn buffered_writer(backend: W) -> Self {
        Self::new(BufWriter::new(backend))
    }
}

fn read_retrying<R: Read + ?Sized>(backend: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    loop {
        match backend.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

fn read_buffered_byte<R: BufRead + ?Sized>(backend: &mut R) -> std::io::Result<Option<u8>> {
    let byte = loop {
        match backend.fill_buf() {
            Ok(buf) => break buf.first().copied(),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    };
    if byte.is_some() {
        backend.consume(1);
    }
    Ok(byte)
}

fn write_counting<W: Write + ?Sized>(
    backend: &mut W,
    buf: &[u8],
) -> Result<(), ShortTransfer<std::io::Error>> {
    let mut written = 0;
    while written < buf.len() {
        match backend.write(&buf[written..]) {
            Ok(0) => {
                return Err(ShortTransfer::new(
                    written,
                    std::io::Error::new(ErrorKind::WriteZero, "failed to write whole buffer"),
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(ShortTransfer::new(written, e)),
        }
    }
    Ok(())
}

impl<B: Read> ByteRead for ByteAdapter<B> {
    type Error = std::io::Error;

    #[inline]
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut byte = [0];
        Ok(match read_retrying(&mut self.backend, &mut byte)? {
            0 => None,
            _ => Some(byte[0]),
        })
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        read_retrying(&mut self.backend, buf)
    }
}

impl<B: Write> ByteWrite for ByteAdapter<B> {
    type Error = std::io::Error;

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.backend.write_all(&[byte])
    }

    #[inline(always)]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>> {
        write_counting(&mut self.backend, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.backend.flush()
    }
}

impl<R: Read> ByteRead for BufReader<R> {
    type Error = std::io::Error;

    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        read_buffered_byte(self)
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        read_retrying(self, buf)
    }
}

impl<T: AsRef<[u8]>> ByteRead for Cursor<T> {
    type Error = std::io::Error;

    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        read_buffered_byte(self)
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        read_retrying(self, buf)
    }
}

impl<W: Write> ByteWrite for BufWriter<W> {
    type Error = std::io::Error;

    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_all(&[byte])
    }

    #[inline(always)]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ShortTransfer<Self::Error>> {
        write_counting(self, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(self)
    }
}
