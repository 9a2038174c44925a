/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of byte endpoints and bit streams.

[`BitReader`] and [`BitWriter`] read and write bits from any
[`ByteRead`](crate::traits::ByteRead) or
[`ByteWrite`](crate::traits::ByteWrite), respectively.

If you want to read or write directly from memory, you can use
[`MemByteReader`], [`MemByteWriter`] (a fixed-size slice) and
[`MemByteWriterVec`] (a growing vector).

With the `std` feature, [`std::io::BufReader`], [`std::io::BufWriter`] and
[`std::io::Cursor`] are endpoints, as they provide a cheap single-byte path.
Any other backend implementing [`std::io::Read`] or [`std::io::Write`] can
be wrapped in a [`ByteAdapter`], possibly adding a buffer with
[`ByteAdapter::buffered_reader`] or [`ByteAdapter::buffered_writer`].

*/

mod mem_byte_reader;
pub use mem_byte_reader::*;

mod mem_byte_writer;
pub use mem_byte_writer::*;

#[cfg(feature = "std")]
mod byte_adapter;
#[cfg(feature = "std")]
pub use byte_adapter::*;

mod bit_reader;
pub use bit_reader::BitReader;

mod bit_writer;
pub use bit_writer::BitWriter;
