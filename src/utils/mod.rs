/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Wrappers adding behavior to any bit stream.

[`CountBitReader`] and [`CountBitWriter`] keep track of the number
of bits read or written to a [`BitRead`](crate::traits::BitRead)
and [`BitWrite`](crate::traits::BitWrite), respectively,
optionally printing on standard error the operations performed on the stream.

[`StickyBitReader`] and [`StickyBitWriter`] record the first error and turn
every later operation into a no-op, so that a sequence of operations can be
checked once at the end.

The wrappers compose: a `StickyBitReader<CountBitReader<BitReader<_>>>`
records the first error and tells how many bits were read before it.

*/

mod count;
pub use count::*;

mod sticky;
pub use sticky::*;
