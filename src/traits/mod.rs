/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits for byte endpoints and bit streams.

[`ByteRead`] and [`ByteWrite`] describe the sources and sinks bit streams
are built upon; [`BitRead`] and [`BitWrite`] describe the bit streams
themselves.

*/

mod byte_stream;
pub use byte_stream::*;

mod bit_stream;
pub use bit_stream::*;
pub(crate) use bit_stream::mask;
