/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Fuzzing harnesses, available with the `fuzz` feature.

Each submodule provides a `FuzzCase`, which can be generated with
[`arbitrary`], and a `harness` function checking it. The targets in the
`fuzz` directory feed cases generated by `cargo fuzz` to the harnesses; with
the `serde` feature cases can also be stored as JSON and replayed by tests.

*/

pub mod round_trip;
