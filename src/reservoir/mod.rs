// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Uniform sampling reservoir for estimating quantiles of a stream.
//!
//! The reservoir keeps a uniformly random sample of at most `max_size` values out of all
//! values it has been updated with (Algorithm R), and keeps that sample sorted so that
//! quantiles can be read without sorting. As long as the number of values seen does not
//! exceed `max_size`, quantiles are exact; afterwards they are estimates.
//!
//! The state of a reservoir is fully described by a [`ReservoirSnapshot`], which a
//! streaming engine can checkpoint and use later to rebuild an equivalent reservoir.
//!
//! # Usage
//!
//! ```rust
//! # use uniform_reservoir::reservoir::UniformReservoir;
//! let mut reservoir = UniformReservoir::new(100).unwrap();
//! for value in [1.0, 2.0, 3.0, 4.0] {
//!     reservoir.update(value);
//! }
//! assert_eq!(reservoir.quartiles(), [1.25, 2.5, 3.75]);
//!
//! let snapshot = reservoir.to_snapshot();
//! let restored = UniformReservoir::from_snapshot(&snapshot).unwrap();
//! assert_eq!(restored, reservoir);
//! ```

mod quantile;
mod serialization;
mod sketch;
mod snapshot;
mod sorted_array;

pub use self::quantile::interpolated_quantile;
pub use self::sketch::UniformReservoir;
pub use self::snapshot::ReservoirSnapshot;
pub use self::snapshot::ReservoirSummary;

/// Default maximum number of retained samples.
pub const DEFAULT_MAX_SIZE: usize = 999;
/// Largest supported maximum size; the snapshot carries it as a 32-bit signed integer.
pub const MAX_SIZE_LIMIT: usize = i32::MAX as usize;
/// Fractions of the 25th, 50th and 75th percentiles reported by
/// [`UniformReservoir::quartiles`].
pub const QUARTILE_FRACTIONS: [f64; 3] = [0.25, 0.5, 0.75];
