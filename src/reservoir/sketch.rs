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

use std::collections::HashSet;

use rand::Rng;

use super::DEFAULT_MAX_SIZE;
use super::MAX_SIZE_LIMIT;
use super::QUARTILE_FRACTIONS;
use super::quantile::interpolated_quantile;
use super::sorted_array::SortedArray;
use crate::error::Error;

/// Uniform sampling reservoir that keeps its samples sorted.
///
/// See the [reservoir module level documentation](crate::reservoir) for more.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformReservoir {
    count: u64,
    samples: SortedArray,
}

impl Default for UniformReservoir {
    fn default() -> Self {
        Self::make(DEFAULT_MAX_SIZE)
    }
}

impl UniformReservoir {
    /// Creates an empty reservoir that retains at most `max_size` samples.
    ///
    /// Fails with [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `max_size` is zero or larger than [`MAX_SIZE_LIMIT`](super::MAX_SIZE_LIMIT).
    ///
    /// # Examples
    ///
    /// ```
    /// # use uniform_reservoir::reservoir::UniformReservoir;
    /// let reservoir = UniformReservoir::new(10).unwrap();
    /// assert_eq!(reservoir.max_size(), 10);
    /// assert!(reservoir.is_empty());
    /// assert!(UniformReservoir::new(0).is_err());
    /// ```
    pub fn new(max_size: usize) -> Result<Self, Error> {
        check_max_size(max_size)?;
        Ok(Self::make(max_size))
    }

    /// Creates a reservoir of the default size that represents exactly `values`.
    ///
    /// If there are more values than [`DEFAULT_MAX_SIZE`](super::DEFAULT_MAX_SIZE), a
    /// uniformly random subset of them is retained.
    pub fn from_values(values: &[f64]) -> Result<Self, Error> {
        Self::from_samples(values, values.len() as u64, DEFAULT_MAX_SIZE)
    }

    /// Creates a reservoir from `samples` taken out of a stream of `count` values.
    ///
    /// See [`UniformReservoir::from_samples_with_rng`].
    pub fn from_samples(samples: &[f64], count: u64, max_size: usize) -> Result<Self, Error> {
        Self::from_samples_with_rng(samples, count, max_size, &mut rand::rng())
    }

    /// Creates a reservoir from `samples` taken out of a stream of `count` values, using
    /// `rng` to choose which samples to retain when there are more than `max_size`.
    ///
    /// The retained samples are a uniformly random subset of `samples`, so each sample is
    /// retained with probability `max_size / samples.len()`.
    ///
    /// Fails with [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `max_size` is out of range, if `count` is smaller than the number of samples, or if
    /// any sample is NaN.
    pub fn from_samples_with_rng<R: Rng + ?Sized>(
        samples: &[f64],
        count: u64,
        max_size: usize,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut reservoir = Self::make(max_size);
        reservoir.initialize(samples, count, max_size, rng)?;
        Ok(reservoir)
    }

    /// Returns the maximum number of retained samples.
    pub fn max_size(&self) -> usize {
        self.samples.capacity()
    }

    /// Returns the number of values this reservoir represents, retained or not.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns true if the reservoir has not seen any data.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of retained samples.
    pub fn num_retained(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if values have been dropped, making quantiles estimates.
    pub fn is_estimation_mode(&self) -> bool {
        self.count > self.samples.len() as u64
    }

    /// Returns the retained samples in ascending order.
    pub fn samples(&self) -> &[f64] {
        self.samples.as_slice()
    }

    /// Updates the reservoir with a new value, using the thread-local generator.
    ///
    /// NaN values are ignored.
    pub fn update(&mut self, value: f64) {
        self.update_with_rng(value, &mut rand::rng());
    }

    /// Updates the reservoir with a new value.
    ///
    /// Until the reservoir is full, every value is retained. Afterwards, the value is the
    /// `count + 1`-th observation: it replaces the sample at array position `r` for `r`
    /// uniform in `[0, count]` if `r < max_size`, and is dropped otherwise, so it is
    /// retained with probability `max_size / (count + 1)`.
    ///
    /// Evicting by array position although the array is sorted by value is sound: whether
    /// a value was retained never depended on the value itself, only on draws independent
    /// of it, so the retained set is a uniform subset of the stream and any fixed position
    /// of its sorted layout holds a uniformly chosen member of that set. Picking position
    /// `r` therefore evicts a uniformly random sample, as Algorithm R requires.
    ///
    /// NaN values are ignored.
    pub fn update_with_rng<R: Rng + ?Sized>(&mut self, value: f64, rng: &mut R) {
        if value.is_nan() {
            return;
        }

        if !self.samples.is_full() {
            self.samples.insert(value);
        } else {
            let evict = rng.random_range(0..=self.count);
            if evict < self.samples.capacity() as u64 {
                self.samples.replace(evict as usize, value);
            }
        }

        self.count += 1;
    }

    /// Returns the 25th, 50th and 75th percentiles of the retained samples.
    ///
    /// All three are NaN if the reservoir is empty. If values have been dropped these
    /// are estimates.
    pub fn quartiles(&self) -> [f64; 3] {
        QUARTILE_FRACTIONS.map(|fraction| self.quantile(fraction))
    }

    /// Returns the quantile at `fraction` of the retained samples, NaN if there are none.
    ///
    /// # Panics
    ///
    /// Panics if `fraction` is not in (0.0, 1.0).
    pub fn quantile(&self, fraction: f64) -> f64 {
        interpolated_quantile(self.samples.as_slice(), fraction)
    }

    /// Returns the quantiles at each of the given fractions.
    ///
    /// # Panics
    ///
    /// Panics if any fraction is not in (0.0, 1.0).
    pub fn quantiles(&self, fractions: &[f64]) -> Vec<f64> {
        fractions
            .iter()
            .map(|&fraction| self.quantile(fraction))
            .collect()
    }

    /// Replaces the whole state, leaving it untouched on error.
    pub(super) fn initialize<R: Rng + ?Sized>(
        &mut self,
        samples: &[f64],
        count: u64,
        max_size: usize,
        rng: &mut R,
    ) -> Result<(), Error> {
        check_max_size(max_size)?;
        if count < samples.len() as u64 {
            return Err(Error::invalid_argument(
                "count must not be smaller than the number of samples",
            )
            .with_context("count", count)
            .with_context("samples", samples.len()));
        }
        if let Some(index) = samples.iter().position(|v| v.is_nan()) {
            return Err(
                Error::invalid_argument("samples must not contain NaN")
                    .with_context("index", index),
            );
        }

        let mut retained = SortedArray::new(max_size);
        retained.load(subsample(samples, max_size, rng));
        self.samples = retained;
        self.count = count;
        Ok(())
    }

    fn make(max_size: usize) -> Self {
        Self {
            count: 0,
            samples: SortedArray::new(max_size),
        }
    }
}

fn check_max_size(max_size: usize) -> Result<(), Error> {
    if max_size == 0 || max_size > MAX_SIZE_LIMIT {
        return Err(Error::invalid_argument(format!(
            "max_size must be in [1, {MAX_SIZE_LIMIT}]"
        ))
        .with_context("max_size", max_size));
    }
    Ok(())
}

/// Picks a uniformly random subset of at most `max_size` of `samples`, in no particular order.
fn subsample<R: Rng + ?Sized>(samples: &[f64], max_size: usize, rng: &mut R) -> Vec<f64> {
    let len = samples.len();
    if len <= max_size {
        return samples.to_vec();
    }

    let mut picked = Vec::with_capacity(max_size);
    if len > max_size.saturating_mul(2) {
        // Every draw hits an index not yet picked with probability above one half.
        tracing::trace!(len, max_size, "subsampling by rejection");
        let mut seen = HashSet::with_capacity(max_size);
        while picked.len() < max_size {
            let index = rng.random_range(0..len);
            if seen.insert(index) {
                picked.push(samples[index]);
            }
        }
    } else {
        // Rejection would approach a 1 / max_size hit rate for the last picks; draw from
        // the indexes that are left instead.
        tracing::trace!(len, max_size, "subsampling from remaining indexes");
        let mut remaining: Vec<usize> = (0..len).collect();
        for _ in 0..max_size {
            let index = remaining.swap_remove(rng.random_range(0..remaining.len()));
            picked.push(samples[index]);
        }
    }
    picked
}
