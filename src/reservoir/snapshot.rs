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

use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

use super::UniformReservoir;
use crate::error::Error;

/// Persistable state of a [`UniformReservoir`].
///
/// This is the record exchanged with a state checkpoint mechanism. It carries no
/// version or timestamp; the serialized field names are `count`, `maxSize` and `samples`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirSnapshot {
    /// Number of values the reservoir represents.
    pub count: u64,
    /// Maximum number of retained samples, strictly positive.
    pub max_size: i32,
    /// Retained samples, in any order. Restoring fails if absent.
    #[serde(default)]
    pub samples: Option<Vec<f64>>,
}

/// Read-only view of a reservoir for periodic reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirSummary {
    pub count: u64,
    pub max_size: usize,
    /// 25th, 50th and 75th percentiles, NaN when empty.
    pub quartiles: [f64; 3],
    pub samples: Vec<f64>,
}

impl UniformReservoir {
    /// Captures the state of this reservoir.
    pub fn to_snapshot(&self) -> ReservoirSnapshot {
        ReservoirSnapshot {
            count: self.count(),
            max_size: self.max_size() as i32,
            samples: Some(self.samples().to_vec()),
        }
    }

    /// Rebuilds a reservoir from a snapshot.
    ///
    /// See [`UniformReservoir::from_snapshot_with_rng`].
    pub fn from_snapshot(snapshot: &ReservoirSnapshot) -> Result<Self, Error> {
        Self::from_snapshot_with_rng(snapshot, &mut rand::rng())
    }

    /// Rebuilds a reservoir from a snapshot.
    ///
    /// The snapshot samples go through the same path as
    /// [`UniformReservoir::from_samples_with_rng`], with the snapshot count as the number of
    /// values represented. The result has the same count and the same sorted samples as the
    /// reservoir the snapshot was taken from; `rng` is only used for snapshots holding more
    /// samples than `max_size`.
    ///
    /// Fails with [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if the
    /// samples are absent, `max_size` is not positive, or the snapshot is otherwise
    /// rejected by [`UniformReservoir::from_samples_with_rng`].
    pub fn from_snapshot_with_rng<R: Rng + ?Sized>(
        snapshot: &ReservoirSnapshot,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut reservoir = Self::default();
        reservoir.restore_with_rng(snapshot, rng)?;
        Ok(reservoir)
    }

    /// Replaces the state of this reservoir with the one of `snapshot`.
    ///
    /// On error the reservoir is left unchanged.
    pub fn restore(&mut self, snapshot: &ReservoirSnapshot) -> Result<(), Error> {
        self.restore_with_rng(snapshot, &mut rand::rng())
    }

    /// Replaces the state of this reservoir with the one of `snapshot`, using `rng` if the
    /// snapshot samples need to be subsampled.
    ///
    /// On error the reservoir is left unchanged.
    pub fn restore_with_rng<R: Rng + ?Sized>(
        &mut self,
        snapshot: &ReservoirSnapshot,
        rng: &mut R,
    ) -> Result<(), Error> {
        let samples = snapshot
            .samples
            .as_deref()
            .ok_or_else(|| Error::invalid_argument("snapshot samples may not be absent"))?;
        let max_size = usize::try_from(snapshot.max_size).map_err(|_| {
            Error::invalid_argument("max_size must be strictly positive")
                .with_context("max_size", snapshot.max_size)
        })?;

        tracing::debug!(
            count = snapshot.count,
            max_size,
            num_samples = samples.len(),
            "restoring reservoir from snapshot"
        );
        self.initialize(samples, snapshot.count, max_size, rng)
    }

    /// Returns the count, maximum size, quartiles and samples of this reservoir.
    pub fn summary(&self) -> ReservoirSummary {
        ReservoirSummary {
            count: self.count(),
            max_size: self.max_size(),
            quartiles: self.quartiles(),
            samples: self.samples().to_vec(),
        }
    }
}
