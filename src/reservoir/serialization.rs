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

//! Binary serialization format for uniform reservoirs.
//!
//! All fields are little-endian. The first preamble long is always present:
//!
//! | byte | field |
//! |------|-------|
//! | 0 | preamble longs (1 if empty, 3 otherwise) |
//! | 1 | serial version |
//! | 2 | family id |
//! | 3 | flags |
//! | 4..8 | max size (i32) |
//!
//! Non-empty reservoirs continue with the count (u64), the number of samples (u32), four
//! unused bytes and the samples in ascending order (f64 each).

use super::ReservoirSnapshot;
use super::UniformReservoir;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::error::Error;

/// Family ID of reservoir sketches in DataSketches format (Family.RESERVOIR).
pub const RESERVOIR_FAMILY_ID: u8 = 11;
pub const SERIAL_VERSION: u8 = 1;

pub const PREAMBLE_LONGS_EMPTY: u8 = 1;
pub const PREAMBLE_LONGS_NON_EMPTY: u8 = 3;

/// Flag indicating the reservoir has not seen any data.
pub const FLAG_EMPTY: u8 = 1 << 0;

pub const EMPTY_SIZE_BYTES: usize = 8;
pub const DATA_START: usize = 24;

impl UniformReservoir {
    /// Serializes the reservoir to bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use uniform_reservoir::reservoir::UniformReservoir;
    /// let mut reservoir = UniformReservoir::new(10).unwrap();
    /// reservoir.update(1.0);
    /// let bytes = reservoir.serialize();
    /// assert_eq!(UniformReservoir::deserialize(&bytes).unwrap(), reservoir);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let is_empty = self.is_empty();
        let size = if is_empty {
            EMPTY_SIZE_BYTES
        } else {
            DATA_START + self.num_retained() * 8
        };
        let mut bytes = SketchBytes::with_capacity(size);

        bytes.write_u8(if is_empty {
            PREAMBLE_LONGS_EMPTY
        } else {
            PREAMBLE_LONGS_NON_EMPTY
        });
        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(RESERVOIR_FAMILY_ID);
        bytes.write_u8(if is_empty { FLAG_EMPTY } else { 0 });
        bytes.write_i32_le(self.max_size() as i32);

        if is_empty {
            return bytes.into_bytes();
        }

        bytes.write_u64_le(self.count());
        bytes.write_u32_le(self.num_retained() as u32);
        bytes.write_u32_le(0);
        for &value in self.samples() {
            bytes.write_f64_le(value);
        }
        bytes.into_bytes()
    }

    /// Deserializes a reservoir from bytes.
    ///
    /// Fails with [`MalformedDeserializeData`](crate::error::ErrorKind::MalformedDeserializeData)
    /// if the bytes are truncated or not a reservoir, and with
    /// [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if the decoded state is
    /// rejected by [`UniformReservoir::from_snapshot`].
    pub fn deserialize(bytes: &[u8]) -> Result<UniformReservoir, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |err| Error::insufficient_data(tag).set_source(err)
        }

        let mut cursor = SketchSlice::new(bytes);

        let preamble_longs = cursor.read_u8().map_err(make_error("preamble_longs"))?;
        let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
        let family_id = cursor.read_u8().map_err(make_error("family_id"))?;
        let flags = cursor.read_u8().map_err(make_error("flags"))?;
        let max_size = cursor.read_i32_le().map_err(make_error("max_size"))?;

        if family_id != RESERVOIR_FAMILY_ID {
            return Err(Error::invalid_family(
                RESERVOIR_FAMILY_ID,
                family_id,
                "RESERVOIR",
            ));
        }
        if serial_version != SERIAL_VERSION {
            return Err(Error::deserial(format!(
                "invalid serial version: expected {SERIAL_VERSION}, got {serial_version}"
            )));
        }

        let is_empty = (flags & FLAG_EMPTY) != 0;
        let expected_preamble_longs = if is_empty {
            PREAMBLE_LONGS_EMPTY
        } else {
            PREAMBLE_LONGS_NON_EMPTY
        };
        if preamble_longs != expected_preamble_longs {
            return Err(Error::deserial(format!(
                "invalid preamble longs: expected {expected_preamble_longs}, got {preamble_longs}"
            )));
        }

        let snapshot = if is_empty {
            ReservoirSnapshot {
                count: 0,
                max_size,
                samples: Some(Vec::new()),
            }
        } else {
            let count = cursor.read_u64_le().map_err(make_error("count"))?;
            let num_samples = cursor.read_u32_le().map_err(make_error("num_samples"))? as usize;
            let _unused = cursor.read_u32_le().map_err(make_error("unused"))?;

            if count == 0 {
                return Err(Error::deserial("count is zero but the empty flag is not set"));
            }
            if i64::from(max_size) < num_samples as i64 {
                return Err(Error::deserial(format!(
                    "number of samples {num_samples} exceeds max size {max_size}"
                )));
            }
            if cursor.remaining() < num_samples * 8 {
                return Err(Error::insufficient_data("samples"));
            }
            let mut samples = Vec::with_capacity(num_samples);
            for _ in 0..num_samples {
                samples.push(cursor.read_f64_le().map_err(make_error("samples"))?);
            }
            ReservoirSnapshot {
                count,
                max_size,
                samples: Some(samples),
            }
        };

        tracing::debug!(
            count = snapshot.count,
            max_size,
            "deserialized reservoir snapshot"
        );
        UniformReservoir::from_snapshot(&snapshot)
    }
}
