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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uniform_reservoir::error::ErrorKind;
use uniform_reservoir::reservoir::ReservoirSnapshot;
use uniform_reservoir::reservoir::UniformReservoir;

fn reservoir_with(max_size: usize, n: u64, seed: u64) -> UniformReservoir {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reservoir = UniformReservoir::new(max_size).unwrap();
    for i in 0..n {
        reservoir.update_with_rng(((i * 7919) % 1000) as f64, &mut rng);
    }
    reservoir
}

#[test]
fn test_snapshot_roundtrip_without_eviction() {
    let reservoir = reservoir_with(100, 50, 1);
    let snapshot = reservoir.to_snapshot();
    assert_eq!(snapshot.samples.as_ref().map(Vec::len), Some(50));

    let restored = UniformReservoir::from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, reservoir);
    assert_eq!(restored.quartiles(), reservoir.quartiles());
}

#[test]
fn test_snapshot_roundtrip_with_eviction() {
    let reservoir = reservoir_with(10, 1000, 2);
    assert!(reservoir.is_estimation_mode());

    let restored = UniformReservoir::from_snapshot(&reservoir.to_snapshot()).unwrap();
    assert_eq!(restored.count(), 1000);
    assert_eq!(restored.max_size(), 10);
    assert_eq!(restored.samples(), reservoir.samples());
    assert_eq!(restored.quartiles(), reservoir.quartiles());
}

#[test]
fn test_restored_reservoir_keeps_sampling() {
    let mut rng = StdRng::seed_from_u64(3);
    let reservoir = reservoir_with(10, 1000, 3);
    let mut restored =
        UniformReservoir::from_snapshot_with_rng(&reservoir.to_snapshot(), &mut rng).unwrap();
    for i in 0..100 {
        restored.update_with_rng(i as f64, &mut rng);
    }
    assert_eq!(restored.count(), 1100);
    assert_eq!(restored.num_retained(), 10);
    assert!(restored.samples().windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_snapshot_with_unsorted_samples() {
    let snapshot = ReservoirSnapshot {
        count: 3,
        max_size: 5,
        samples: Some(vec![3.0, 1.0, 2.0]),
    };
    let reservoir = UniformReservoir::from_snapshot(&snapshot).unwrap();
    assert_eq!(reservoir.samples(), &[1.0, 2.0, 3.0]);
    assert_eq!(reservoir.to_snapshot().samples, Some(vec![1.0, 2.0, 3.0]));
}

#[test]
fn test_snapshot_with_too_many_samples_is_subsampled() {
    let snapshot = ReservoirSnapshot {
        count: 40,
        max_size: 4,
        samples: Some((0..20).map(|i| i as f64).collect()),
    };
    let reservoir = UniformReservoir::from_snapshot(&snapshot).unwrap();
    assert_eq!(reservoir.count(), 40);
    assert_eq!(reservoir.num_retained(), 4);
}

#[test]
fn test_snapshot_json_roundtrip() {
    let reservoir = reservoir_with(20, 15, 4);
    let json = serde_json::to_string(&reservoir.to_snapshot()).unwrap();
    assert_that!(json.as_str(), contains_substring("\"maxSize\":20"));
    assert_that!(json.as_str(), contains_substring("\"count\":15"));

    let snapshot: ReservoirSnapshot = serde_json::from_str(&json).unwrap();
    let restored = UniformReservoir::from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, reservoir);
}

#[test]
fn test_snapshot_json_without_samples() {
    let snapshot: ReservoirSnapshot =
        serde_json::from_str(r#"{"count":3,"maxSize":10}"#).unwrap();
    assert_eq!(snapshot.samples, None);

    let err = UniformReservoir::from_snapshot(&snapshot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_that!(err.message(), contains_substring("absent"));
}

#[test]
fn test_summary_json() {
    let reservoir = UniformReservoir::from_values(&[4.0, 2.0, 3.0, 1.0]).unwrap();
    let json = serde_json::to_value(reservoir.summary()).unwrap();
    assert_eq!(json["count"], 4);
    assert_eq!(json["maxSize"], 999);
    assert_eq!(json["quartiles"], serde_json::json!([1.25, 2.5, 3.75]));
    assert_eq!(json["samples"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
}

#[test]
fn test_serialize_empty() {
    let reservoir = UniformReservoir::new(10).unwrap();
    let bytes = reservoir.serialize();
    assert_eq!(bytes.len(), 8);

    let deserialized = UniformReservoir::deserialize(&bytes).unwrap();
    assert!(deserialized.is_empty());
    assert_eq!(deserialized.max_size(), 10);
    assert_eq!(deserialized, reservoir);
}

#[test]
fn test_serialize_single_value() {
    let mut reservoir = UniformReservoir::default();
    reservoir.update(123.0);

    let bytes = reservoir.serialize();
    assert_eq!(bytes.len(), 32);

    let deserialized = UniformReservoir::deserialize(&bytes).unwrap();
    assert_eq!(deserialized.count(), 1);
    assert_eq!(deserialized.max_size(), 999);
    assert_eq!(deserialized.quartiles(), [123.0; 3]);
}

#[test]
fn test_serialize_many_values() {
    let reservoir = reservoir_with(100, 10_000, 5);
    let bytes = reservoir.serialize();
    assert_eq!(bytes.len(), 24 + 100 * 8);

    let deserialized = UniformReservoir::deserialize(&bytes).unwrap();
    assert_eq!(deserialized, reservoir);
    assert_eq!(deserialized.serialize(), bytes);
}

#[test]
fn test_deserialize_truncated() {
    let bytes = reservoir_with(10, 20, 6).serialize();
    for len in [0, 3, 7, 12, 20, bytes.len() - 1] {
        let err = UniformReservoir::deserialize(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData, "len {len}");
        assert_that!(err.message(), contains_substring("insufficient data"));
    }
}

#[test]
fn test_deserialize_wrong_family() {
    let mut bytes = reservoir_with(10, 20, 7).serialize();
    bytes[2] = 15;
    let err = UniformReservoir::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("invalid family id"));
}

#[test]
fn test_deserialize_wrong_serial_version() {
    let mut bytes = reservoir_with(10, 20, 8).serialize();
    bytes[1] = 9;
    let err = UniformReservoir::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}

#[test]
fn test_deserialize_more_samples_than_max_size() {
    let mut bytes = reservoir_with(10, 20, 9).serialize();
    bytes[4..8].copy_from_slice(&5i32.to_le_bytes());
    let err = UniformReservoir::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}

#[test]
fn test_deserialize_invalid_max_size() {
    let mut bytes = UniformReservoir::new(10).unwrap().serialize();
    bytes[4..8].copy_from_slice(&(-3i32).to_le_bytes());
    let err = UniformReservoir::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_deserialize_zero_count_without_empty_flag() {
    let mut bytes = UniformReservoir::from_samples(&[1.0], 1, 10)
        .unwrap()
        .serialize();
    bytes[8..16].copy_from_slice(&0u64.to_le_bytes());
    bytes[16..20].copy_from_slice(&0u32.to_le_bytes());
    bytes.truncate(24);
    let err = UniformReservoir::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("empty flag"));
}
