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

/// Bounded, ascending sequence of retained samples.
///
/// Occupied slots are `values[..values.len()]`; `capacity` bounds how many there can be.
/// Values must not be NaN.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SortedArray {
    capacity: usize,
    values: Vec<f64>,
}

impl SortedArray {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: Vec::new(),
        }
    }

    /// Replaces the content with `values`, sorted.
    ///
    /// # Panics
    ///
    /// Panics if more than `capacity` values are given.
    pub fn load(&mut self, mut values: Vec<f64>) {
        assert!(
            values.len() <= self.capacity,
            "cannot load {} values into capacity {}",
            values.len(),
            self.capacity
        );
        values.sort_unstable_by(f64::total_cmp);
        values.shrink_to(self.capacity);
        self.values = values;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Leftmost position at which `value` can be inserted while keeping the order.
    pub fn insertion_index(&self, value: f64) -> usize {
        self.values.partition_point(|v| *v < value)
    }

    /// Inserts `value` at its sorted position in a free slot.
    ///
    /// # Panics
    ///
    /// Panics if the array is full.
    pub fn insert(&mut self, value: f64) {
        assert!(!self.is_full(), "sorted array is full");
        // grow geometrically, but never past `capacity`
        if self.values.len() == self.values.capacity() {
            let free = self.capacity - self.values.len();
            self.values.reserve_exact(self.values.len().max(4).min(free));
        }
        let index = self.insertion_index(value);
        self.values.insert(index, value);
    }

    /// Evicts the value at position `evict` and inserts `value` at its sorted position.
    ///
    /// Only the values strictly between the two positions move, by one slot.
    pub fn replace(&mut self, evict: usize, value: f64) {
        assert!(evict < self.values.len(), "evict index out of bounds");
        let mut index = self.insertion_index(value);

        if evict < index {
            // [a, b, c, d, e]: evict 1, c2 goes before d -> [a, c, c2, d, e]
            index -= 1;
            self.values.copy_within(evict + 1..=index, evict);
        } else if evict > index {
            // [a, b, c, d, e]: evict 3, a2 goes before b -> [a, a2, b, c, e]
            self.values.copy_within(index..evict, index + 1);
        }

        self.values[index] = value;
    }
}
