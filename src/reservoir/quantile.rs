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

/// Returns the quantile at `fraction` of an ascending slice, interpolating linearly
/// between the two order statistics around position `fraction * (n + 1)`.
///
/// An empty slice has no quantiles and yields NaN. A single value is every quantile.
///
/// # Panics
///
/// Panics if `fraction` is not in (0.0, 1.0).
///
/// # Examples
///
/// ```
/// # use uniform_reservoir::reservoir::interpolated_quantile;
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(interpolated_quantile(&sorted, 0.25), 1.25);
/// assert_eq!(interpolated_quantile(&sorted, 0.5), 2.5);
/// assert!(interpolated_quantile(&[], 0.5).is_nan());
/// ```
pub fn interpolated_quantile(sorted: &[f64], fraction: f64) -> f64 {
    assert!(
        fraction > 0.0 && fraction < 1.0,
        "fraction must be in (0.0, 1.0), got {fraction}"
    );

    let n = sorted.len();
    match n {
        0 => f64::NAN,
        1 => sorted[0],
        _ => {
            let pos = fraction * (n + 1) as f64;
            let index = pos as usize;
            if index == 0 {
                sorted[0]
            } else if index >= n {
                sorted[n - 1]
            } else {
                let base = sorted[index - 1];
                base + (pos - index as f64) * (sorted[index] - base)
            }
        }
    }
}
