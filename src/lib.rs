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

//! A bounded-memory uniform sampling reservoir for summarizing numeric streams.
//!
//! The [`reservoir`] module provides [`UniformReservoir`](reservoir::UniformReservoir),
//! which keeps a sorted, uniformly random sample of a stream to answer quantile queries,
//! and can be checkpointed to and restored from a
//! [`ReservoirSnapshot`](reservoir::ReservoirSnapshot) or a compact binary form.
//!
//! A reservoir is meant to be owned and mutated by a single thread; wrap it in a lock if it
//! has to be shared.

mod codec;
pub mod error;
pub mod reservoir;
