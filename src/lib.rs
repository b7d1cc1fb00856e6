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

//! In-memory key-value store that continuously identifies its hot keys.
//!
//! The crate has two layers. [`windowed`] holds the core: a bounded-memory
//! sketch that approximates, in constant time per event, the set of keys
//! whose share of all accesses over a sliding time window exceeds a
//! configured threshold. [`store`] wraps it in an ordered map whose `get` and
//! `set` feed the sketch, so callers in front of a larger data path can ask
//! at any moment which keys deserve caching, rate-limiting, or sharding.
//!
//! The core is single-writer and allocation is its only failure mode; see the
//! module documentation for the accuracy guarantees.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hotitems::store::TrackedMap;
//! use hotitems::windowed::SketchConfig;
//!
//! let config = SketchConfig {
//!     window: Duration::from_secs(1),
//!     ..SketchConfig::default()
//! };
//! let mut map: TrackedMap<String, u64> = TrackedMap::new(config).unwrap();
//! map.set("alpha".to_string(), 1);
//! assert_eq!(*map.get(&"alpha".to_string()), 1);
//! ```

pub mod common;
pub mod error;
pub mod store;
pub mod windowed;
