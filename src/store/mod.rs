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

//! Key-value store with hot-key tracking.
//!
//! [`TrackedMap`] is an ordered map whose `get` and `set` each feed one
//! observation to a [`WindowedSketch`], so the store can report at any moment
//! which keys are currently taking an outsized share of the traffic. Upstream
//! components typically use the report to cache, rate-limit, or shard the hot
//! entries.
//!
//! # Usage
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
//! let mut map: TrackedMap<String, String> = TrackedMap::new(config).unwrap();
//! for _ in 0..30 {
//!     map.set("popular".to_string(), "value".to_string());
//! }
//! map.set("quiet".to_string(), "value".to_string());
//! assert!(map.top_k(0).contains(&"popular".to_string()));
//! ```

use std::collections::BTreeMap;
use std::hash::Hash;

use crate::common::clock::MonotonicClock;
use crate::common::clock::TimeSource;
use crate::error::Error;
use crate::windowed::SketchConfig;
use crate::windowed::WindowedSketch;

/// Ordered key-value map that tracks which keys are currently hot.
///
/// Map access never fails because of the tracking side: recording an
/// observation is infallible, and the sketch is bypassed entirely by the
/// read-only accessors ([`len`](Self::len), [`is_empty`](Self::is_empty),
/// [`contains_key`](Self::contains_key)).
#[derive(Debug, Clone)]
pub struct TrackedMap<K, V, C = MonotonicClock> {
    entries: BTreeMap<K, V>,
    sketch: WindowedSketch<K, C>,
}

impl<K: Ord + Hash + Clone, V> TrackedMap<K, V> {
    /// Creates a store reading the process monotonic clock.
    pub fn new(config: SketchConfig) -> Result<Self, Error> {
        Self::with_time_source(config, MonotonicClock)
    }
}

impl<K: Ord + Hash + Clone, V, C: TimeSource> TrackedMap<K, V, C> {
    /// Creates a store with an explicit time source.
    pub fn with_time_source(config: SketchConfig, time: C) -> Result<Self, Error> {
        Ok(Self {
            entries: BTreeMap::new(),
            sketch: WindowedSketch::with_time_source(config, time)?,
        })
    }

    /// Inserts or overwrites the value for `key`, recording one observation.
    pub fn set(&mut self, key: K, value: V) {
        self.sketch.observe(&key);
        self.entries.insert(key, value);
    }

    /// Returns the value for `key`, inserting `V::default()` when the key is
    /// absent. Records one observation.
    pub fn get(&mut self, key: &K) -> &V
    where
        V: Default,
    {
        self.sketch.observe(key);
        self.entries.entry(key.clone()).or_default()
    }

    /// Returns the keys currently taking an outsized share of accesses.
    ///
    /// `number == 0` returns every key clearing the configured share
    /// threshold; `number > 0` returns a best-effort top-`number` ranking
    /// with no heavy-hitter guarantee. See [`WindowedSketch::query`].
    pub fn top_k(&mut self, number: usize) -> Vec<K> {
        self.sketch.query(number)
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when `key` has a stored value. No observation is
    /// recorded.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}
