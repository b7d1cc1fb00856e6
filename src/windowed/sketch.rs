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

//! Sliding-window heavy-hitter sketch over a ring of staggered buckets.

use std::collections::VecDeque;
use std::hash::Hash;
use std::time::Duration;

use crate::common::clock::MonotonicClock;
use crate::common::clock::TimeSource;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::windowed::bucket::Bucket;

/// Configuration for a [`WindowedSketch`], immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchConfig {
    /// Duration over which access shares are measured.
    pub window: Duration,
    /// Minimum share of events within the window for a key to be reported hot.
    pub hot_share: f64,
    /// Number of time-staggered buckets; memory grows linearly with this.
    pub num_buckets: usize,
    /// Maximum distinct keys tracked per bucket.
    pub bucket_capacity: usize,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            hot_share: 0.1,
            num_buckets: 12,
            bucket_capacity: 54,
        }
    }
}

impl SketchConfig {
    /// Creates a configuration with the given parameters.
    pub fn new(window: Duration, hot_share: f64, num_buckets: usize, bucket_capacity: usize) -> Self {
        Self {
            window,
            hot_share,
            num_buckets,
            bucket_capacity,
        }
    }

    /// Maximum age of the oldest live bucket: `window * (B + 1) / B`.
    pub fn full_window(&self) -> Duration {
        self.window * (self.num_buckets as u32 + 1) / self.num_buckets as u32
    }

    /// Creation-time stagger between adjacent buckets: `window / B`.
    pub fn bucket_stride(&self) -> Duration {
        self.window / self.num_buckets as u32
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.window.is_zero() {
            return Err(Error::new(ErrorKind::ConfigInvalid, "window must be positive")
                .with_context("window", format!("{:?}", self.window)));
        }
        if !(self.hot_share > 0.0 && self.hot_share <= 1.0) {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "hot_share must be in (0, 1]")
                    .with_context("hot_share", self.hot_share),
            );
        }
        if self.num_buckets < 1 {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "num_buckets must be at least 1")
                    .with_context("num_buckets", self.num_buckets),
            );
        }
        if self.num_buckets >= u32::MAX as usize
            || self.window.checked_mul(self.num_buckets as u32 + 1).is_none()
        {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "window times num_buckets overflows")
                    .with_context("num_buckets", self.num_buckets)
                    .with_context("window", format!("{:?}", self.window)),
            );
        }
        if self.bucket_capacity < 1 {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "bucket_capacity must be at least 1")
                    .with_context("bucket_capacity", self.bucket_capacity),
            );
        }
        Ok(())
    }
}

/// Approximate heavy-hitter sketch over a sliding time window.
///
/// The sketch keeps a ring of up to `B + 1` majority counter tables whose
/// creation times are staggered by `window / B`. Every observation is
/// delivered to every live bucket; queries read only the oldest bucket, which
/// always covers between `window` and `window * (B + 1) / B` of history.
/// Updates are O(1) amortised and memory is independent of stream length.
///
/// All methods take `&mut self` because ring maintenance (retiring buckets
/// older than the full window, opening a fresh one when the newest has aged
/// past the stagger) runs at the start of every call. The sketch is
/// single-writer; concurrent callers must wrap it in a lock.
#[derive(Debug, Clone)]
pub struct WindowedSketch<T, C = MonotonicClock> {
    config: SketchConfig,
    full_window: Duration,
    stride: Duration,
    buckets: VecDeque<Bucket<T>>,
    time: C,
}

impl<T: Eq + Hash + Clone> WindowedSketch<T> {
    /// Creates a sketch reading the process monotonic clock.
    pub fn new(config: SketchConfig) -> Result<Self, Error> {
        Self::with_time_source(config, MonotonicClock)
    }
}

impl<T: Eq + Hash + Clone, C: TimeSource> WindowedSketch<T, C> {
    /// Creates a sketch with an explicit time source.
    pub fn with_time_source(config: SketchConfig, time: C) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            full_window: config.full_window(),
            stride: config.bucket_stride(),
            config,
            buckets: VecDeque::new(),
            time,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Records one event for `key` at the current time.
    pub fn observe(&mut self, key: &T) {
        self.maintain();
        for bucket in &mut self.buckets {
            bucket.observe(key);
        }
    }

    /// Returns keys ordered by stored count descending.
    ///
    /// With `number == 0`, returns every key whose share of the events covered
    /// by the oldest live bucket clears the configured threshold (see
    /// [`SketchConfig::hot_share`]); the result may be empty. With
    /// `number > 0`, returns the first `min(number, tracked)` keys without
    /// threshold filtering; that mode is a best-effort ranking and carries no
    /// heavy-hitter guarantee.
    pub fn query(&mut self, number: usize) -> Vec<T> {
        self.maintain();
        let oldest = self.buckets.front().expect("maintenance keeps a live bucket");
        let mut rows = oldest.snapshot();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        if number > 0 {
            rows.truncate(number);
            return rows.into_iter().map(|(key, _)| key).collect();
        }
        let cutoff = hot_cutoff(
            oldest.total(),
            self.config.hot_share,
            self.config.bucket_capacity,
        );
        rows.into_iter()
            .take_while(|(_, count)| *count as f64 >= cutoff)
            .map(|(key, _)| key)
            .collect()
    }

    /// Returns the stored count for `key` in the oldest live bucket.
    ///
    /// This is a lower bound on the key's true event count over the bucket's
    /// lifetime; the under-count is at most `stream_weight / (capacity + 1)`.
    pub fn estimate(&mut self, key: &T) -> u64 {
        self.maintain();
        self.buckets
            .front()
            .expect("maintenance keeps a live bucket")
            .count(key)
    }

    /// Returns the total number of events covered by the oldest live bucket,
    /// the denominator of the share computation.
    pub fn stream_weight(&mut self) -> u64 {
        self.maintain();
        self.buckets
            .front()
            .expect("maintenance keeps a live bucket")
            .total()
    }

    /// Returns the number of live buckets, between 1 and `B + 1`.
    pub fn num_live_buckets(&mut self) -> usize {
        self.maintain();
        self.buckets.len()
    }

    // Retire buckets older than the full window, then open a fresh bucket if
    // the ring is empty or the newest one has aged past the stagger. Runs
    // before every public operation, so a query always has an oldest bucket
    // covering at least the control window.
    fn maintain(&mut self) {
        let now = self.time.now();
        while self
            .buckets
            .front()
            .map_or(false, |b| now.saturating_duration_since(b.created_at()) > self.full_window)
        {
            self.buckets.pop_front();
        }
        let extend = match self.buckets.back() {
            None => true,
            Some(newest) => now.saturating_duration_since(newest.created_at()) > self.stride,
        };
        if extend {
            self.buckets
                .push_back(Bucket::new(now, self.config.bucket_capacity));
        }
    }
}

// Minimum stored count for a key to be reported hot, given the `total` events
// the oldest bucket covers. The first correction term absorbs the majority
// table's under-count, the constant absorbs the stagger drift between the
// bucket's lifetime and the nominal window. May be negative, in which case
// every tracked key qualifies.
fn hot_cutoff(total: u64, share: f64, capacity: usize) -> f64 {
    let n = total as f64;
    (n * share).floor() - (n * (1.0 - share) / capacity as f64).ceil() - 2.0
}
