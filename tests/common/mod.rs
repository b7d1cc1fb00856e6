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

//! Shared test support: an exact frequency oracle and stream helpers.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::hash::Hash;
use std::time::Duration;
use std::time::Instant;

use hotitems::common::random::XorShift64;

/// Exact analyzers report nothing below this many in-scope events, so tiny
/// samples do not produce spurious "heavy hitters".
pub const MIN_ORACLE_SAMPLE: usize = 100;

/// Exact heavy-hitter oracle.
///
/// Logs every `(timestamp, key)` pair and answers with the exact set of keys
/// whose count over the trailing window exceeds `share` of the in-scope
/// events. Memory grows with the event rate, so this is strictly a test
/// collaborator for checking the bounded-memory sketch.
pub struct ExactFrequencyAnalyzer<K> {
    window: Duration,
    share: f64,
    log: VecDeque<(Instant, K)>,
}

impl<K: Ord + Clone> ExactFrequencyAnalyzer<K> {
    pub fn new(window: Duration, share: f64) -> Self {
        Self {
            window,
            share,
            log: VecDeque::new(),
        }
    }

    /// Logs one event. Timestamps must be non-decreasing.
    pub fn add(&mut self, key: K, at: Instant) {
        self.log.push_back((at, key));
    }

    /// Returns the exact heavy-hitter set over the trailing window,
    /// empty when fewer than [`MIN_ORACLE_SAMPLE`] events are in scope.
    pub fn actual_top(&mut self, now: Instant) -> Vec<K> {
        self.prune(now);
        let in_scope = self.log.len();
        if in_scope < MIN_ORACLE_SAMPLE {
            return Vec::new();
        }
        let mut counts: BTreeMap<&K, u64> = BTreeMap::new();
        for (_, key) in self.log.iter() {
            *counts.entry(key).or_insert(0) += 1;
        }
        let bar = in_scope as f64 * self.share;
        counts
            .into_iter()
            .filter(|(_, count)| *count as f64 > bar)
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn prune(&mut self, now: Instant) {
        while self
            .log
            .front()
            .map_or(false, |(at, _)| now.saturating_duration_since(*at) > self.window)
        {
            self.log.pop_front();
        }
    }
}

/// Returns true when every element of `small` appears in `big`.
pub fn is_subset<T: Eq + Hash>(small: &[T], big: &[T]) -> bool {
    let big: HashSet<&T> = big.iter().collect();
    small.iter().all(|element| big.contains(element))
}

const KEY_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generates a random 10-character key.
pub fn random_key(rng: &mut XorShift64) -> String {
    (0..10)
        .map(|_| KEY_CHARS[rng.next_below(KEY_CHARS.len() as u64) as usize] as char)
        .collect()
}
