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

//! One time-stamped counting bucket of the windowed sketch.

use std::hash::Hash;
use std::time::Instant;

use super::counter_table::CounterTable;

/// A majority counter table covering events from the bucket's creation until
/// its retirement, plus the total number of events it received.
#[derive(Debug, Clone)]
pub struct Bucket<T> {
    created_at: Instant,
    counters: CounterTable<T>,
    total: u64,
}

impl<T: Eq + Hash + Clone> Bucket<T> {
    pub fn new(created_at: Instant, capacity: usize) -> Self {
        Self {
            created_at,
            counters: CounterTable::new(capacity),
            total: 0,
        }
    }

    /// Delivers one event to this bucket.
    pub fn observe(&mut self, key: &T) {
        self.counters.observe(key);
        self.total += 1;
        debug_assert!(self.counters.len() <= self.counters.capacity());
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Total events delivered since creation.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Stored count for `key`, 0 if untracked.
    pub fn count(&self, key: &T) -> u64 {
        self.counters.count(key)
    }

    /// Tracked entries in table order.
    pub fn snapshot(&self) -> Vec<(T, u64)> {
        self.counters.snapshot()
    }
}
