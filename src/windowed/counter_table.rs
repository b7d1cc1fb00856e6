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

//! Fixed-capacity majority counter table.

use std::hash::Hash;
use std::hash::Hasher;

use xxhash_rust::xxh64::Xxh64;

const LOAD_FACTOR: f64 = 0.75;
const DRIFT_LIMIT: usize = 1024;
const MIN_SLOTS: usize = 8;

/// Bounded counter table implementing the majority (Misra–Gries) update rule.
///
/// The table tracks at most `capacity` distinct keys. For a stream of `n`
/// events, a key observed `f` times carries a stored count `c` with
/// `f - n / (capacity + 1) <= c <= f`, and a key that is not tracked was
/// observed at most `n / (capacity + 1)` times. Storage is a fixed-size
/// open-addressed hash table with linear probing; the backing array is sized
/// once at construction and never grows.
#[derive(Debug, Clone)]
pub struct CounterTable<T> {
    capacity: usize,
    keys: Vec<Option<T>>,
    counts: Vec<u64>,
    // 0 = empty slot, otherwise 1 + distance from the key's home slot.
    states: Vec<u16>,
    num_active: usize,
}

impl<T: Eq + Hash + Clone> CounterTable<T> {
    /// Creates a table tracking at most `capacity` distinct keys.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "capacity must be at least 1");
        let slots = slots_for(capacity);
        Self {
            capacity,
            keys: (0..slots).map(|_| None).collect(),
            counts: vec![0; slots],
            states: vec![0; slots],
            num_active: 0,
        }
    }

    /// Applies the three-case update rule for one event.
    ///
    /// In order: increment an existing counter; otherwise create one (evicting
    /// a zeroed entry when the table is full); otherwise decrement every
    /// counter by one, floored at zero, without admitting `key`.
    pub fn observe(&mut self, key: &T) {
        if self.increment(key) {
            return;
        }
        if self.create(key) {
            return;
        }
        self.decrement_all();
    }

    /// Returns the stored count for `key`, or 0 if it is not tracked.
    pub fn count(&self, key: &T) -> u64 {
        match self.find(key) {
            Some(probe) => self.counts[probe],
            None => 0,
        }
    }

    /// Returns true if `key` currently occupies a counter.
    #[allow(dead_code)]
    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// Returns the tracked entries in slot order.
    pub fn snapshot(&self) -> Vec<(T, u64)> {
        let mut entries = Vec::with_capacity(self.num_active);
        for probe in 0..self.keys.len() {
            if self.states[probe] > 0 {
                let key = self.keys[probe].as_ref().expect("active key missing");
                entries.push((key.clone(), self.counts[probe]));
            }
        }
        entries
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.num_active
    }

    /// Returns the maximum number of tracked keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn increment(&mut self, key: &T) -> bool {
        match self.find(key) {
            Some(probe) => {
                self.counts[probe] += 1;
                true
            }
            None => false,
        }
    }

    fn create(&mut self, key: &T) -> bool {
        if self.num_active < self.capacity {
            self.insert(key.clone());
            return true;
        }
        // Full table: reuse the slot of a counter that has decayed to zero.
        // Scanning in slot order keeps the eviction choice deterministic.
        let idle = (0..self.keys.len()).find(|&probe| self.states[probe] > 0 && self.counts[probe] == 0);
        match idle {
            Some(probe) => {
                self.delete(probe);
                self.insert(key.clone());
                true
            }
            None => false,
        }
    }

    fn decrement_all(&mut self) {
        for probe in 0..self.counts.len() {
            if self.states[probe] > 0 && self.counts[probe] > 0 {
                self.counts[probe] -= 1;
            }
        }
    }

    fn find(&self, key: &T) -> Option<usize> {
        let mask = self.keys.len() - 1;
        let mut probe = (hash_key(key) as usize) & mask;
        while self.states[probe] != 0 {
            let matches = self.keys[probe]
                .as_ref()
                .map(|existing| existing == key)
                .unwrap_or(false);
            if matches {
                return Some(probe);
            }
            probe = (probe + 1) & mask;
        }
        None
    }

    fn insert(&mut self, key: T) {
        let mask = self.keys.len() - 1;
        let mut probe = (hash_key(&key) as usize) & mask;
        let mut drift: usize = 1;
        while self.states[probe] != 0 {
            probe = (probe + 1) & mask;
            drift += 1;
            debug_assert!(drift < DRIFT_LIMIT, "drift limit exceeded");
        }
        self.keys[probe] = Some(key);
        self.counts[probe] = 1;
        self.states[probe] = drift as u16;
        self.num_active += 1;
    }

    fn delete(&mut self, mut delete_probe: usize) {
        self.states[delete_probe] = 0;
        self.keys[delete_probe] = None;
        self.num_active -= 1;
        let mut drift: usize = 1;
        let mask = self.keys.len() - 1;
        let mut probe = (delete_probe + drift) & mask;
        while self.states[probe] != 0 {
            if self.states[probe] as usize > drift {
                self.keys[delete_probe] = self.keys[probe].take();
                self.counts[delete_probe] = self.counts[probe];
                self.states[delete_probe] = self.states[probe] - drift as u16;
                self.states[probe] = 0;
                drift = 0;
                delete_probe = probe;
            }
            probe = (probe + 1) & mask;
            drift += 1;
            debug_assert!(drift < DRIFT_LIMIT, "drift limit exceeded");
        }
    }
}

// Smallest power-of-two backing array that keeps `capacity` active entries at
// or below the load factor, so probe chains stay short and always terminate.
fn slots_for(capacity: usize) -> usize {
    let needed = (capacity as f64 / LOAD_FACTOR).ceil() as usize + 1;
    needed.next_power_of_two().max(MIN_SLOTS)
}

#[inline]
fn hash_key<T: Hash>(key: &T) -> u64 {
    let mut hasher = Xxh64::new(0);
    key.hash(&mut hasher);
    hasher.finish()
}
