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

//! Time sources for windowed sketches.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

/// Source of the current time, sampled once per sketch operation.
pub trait TimeSource {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Default time source reading the process monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl TimeSource for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced time source for deterministic tests.
///
/// Clones share the underlying instant, so a test keeps one handle to drive
/// time while the sketch owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Creates a clock pinned to the present instant.
    pub fn new() -> Self {
        Self {
            current: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Moves the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.current.set(self.current.get() + step);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}
