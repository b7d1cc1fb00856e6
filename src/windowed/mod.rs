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

//! Sliding-window heavy-hitter sketch.
//!
//! This module tracks which keys exceed a configured share of all events over
//! a recent time window, in bounded memory and constant time per event. It
//! runs a ring of majority (Misra–Gries) counter tables whose start times are
//! staggered across the window; the oldest table always covers at least the
//! full window, so queries read it alone. Reported keys are approximate in
//! the usual sketch sense: the threshold is lowered by the table's worst-case
//! under-count, trading a small false-positive band for no missed heavy
//! hitters.
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hotitems::windowed::SketchConfig;
//! use hotitems::windowed::WindowedSketch;
//!
//! let config = SketchConfig {
//!     window: Duration::from_secs(1),
//!     ..SketchConfig::default()
//! };
//! let mut sketch = WindowedSketch::new(config).unwrap();
//! for _ in 0..40 {
//!     sketch.observe(&"hot");
//! }
//! sketch.observe(&"cold");
//! let report = sketch.query(0);
//! assert!(report.contains(&"hot"));
//! ```

mod bucket;
mod counter_table;
mod sketch;

pub use self::sketch::SketchConfig;
pub use self::sketch::WindowedSketch;
