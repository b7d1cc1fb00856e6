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

//! Long randomized runs checked against an exact frequency oracle.

mod common;

use std::time::Duration;

use common::is_subset;
use common::random_key;
use common::ExactFrequencyAnalyzer;
use googletest::assert_that;
use googletest::prelude::le;
use hotitems::common::clock::ManualClock;
use hotitems::common::clock::TimeSource;
use hotitems::common::random::XorShift64;
use hotitems::store::TrackedMap;
use hotitems::windowed::SketchConfig;

const PHASE_TICKS: u64 = 3000;
const HOT_KEY: &str = "hot_key_0123";

fn second_config() -> SketchConfig {
    SketchConfig {
        window: Duration::from_secs(1),
        ..SketchConfig::default()
    }
}

// Drives one event per millisecond through three phases: hot traffic, cold
// traffic of fresh random keys, then queries over a quiet store. Every tick
// also queries and compares against the exact oracle; a mistake is a query
// whose result misses an exactly-hot key.
fn hot_cold_quiet_mistake_rate(config: SketchConfig, seed: u64, hot_rate: f64) -> f64 {
    let clock = ManualClock::new();
    let mut map: TrackedMap<String, String, ManualClock> =
        TrackedMap::with_time_source(config, clock.clone()).unwrap();
    let mut oracle = ExactFrequencyAnalyzer::new(config.window, config.hot_share);
    let mut rng = XorShift64::seeded(seed);
    let tick = Duration::from_millis(1);

    let mut queries = 0u64;
    let mut mistakes = 0u64;
    for phase in 0..3 {
        for _ in 0..PHASE_TICKS {
            let now = clock.now();
            if phase < 2 {
                let key = if phase == 0 && rng.next_f64() < hot_rate {
                    HOT_KEY.to_string()
                } else {
                    random_key(&mut rng)
                };
                map.set(key.clone(), "value".to_string());
                oracle.add(key, now);
            }
            let result = map.top_k(0);
            let expected = oracle.actual_top(now);
            queries += 1;
            if !is_subset(&expected, &result) {
                mistakes += 1;
            }
            clock.advance(tick);
        }
    }
    mistakes as f64 / queries as f64
}

#[test]
fn mistake_rate_stays_low_at_default_accuracy() {
    let rate = hot_cold_quiet_mistake_rate(second_config(), 0xfeed_0001, 0.3);
    assert_that!(rate, le(0.01));
}

#[test]
fn mistake_rate_stays_low_at_increased_accuracy() {
    let config = SketchConfig {
        window: Duration::from_secs(1),
        num_buckets: 20,
        bucket_capacity: 100,
        ..SketchConfig::default()
    };
    let rate = hot_cold_quiet_mistake_rate(config, 0xfeed_0002, 0.23);
    assert_that!(rate, le(0.01));
}

// Threshold-mode output must not invent heavy hitters: after warmup, every
// reported key must clear a generously slackened exact share over the full
// bucket horizon. The slack covers the sketch's documented false-positive
// band (theta minus the under-count correction).
#[test]
fn reported_keys_are_genuinely_frequent() {
    let config = second_config();
    let clock = ManualClock::new();
    let mut map: TrackedMap<String, String, ManualClock> =
        TrackedMap::with_time_source(config, clock.clone()).unwrap();
    let mut slack_oracle =
        ExactFrequencyAnalyzer::new(config.full_window(), config.hot_share / 2.0);
    let mut rng = XorShift64::seeded(0xfeed_0003);
    let tick = Duration::from_millis(1);

    let mut checked = 0u64;
    let mut false_positives = 0u64;
    for step in 0..3000u64 {
        let now = clock.now();
        let key = if rng.next_f64() < 0.23 {
            HOT_KEY.to_string()
        } else {
            random_key(&mut rng)
        };
        map.set(key.clone(), "value".to_string());
        slack_oracle.add(key, now);
        if step >= 200 {
            let result = map.top_k(0);
            let genuine = slack_oracle.actual_top(now);
            checked += 1;
            if !is_subset(&result, &genuine) {
                false_positives += 1;
            }
        }
        clock.advance(tick);
    }
    let rate = false_positives as f64 / checked as f64;
    assert_that!(rate, le(0.01));
}
