/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use geo::Coord;
use odin_trail::{Altitude, TrackHistory, TrackSample, track::heading_change};

// run with "cargo test --test test_track -- --nocapture"

fn pos (i: u32)->Coord<f64> { Coord{ x: -122.0 + (i as f64) * 0.01, y: 37.0 } }

fn sample (i: u32, t: f64, altitude: Altitude, heading: Option<f64>, from_mlat: bool)->TrackSample {
    TrackSample { position: pos(i), altitude, heading, position_time: t, from_mlat }
}

fn air (i: u32, t: f64, heading: f64)->TrackSample {
    sample( i, t, Altitude::Feet(10000), Some(heading), false)
}

/// feed sample with a receiver time equal to the position time and a 1sec batch interval
fn feed (track: &mut TrackHistory, s: TrackSample)->bool {
    track.update( &s, s.position_time, s.position_time - 1.0)
}

#[test]
fn test_bootstrap () {
    let mut track = TrackHistory::new();
    assert!( !feed( &mut track, air( 0, 0.0, 90.0)));

    assert_eq!( track.segments().len(), 1);
    let seg = &track.segments()[0];
    assert_eq!( seg.len(), 1);
    assert!( !seg.is_estimated());
    assert!( !seg.is_ground());
    assert_eq!( track.history_size(), 1);

    let mut track = TrackHistory::new();
    feed( &mut track, sample( 0, 0.0, Altitude::Ground, None, false));
    assert!( track.segments()[0].is_ground());
}

#[test]
fn test_identical_position_is_noop () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    assert!( feed( &mut track, air( 1, 1.0, 90.0)));

    let n_points = track.history_size();
    assert!( !feed( &mut track, air( 1, 2.0, 90.0)));
    assert!( !feed( &mut track, air( 1, 30.0, 180.0)));

    assert_eq!( track.segments().len(), 1);
    assert_eq!( track.segments()[0].len(), 1);
    assert_eq!( track.history_size(), n_points);
}

#[test]
fn test_held_heading_resamples_after_16s () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));

    for i in 1..=16 {
        assert!( feed( &mut track, air( i, i as f64, 90.0)));
        assert_eq!( track.segments()[0].len(), 1, "point retained at {i}s");
    }

    assert!( feed( &mut track, air( 17, 16.0001, 90.0)));
    let seg = &track.segments()[0];
    assert_eq!( seg.len(), 2);
    assert_eq!( seg.last_point(), Some(pos(17)));
    assert!( !seg.is_estimated());
}

#[test]
fn test_turn_keeps_corner () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    feed( &mut track, air( 1, 1.0, 90.0));
    feed( &mut track, air( 2, 2.0, 90.0));
    feed( &mut track, air( 3, 3.0, 90.0));
    assert_eq!( track.segments()[0].len(), 1);

    feed( &mut track, air( 4, 4.0, 95.0)); // >1deg after >3sec

    let seg = &track.segments()[0];
    assert_eq!( seg.points().0, vec![pos(0), pos(3), pos(4)]);
    assert_eq!( track.history_size(), 3);
}

#[test]
fn test_slow_turn () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    for i in 1..=8 {
        feed( &mut track, air( i, i as f64, 90.5));
    }
    assert_eq!( track.segments()[0].len(), 1);

    feed( &mut track, air( 9, 9.0, 90.5));
    let seg = &track.segments()[0];
    assert_eq!( seg.points().0, vec![pos(0), pos(9)]); // no corner point for slow turns
}

#[test]
fn test_unknown_heading () {
    let mut track = TrackHistory::new();
    feed( &mut track, sample( 0, 0.0, Altitude::Feet(5000), None, false));
    for i in 1..=5 {
        feed( &mut track, sample( i, i as f64, Altitude::Feet(5000), None, false));
    }
    assert_eq!( track.segments()[0].len(), 1);

    feed( &mut track, sample( 6, 6.0, Altitude::Feet(5000), None, false));
    assert_eq!( track.segments()[0].len(), 2);
}

#[test]
fn test_mlat_denser_sampling () {
    let mut track = TrackHistory::new();
    feed( &mut track, sample( 0, 0.0, Altitude::Feet(5000), Some(45.0), true));
    for i in 1..=8 {
        feed( &mut track, sample( i, i as f64, Altitude::Feet(5000), Some(45.0), true));
    }
    assert_eq!( track.segments()[0].len(), 1);

    feed( &mut track, sample( 9, 9.0, Altitude::Feet(5000), Some(45.0), true));
    assert_eq!( track.segments()[0].len(), 2);
}

#[test]
fn test_gap_primary_vs_mlat () {
    // 10sec gap with a 1sec batch interval: drift is 9sec
    let mut primary = TrackHistory::new();
    feed( &mut primary, air( 0, 0.0, 90.0));
    assert!( feed( &mut primary, air( 1, 10.0, 90.0)));

    let segs = primary.segments();
    assert_eq!( segs.len(), 2);
    assert!( !segs[0].is_estimated());
    assert_eq!( segs[0].len(), 1); // previous point already is the last point
    assert!( segs[1].is_estimated());
    assert_eq!( segs[1].points().0, vec![pos(0), pos(1)]);

    let mut mlat = TrackHistory::new();
    feed( &mut mlat, sample( 0, 0.0, Altitude::Feet(10000), Some(90.0), true));
    assert!( feed( &mut mlat, sample( 1, 10.0, Altitude::Feet(10000), Some(90.0), true)));

    assert_eq!( mlat.segments().len(), 1);
    assert!( !mlat.segments()[0].is_estimated());

    // 20sec gap exceeds both thresholds
    let mut mlat = TrackHistory::new();
    feed( &mut mlat, sample( 0, 0.0, Altitude::Feet(10000), Some(90.0), true));
    feed( &mut mlat, sample( 1, 20.0, Altitude::Feet(10000), Some(90.0), true));
    assert_eq!( mlat.segments().len(), 2);
    assert!( mlat.segments()[1].is_estimated());
}

#[test]
fn test_batch_interval_is_not_a_gap () {
    // positions 10sec apart but so are our data batches
    let mut track = TrackHistory::new();
    track.update( &air( 0, 0.0, 90.0), 0.0, -10.0);
    track.update( &air( 1, 10.0, 90.0), 10.0, 0.0);

    assert_eq!( track.segments().len(), 1);
    assert!( !track.segments()[0].is_estimated());
}

#[test]
fn test_position_stale_on_arrival () {
    let mut track = TrackHistory::new();
    track.update( &air( 0, 0.0, 90.0), 0.0, -1.0);

    // position is 7sec old when we get it
    assert!( track.update( &air( 1, 1.0, 90.0), 8.0, 7.0));
    assert_eq!( track.segments().len(), 2);
    assert!( track.segments()[1].is_estimated());

    // keep every point while estimating
    track.update( &air( 2, 2.0, 90.0), 9.0, 8.0);
    track.update( &air( 3, 3.0, 90.0), 10.0, 9.0);
    assert_eq!( track.segments().len(), 2);
    assert_eq!( track.segments()[1].points().0, vec![pos(0), pos(1), pos(2), pos(3)]);
}

#[test]
fn test_return_from_estimated () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    feed( &mut track, air( 1, 10.0, 90.0));
    assert!( track.segments()[1].is_estimated());

    assert!( feed( &mut track, air( 2, 11.0, 90.0)));

    let segs = track.segments();
    assert_eq!( segs.len(), 3);
    assert!( !segs[2].is_estimated());
    assert_eq!( segs[2].points().0, vec![pos(1)]); // starts at the shared previous point
    assert_eq!( segs[1].last_point(), Some(pos(1)));
}

#[test]
fn test_estimated_after_thinned_points () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    feed( &mut track, air( 1, 1.0, 90.0)); // dropped
    feed( &mut track, air( 2, 12.0, 90.0)); // gap

    let segs = track.segments();
    assert_eq!( segs.len(), 2);
    assert_eq!( segs[0].points().0, vec![pos(0), pos(1)]); // gap closed with previous point
    assert_eq!( segs[1].points().0, vec![pos(1), pos(2)]);
}

#[test]
fn test_air_to_ground () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    assert!( feed( &mut track, sample( 1, 1.0, Altitude::Ground, Some(90.0), false)));

    let segs = track.segments();
    assert_eq!( segs.len(), 2);
    assert!( !segs[0].is_ground());
    assert_eq!( segs[0].points().0, vec![pos(0), pos(1)]);
    assert!( segs[1].is_ground());
    assert_eq!( segs[1].points().0, vec![pos(1)]);
}

#[test]
fn test_ground_to_air () {
    let mut track = TrackHistory::new();
    feed( &mut track, sample( 0, 0.0, Altitude::Ground, Some(270.0), false));
    feed( &mut track, sample( 1, 1.0, Altitude::Feet(300), Some(270.0), false));

    let segs = track.segments();
    assert_eq!( segs.len(), 2);
    assert!( segs[0].is_ground());
    assert!( !segs[1].is_ground());
    assert_eq!( segs[1].altitude(), Altitude::Feet(300));
}

#[test]
fn test_altitude_step () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    feed( &mut track, sample( 1, 1.0, Altitude::Feet(10999), Some(90.0), false));
    assert_eq!( track.segments().len(), 1);

    feed( &mut track, sample( 2, 2.0, Altitude::Feet(11000), Some(90.0), false));
    assert_eq!( track.segments().len(), 2);
    assert_eq!( track.segments()[1].altitude(), Altitude::Feet(11000));

    // unknown altitude does not break segments
    feed( &mut track, sample( 3, 3.0, Altitude::Unknown, Some(90.0), false));
    assert_eq!( track.segments().len(), 2);
}

#[test]
fn test_frozen_segments_unchanged () {
    let mut track = TrackHistory::new();
    feed( &mut track, air( 0, 0.0, 90.0));
    feed( &mut track, sample( 1, 1.0, Altitude::Ground, Some(90.0), false));
    let first = track.segments()[0].points().clone();

    for i in 2..40 {
        feed( &mut track, sample( i, i as f64, Altitude::Ground, Some(90.0 + i as f64), false));
    }
    assert_eq!( track.segments()[0].points(), &first);
    assert!( track.segments()[1].len() > 1);
}

#[test]
fn test_heading_change () {
    assert_eq!( heading_change( 359.0, 1.0), 2.0);
    assert_eq!( heading_change( 10.0, 350.0), 20.0);
    assert_eq!( heading_change( 90.0, 270.0), 180.0);
    assert_eq!( heading_change( 45.0, 45.0), 0.0);
}
