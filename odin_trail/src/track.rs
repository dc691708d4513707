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

/// the track history of a single aircraft as a sequence of path segments.
/// Segments distinguish between continuously observed ("solid") and gap-filled ("estimated") stretches,
/// and between ground and air. Only the last segment grows, all previous ones are frozen.
/// To bound the number of stored points we thin out positions on straight legs and keep turns

use std::fmt;
use geo::{Coord, LineString};
use tracing::debug;
use crate::{altitude::Altitude, render::VisualHandle};

/// max gap (in sec) between ADS-B positions before we consider the track as estimated
pub const STALE_TIMEOUT: f64 = 6.0;
/// MLAT positions get more leeway
pub const STALE_TIMEOUT_MLAT: f64 = 15.0;

/// altitude difference (in ft) that starts a new segment
pub const ALTITUDE_STEP: i32 = 1000;

// point retention thresholds (sec / deg)
const RESAMPLE_INTERVAL: f64 = 16.0;
const TURN_INTERVAL: f64 = 3.0;
const TURN_ANGLE: f64 = 1.0;
const SLOW_TURN_INTERVAL: f64 = 8.0;
const SLOW_TURN_ANGLE: f64 = 0.25;
const MLAT_INTERVAL: f64 = 8.0;
const NO_HEADING_INTERVAL: f64 = 5.0;

/// the input for one track update
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TrackSample {
    pub position: Coord<f64>,  // lon/lat degrees
    pub altitude: Altitude,
    pub heading: Option<f64>,  // degrees, None if we don't know
    pub position_time: f64,    // receiver time of position in sec
    pub from_mlat: bool,
}

#[derive(Debug,Clone)]
pub struct PathSegment {
    points: LineString<f64>,
    estimated: bool,
    ground: bool,
    altitude: Altitude, // at segment start
    visual: Option<VisualHandle>, // owned by the RenderDispatcher
    drawn_len: usize,             // number of points when the visual was created
}

impl PathSegment {
    fn solid (p: Coord<f64>, altitude: Altitude)->Self {
        PathSegment { points: LineString::new( vec![p]), estimated: false, ground: altitude.is_ground(), altitude, visual: None, drawn_len: 0 }
    }

    fn estimated (from: Coord<f64>, to: Coord<f64>)->Self {
        PathSegment { points: LineString::new( vec![from,to]), estimated: true, ground: false, altitude: Altitude::Unknown, visual: None, drawn_len: 0 }
    }

    pub fn points (&self)->&LineString<f64> { &self.points }
    pub fn len (&self)->usize { self.points.0.len() }
    pub fn first_point (&self)->Option<Coord<f64>> { self.points.0.first().copied() }
    pub fn last_point (&self)->Option<Coord<f64>> { self.points.0.last().copied() }

    pub fn is_estimated (&self)->bool { self.estimated }
    pub fn is_ground (&self)->bool { self.ground }
    pub fn altitude (&self)->Altitude { self.altitude }

    pub fn visual (&self)->Option<VisualHandle> { self.visual }
    /// do we have a visual that reflects all current points
    pub fn is_drawn (&self)->bool { self.visual.is_some() && self.drawn_len == self.len() }

    pub(crate) fn set_visual (&mut self, visual: VisualHandle) {
        self.visual = Some(visual);
        self.drawn_len = self.len();
    }
    pub(crate) fn take_visual (&mut self)->Option<VisualHandle> { self.visual.take() }

    fn push (&mut self, p: Coord<f64>) {
        self.points.0.push(p)
    }

    /// append unless `p` already is the last point. Returns true if it was appended
    fn push_distinct (&mut self, p: Coord<f64>)->bool {
        if self.last_point() == Some(p) {
            false
        } else {
            self.points.0.push(p);
            true
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.estimated { "estimated" } else if self.ground { "ground" } else { "air" };
        write!( f, "PathSegment( {kind}, alt: {}, n_points: {} )", self.altitude, self.len())
    }
}

/// shortest angular distance between two headings in degrees [0..180]
pub fn heading_change (from: f64, to: f64)->f64 {
    let d = (to - from).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

#[derive(Debug,Clone,Default)]
pub struct TrackHistory {
    segments: Vec<PathSegment>,

    prev_position: Option<Coord<f64>>, // last raw position we were called with
    head_update: f64,                  // time of last accepted sample
    tail_update: f64,                  // time of last stored point
    tail_track: Option<f64>,           // heading at last stored point

    history_size: usize,               // total number of stored points (diagnostics only)
}

impl TrackHistory {
    pub fn new ()->Self { Self::default() }

    pub fn segments (&self)->&[PathSegment] { self.segments.as_slice() }
    pub(crate) fn segments_mut (&mut self)->&mut [PathSegment] { self.segments.as_mut_slice() }

    pub fn last_segment (&self)->Option<&PathSegment> { self.segments.last() }
    pub fn is_empty (&self)->bool { self.segments.is_empty() }
    pub fn history_size (&self)->usize { self.history_size }
    pub fn prev_position (&self)->Option<Coord<f64>> { self.prev_position }

    /// feed a new position into the track. `receiver_time` is the timestamp of the current data batch and
    /// `last_batch_time` the one of the previous batch, which we need to tell gaps in the data source from
    /// our own polling latency.
    /// Returns true if the aircraft moved, i.e. the trail geometry might have changed. Identical consecutive
    /// positions and the very first position return false
    pub fn update (&mut self, sample: &TrackSample, receiver_time: f64, last_batch_time: f64)->bool {
        let here = sample.position;
        let t = sample.position_time;

        if self.prev_position == Some(here) { return false }
        let prev = self.prev_position.unwrap_or(here);
        self.prev_position = Some(here);

        if self.segments.is_empty() {
            self.segments.push( PathSegment::solid( here, sample.altitude));
            self.head_update = t;
            self.set_tail( sample);
            self.history_size += 1;
            return false
        }

        // gaps between positions should not be much larger than the gaps between our data batches.
        // Also check if the position was already stale when we received it
        let stale_timeout = if sample.from_mlat { STALE_TIMEOUT_MLAT } else { STALE_TIMEOUT };
        let time_drift = (t - self.head_update) - (receiver_time - last_batch_time);
        let is_stale = time_drift > stale_timeout || (receiver_time - t) > stale_timeout;
        self.head_update = t;

        if is_stale {
            self.extend_estimated( prev, here);
            self.set_tail( sample);
            return true
        }

        if self.segments.last().is_some_and( |seg| seg.estimated) {
            // back to good data. prev is already the last point of the estimated segment, hence no tail update
            self.segments.push( PathSegment::solid( prev, sample.altitude));
            self.history_size += 1;
        }

        let since_update = t - self.tail_update;
        let Some(last_seg) = self.segments.last_mut() else { return false };

        if sample.altitude.is_step_from( &last_seg.altitude, ALTITUDE_STEP) {
            debug!("altitude state change {} -> {}", last_seg.altitude, sample.altitude);
            if last_seg.push_distinct( here) { self.history_size += 1 }
            self.segments.push( PathSegment::solid( here, sample.altitude));
            self.history_size += 1;
            self.set_tail( sample);
            return true
        }

        let track_change = match (self.tail_track, sample.heading) {
            (Some(tail), Some(hdg)) => Some( heading_change( tail, hdg)),
            _ => None
        };
        let is_turning = track_change.is_some_and( |d| d > TURN_ANGLE) && since_update > TURN_INTERVAL;

        let retain = since_update > RESAMPLE_INTERVAL
            || is_turning
            || (track_change.is_some_and( |d| d > SLOW_TURN_ANGLE) && since_update > SLOW_TURN_INTERVAL)
            || (sample.from_mlat && since_update > MLAT_INTERVAL)
            || (track_change.is_none() && since_update > NO_HEADING_INTERVAL);

        if retain {
            // keep the corner if we start a turn
            if is_turning && last_seg.push_distinct( prev) { self.history_size += 1 }
            if last_seg.push_distinct( here) { self.history_size += 1 }
            self.set_tail( sample);
        }

        // even if we didn't store the point the aircraft still moved
        true
    }

    fn extend_estimated (&mut self, prev: Coord<f64>, here: Coord<f64>) {
        match self.segments.last_mut() {
            Some(last_seg) if last_seg.estimated => {
                // keep every point while estimating
                last_seg.push( here);
                self.history_size += 1;
            }
            Some(last_seg) => {
                debug!("switching to estimated track after {}", last_seg);
                if last_seg.push_distinct( prev) { self.history_size += 1 }
                self.segments.push( PathSegment::estimated( prev, here));
                self.history_size += 2;
            }
            None => {}
        }
    }

    fn set_tail (&mut self, sample: &TrackSample) {
        self.tail_update = sample.position_time;
        self.tail_track = sample.heading;
    }
}
