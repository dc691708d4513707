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

use std::collections::HashSet;
use geo::{Coord, LineString};
use odin_trail::{MarkerStyle, RenderDispatcher, StyleChange, TrailStyle, VisualHandle};

#[derive(Debug,Clone,PartialEq)]
pub enum RenderCall {
    AddSegment { icao24: String, n_points: usize, style: TrailStyle, visual: VisualHandle },
    AddMarker { icao24: String, position: Coord<f64>, visual: VisualHandle },
    MoveMarker { visual: VisualHandle, position: Coord<f64> },
    StyleMarker { visual: VisualHandle, change: StyleChange, rotation: f64 },
    Leader { icao24: String, visual: VisualHandle, to: Coord<f64> },
    Remove { visual: VisualHandle },
    RefreshDetails { icao24: String },
}

/// a RenderDispatcher that records all calls and keeps track of live visuals
#[derive(Debug,Default)]
pub struct RecordingDispatcher {
    next_id: u64,
    pub calls: Vec<RenderCall>,
    pub live: HashSet<VisualHandle>,
}

impl RecordingDispatcher {
    fn new_visual (&mut self)->VisualHandle {
        self.next_id += 1;
        let h = VisualHandle(self.next_id);
        self.live.insert(h);
        h
    }

    pub fn clear_calls (&mut self) { self.calls.clear() }

    pub fn count<F> (&self, f: F)->usize where F: Fn(&RenderCall)->bool {
        self.calls.iter().filter( |c| f(c)).count()
    }

    pub fn n_added_segments (&self)->usize { self.count( |c| matches!(c, RenderCall::AddSegment{..})) }
    pub fn n_added_markers (&self)->usize { self.count( |c| matches!(c, RenderCall::AddMarker{..})) }
    pub fn n_removed (&self)->usize { self.count( |c| matches!(c, RenderCall::Remove{..})) }

    pub fn style_changes (&self)->Vec<StyleChange> {
        self.calls.iter().filter_map( |c| if let RenderCall::StyleMarker{change,..} = c { Some(*change) } else { None }).collect()
    }
}

impl RenderDispatcher for RecordingDispatcher {
    fn add_segment_visual (&mut self, icao24: &str, points: &LineString<f64>, style: TrailStyle)->VisualHandle {
        let visual = self.new_visual();
        self.calls.push( RenderCall::AddSegment{ icao24: icao24.to_string(), n_points: points.0.len(), style, visual });
        visual
    }

    fn add_marker (&mut self, icao24: &str, position: Coord<f64>, _style: &MarkerStyle)->VisualHandle {
        let visual = self.new_visual();
        self.calls.push( RenderCall::AddMarker{ icao24: icao24.to_string(), position, visual });
        visual
    }

    fn set_marker_geometry (&mut self, visual: VisualHandle, position: Coord<f64>) {
        self.calls.push( RenderCall::MoveMarker{ visual, position });
    }

    fn set_marker_style (&mut self, visual: VisualHandle, style: &MarkerStyle, change: StyleChange) {
        self.calls.push( RenderCall::StyleMarker{ visual, change, rotation: style.rotation });
    }

    fn set_leader_line (&mut self, leader: Option<VisualHandle>, icao24: &str, _from: Coord<f64>, to: Coord<f64>, _style: TrailStyle)->VisualHandle {
        let visual = match leader { Some(h) => h, None => self.new_visual() };
        self.calls.push( RenderCall::Leader{ icao24: icao24.to_string(), visual, to });
        visual
    }

    fn remove_visual (&mut self, visual: VisualHandle) {
        self.live.remove( &visual);
        self.calls.push( RenderCall::Remove{ visual });
    }

    fn refresh_selected_details (&mut self, icao24: &str) {
        self.calls.push( RenderCall::RefreshDetails{ icao24: icao24.to_string() });
    }
}
