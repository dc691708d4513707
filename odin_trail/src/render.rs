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

use std::fmt;
use geo::{Coord, LineString};
use crate::color::MarkerColor;

/// opaque reference to a visual that is owned by a RenderDispatcher. We only keep it to update or remove the visual
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct VisualHandle(pub u64);

impl fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "visual#{}", self.0)
    }
}

/// line style of path visuals
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum TrailStyle {
    Air,
    Ground,
    Estimated, // dashed
}

/// everything a renderer needs to instantiate or update an aircraft icon
#[derive(Debug,Clone,PartialEq)]
pub struct MarkerStyle {
    pub color: MarkerColor,
    pub outline: String,
    pub shape: String,
    pub scale: f64,
    pub weight: f64,    // outline stroke width, already divided by scale
    pub rotation: f64,  // degrees
    pub opacity: f64,
}

/// what changed in a marker style since the last `set_marker_style` call
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum StyleChange {
    Icon,        // color, outline, shape or weight changed - icon has to be regenerated
    Orientation, // only rotation or opacity changed
}

/// the abstract interface to whatever draws our trails and markers. Implementors own the visuals,
/// we only hold handles and never read back visual state.
/// All positions are lon/lat degrees
pub trait RenderDispatcher {
    fn add_segment_visual (&mut self, icao24: &str, points: &LineString<f64>, style: TrailStyle)->VisualHandle;

    fn add_marker (&mut self, icao24: &str, position: Coord<f64>, style: &MarkerStyle)->VisualHandle;
    fn set_marker_geometry (&mut self, marker: VisualHandle, position: Coord<f64>);
    fn set_marker_style (&mut self, marker: VisualHandle, style: &MarkerStyle, change: StyleChange);

    /// create (if `leader` is None) or update the line from the last stored trail point to the current position
    fn set_leader_line (&mut self, leader: Option<VisualHandle>, icao24: &str, from: Coord<f64>, to: Coord<f64>, style: TrailStyle)->VisualHandle;

    fn remove_visual (&mut self, visual: VisualHandle);

    /// static data of the selected aircraft changed (e.g. after a metadata lookup completed)
    fn refresh_selected_details (&mut self, _icao24: &str) {}
}
