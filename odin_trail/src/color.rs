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

/// altitude based marker colors. This is a pure mapping from (altitude, staleness, selection, mlat, squawk)
/// to a quantized HSL color, with emergency squawks overriding everything else

use std::{collections::HashMap, fmt};
use crate::{altitude::Altitude, config::{ColorConfig, Hsl, HuePoint, TrailConfig}};

/// positions older than this (in sec) get the stale color adjustment
pub const STALE_COLOR_AGE: f64 = 15.0;

const QUANTUM: f64 = 5.0;
const MIN_SL: f64 = 5.0;
const MAX_SL: f64 = 95.0;

/// a HSL color with components rounded to multiples of 5. h is in [0,360), s and l are percentages in [5,95]
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct HslColor { pub h: u16, pub s: u8, pub l: u8 }

impl HslColor {
    /// wrap/clamp and quantize raw components
    pub fn quantized (h: f64, s: f64, l: f64)->Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp( MIN_SL, MAX_SL);
        let l = l.clamp( MIN_SL, MAX_SL);

        let h = quantize(h) % 360; // 357.5 and above would round up to 360
        HslColor { h: h as u16, s: quantize(s) as u8, l: quantize(l) as u8 }
    }
}

#[inline]
fn quantize (v: f64)->u32 {
    ((v / QUANTUM).round() * QUANTUM) as u32
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "hsl({},{}%,{}%)", self.h, self.s, self.l)
    }
}

#[derive(Debug,Clone,PartialEq,Eq,Hash)]
pub enum MarkerColor {
    Hsl(HslColor),
    Fixed(String), // emergency squawk override, taken verbatim from the config
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerColor::Hsl(c) => write!( f, "{c}"),
            MarkerColor::Fixed(s) => write!( f, "{s}"),
        }
    }
}

#[derive(Debug,Clone)]
pub struct ColorModel {
    colors: ColorConfig,
    squawk_colors: HashMap<String,String>,
}

impl ColorModel {
    pub fn new (config: &TrailConfig)->Self {
        let mut colors = config.colors.clone();
        colors.air.h.sort_by_key( |p| p.alt);

        let squawk_colors = config.special_squawks.iter()
            .map( |(code,sq)| (code.clone(), sq.marker_color.clone()))
            .collect();

        ColorModel { colors, squawk_colors }
    }

    /// the marker color for the given state. Never fails and has no hidden state, i.e. same input
    /// always produces the same output
    pub fn color_for (&self, altitude: Altitude, seen_pos: Option<f64>, selected: bool, from_mlat: bool, squawk: Option<&str>)->MarkerColor {
        if let Some(color) = squawk.and_then( |sq| self.squawk_colors.get(sq)) {
            return MarkerColor::Fixed( color.clone())
        }

        let c = &self.colors;
        let (mut h, mut s, mut l) = match altitude {
            Altitude::Unknown => (c.unknown.h, c.unknown.s, c.unknown.l),
            Altitude::Ground => (c.ground.h, c.ground.s, c.ground.l),
            Altitude::Feet(ft) => (self.altitude_hue(ft), c.air.s, c.air.l)
        };

        let mut adjust = |d: &Hsl| { h += d.h; s += d.s; l += d.l; };

        if seen_pos.is_some_and( |dt| dt > STALE_COLOR_AGE) { adjust( &c.stale) }
        if selected { adjust( &c.selected) }
        if from_mlat { adjust( &c.mlat) }

        MarkerColor::Hsl( HslColor::quantized( h, s, l))
    }

    /// linear hue interpolation between the two control points bracketing `alt`. Altitudes outside
    /// of the table range get the hue of the nearest control point
    pub fn altitude_hue (&self, alt: i32)->f64 {
        let pts: &[HuePoint] = &self.colors.air.h;
        if pts.is_empty() { return self.colors.unknown.h }

        match pts.iter().rposition( |p| alt > p.alt) {
            None => pts[0].val,
            Some(i) if i == pts.len()-1 => pts[i].val,
            Some(i) => {
                let (p0,p1) = (&pts[i], &pts[i+1]);
                p0.val + (p1.val - p0.val) * (alt - p0.alt) as f64 / (p1.alt - p0.alt) as f64
            }
        }
    }
}
