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

use std::{collections::HashMap, fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};
use crate::errors::Result;

/// load a RON config from the given path. Unlike the ODIN resource lookup this only reads from the filesystem
pub fn load_config<C> (path: impl AsRef<Path>)->Result<C> where C: for<'a> Deserialize<'a> {
    let src = fs::read_to_string( path.as_ref())?;
    Ok( ron::from_str( src.as_str())? )
}

/// hue/saturation/lightness triple. Used both as absolute color and as additive adjustment
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct Hsl { pub h: f64, pub s: f64, pub l: f64 }

impl Hsl {
    pub const fn new (h: f64, s: f64, l: f64)->Self { Hsl{h,s,l} }
}

/// control point of the airborne altitude->hue table
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct HuePoint { pub alt: i32, pub val: f64 }

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct AirColors {
    pub h: Vec<HuePoint>, // interpolated over altitude
    pub s: f64,
    pub l: f64,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ColorConfig {
    pub unknown: Hsl,
    pub ground: Hsl,
    pub air: AirColors,

    // additive adjustments
    pub stale: Hsl,
    pub selected: Hsl,
    pub mlat: Hsl,
}

impl Default for ColorConfig {
    fn default()->Self {
        ColorConfig {
            unknown: Hsl::new( 0.0, 0.0, 40.0),
            ground: Hsl::new( 15.0, 80.0, 20.0),
            air: AirColors {
                h: vec![
                    HuePoint{ alt: 2000, val: 20.0 },
                    HuePoint{ alt: 10000, val: 140.0 },
                    HuePoint{ alt: 40000, val: 300.0 },
                ],
                s: 85.0,
                l: 50.0,
            },
            stale: Hsl::new( 0.0, -10.0, 30.0),
            selected: Hsl::new( 0.0, -10.0, 20.0),
            mlat: Hsl::new( 0.0, -10.0, -10.0),
        }
    }
}

/// transponder codes that override the altitude color
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct SpecialSquawk {
    pub marker_color: String,
    pub text: String,
}

/// the base shape of an aircraft marker. We only need the key and scale here, the actual shape
/// is up to the RenderDispatcher
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct MarkerShape {
    pub key: String,
    pub scale: f64,
    #[serde(default)]
    pub categories: Vec<String>, // emitter categories such as "A3"
    #[serde(default)]
    pub types: Vec<String>,      // ICAO type designators such as "B738", take precedence over categories
}

impl MarkerShape {
    fn new (key: &str, scale: f64, categories: &[&str], types: &[&str])->Self {
        MarkerShape {
            key: key.to_string(),
            scale,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            types: types.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct SitePosition { pub lon: f64, pub lat: f64 }

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TrailConfig {
    pub colors: ColorConfig,
    pub special_squawks: HashMap<String,SpecialSquawk>,
    pub outline_adsb: String,
    pub outline_mlat: String,
    pub markers: Vec<MarkerShape>,
    pub default_marker: MarkerShape,
    pub drop_after: Duration, // entities without any message for that long are removed from the store
    #[serde(default)]
    pub site: Option<SitePosition>, // receiver location, used to compute site distance
}

impl TrailConfig {
    /// find the base marker for given type designator and emitter category
    pub fn base_marker (&self, category: Option<&str>, icao_type: Option<&str>)->&MarkerShape {
        if let Some(t) = icao_type {
            if let Some(m) = self.markers.iter().find( |m| m.types.iter().any(|mt| mt == t)) { return m }
        }
        if let Some(c) = category {
            if let Some(m) = self.markers.iter().find( |m| m.categories.iter().any(|mc| mc == c)) { return m }
        }
        &self.default_marker
    }

    pub fn special_squawk (&self, squawk: Option<&str>)->Option<&SpecialSquawk> {
        squawk.and_then( |sq| self.special_squawks.get(sq))
    }
}

impl Default for TrailConfig {
    fn default()->Self {
        let mut special_squawks = HashMap::new();
        special_squawks.insert( "7500".to_string(), SpecialSquawk{ marker_color: "rgb(255, 85, 85)".to_string(), text: "Aircraft Hijacking".to_string() });
        special_squawks.insert( "7600".to_string(), SpecialSquawk{ marker_color: "rgb(0, 255, 255)".to_string(), text: "Radio Failure".to_string() });
        special_squawks.insert( "7700".to_string(), SpecialSquawk{ marker_color: "rgb(255, 255, 0)".to_string(), text: "General Emergency".to_string() });

        TrailConfig {
            colors: ColorConfig::default(),
            special_squawks,
            outline_adsb: "#000000".to_string(),
            outline_mlat: "#4040FF".to_string(),
            markers: vec![
                MarkerShape::new( "cessna", 1.0, &["A1","B1","B4"], &["C172","C182","PA28","SR22"]),
                MarkerShape::new( "jet_nonswept", 0.9, &["A2"], &[]),
                MarkerShape::new( "airliner", 0.9, &["A3"], &["A320","A321","B737","B738","B739"]),
                MarkerShape::new( "heavy_2e", 1.0, &["A4","A5"], &["B772","B77W","B788","B789","A332","A333","A359"]),
                MarkerShape::new( "helicopter", 1.0, &["A7"], &["EC35","EC45","AS50","R44"]),
                MarkerShape::new( "balloon", 1.0, &["B2"], &[]),
                MarkerShape::new( "ground_vehicle", 0.8, &["C1","C2","C3"], &[]),
            ],
            default_marker: MarkerShape::new( "unknown", 1.0, &[], &[]),
            drop_after: Duration::from_secs(300),
            site: None,
        }
    }
}
