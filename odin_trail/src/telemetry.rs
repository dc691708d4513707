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

/// the telemetry input as provided by dump1090 style receivers (`aircraft.json`). All fields
/// except the address are optional - missing fields keep the last known value

use std::{fmt, fs, path::Path};
use serde::{Serialize,Deserialize};
use crate::{altitude::AltitudeValue, errors::Result};

/// one aircraft record of a receiver snapshot
#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct AircraftData {
    pub hex: String, // ICAO 24bit address

    pub alt_baro: Option<AltitudeValue>,
    pub baro_rate: Option<f64>,     // ft/min
    pub gs: Option<f64>,            // knots
    pub track: Option<f64>,         // degrees

    pub lat: Option<f64>,
    pub lon: Option<f64>,

    pub flight: Option<String>,
    pub squawk: Option<String>,
    pub category: Option<String>,

    pub messages: Option<u64>,
    pub rssi: Option<f64>,

    #[serde(default)]
    pub seen: f64,                  // sec since last message
    pub seen_pos: Option<f64>,      // sec since last position

    #[serde(default)]
    pub mlat: Vec<String>,          // names of fields that were derived from multilateration
}

impl AircraftData {
    pub fn position (&self)->Option<(f64,f64)> {
        match (self.lon, self.lat) {
            (Some(lon),Some(lat)) => Some((lon,lat)),
            _ => None
        }
    }

    /// is the position derived from multilateration
    pub fn is_mlat_position (&self)->bool {
        self.mlat.iter().any( |f| f == "lat" || f == "lon")
    }
}

impl fmt::Display for AircraftData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "AircraftData( hex: {}", self.hex)?;
        if let Some(cs) = &self.flight { write!( f, ", flight: \"{}\"", cs.trim())?; }
        if let Some((lon,lat)) = self.position() { write!( f, ", pos: ({lon:.5},{lat:.5})")?; }
        if let Some(alt) = &self.alt_baro { write!( f, ", alt: {alt:?}")?; }
        if let Some(trk) = self.track { write!( f, ", trk: {trk:.0}")?; }
        if self.is_mlat_position() { write!( f, ", mlat")?; }
        write!( f, ", seen: {:.1})", self.seen)
    }
}

/// a complete receiver snapshot
#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct AircraftSnapshot {
    pub now: f64, // receiver time in epoch seconds
    #[serde(default)]
    pub messages: u64,
    #[serde(default)]
    pub aircraft: Vec<AircraftData>,
}

impl AircraftSnapshot {
    pub fn from_json (json: &str)->Result<Self> {
        Ok( serde_json::from_str(json)? )
    }

    pub fn from_file (path: impl AsRef<Path>)->Result<Self> {
        let json = fs::read_to_string( path.as_ref())?;
        Self::from_json( json.as_str())
    }
}
