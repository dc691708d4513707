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
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::foot};

/// barometric altitude as we get it from the receiver. ADS-B reports altitude in ft, surface
/// positions carry the "ground" sentinel instead of a number
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub enum Altitude {
    #[default]
    Unknown,
    Ground,
    Feet(i32),
}

impl Altitude {
    #[inline] pub fn is_ground (&self)->bool { matches!( self, Altitude::Ground) }
    #[inline] pub fn is_known (&self)->bool { !matches!( self, Altitude::Unknown) }

    pub fn feet (&self)->Option<i32> {
        if let Altitude::Feet(ft) = self { Some(*ft) } else { None }
    }

    pub fn length (&self)->Option<Length> {
        self.feet().map( |ft| Length::new::<foot>( ft as f64))
    }

    /// does the difference between `self` and `other` warrant a new track segment. This is the case if we
    /// switched between ground and air or if both are numeric and differ by at least `step` ft.
    /// Unknown altitudes count as "not on ground", i.e. they only cause a break after a ground segment
    pub fn is_step_from (&self, other: &Altitude, step: i32)->bool {
        if self.is_ground() != other.is_ground() { return true }

        match (self, other) {
            (Altitude::Feet(a), Altitude::Feet(b)) => (*a as i64 - *b as i64).abs() >= step as i64,
            _ => false
        }
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Altitude::Unknown => write!( f, "?"),
            Altitude::Ground => write!( f, "ground"),
            Altitude::Feet(ft) => write!( f, "{ft}ft"),
        }
    }
}

/// the wire format of the `alt_baro` field, which is either a number or a string such as "ground".
/// Anything that is neither numeric nor "ground" maps to `Altitude::Unknown`
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(untagged)]
pub enum AltitudeValue {
    Numeric(f64),
    Text(String),
}

impl From<&AltitudeValue> for Altitude {
    fn from (v: &AltitudeValue)->Self {
        match v {
            AltitudeValue::Numeric(ft) if ft.is_finite() => Altitude::Feet( ft.round() as i32),
            AltitudeValue::Text(s) if s == "ground" => Altitude::Ground,
            _ => Altitude::Unknown
        }
    }
}
