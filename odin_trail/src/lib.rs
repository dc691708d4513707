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

//! visual track history and marker appearance of tracked aircraft.
//!
//! Telemetry records (`telemetry`) are merged into per-aircraft `EntityState`s, which on each tick
//! feed their positions into a `TrackHistory` of solid/estimated/ground path segments and compute
//! altitude based marker colors (`color`). Drawing is delegated to an injected `RenderDispatcher`.

pub mod errors;
pub mod config;
pub mod altitude;
pub mod color;
pub mod track;
pub mod render;
pub mod metadata;
pub mod telemetry;
pub mod entity;
pub mod store;

pub use config::{load_config, TrailConfig};
pub use altitude::Altitude;
pub use color::{ColorModel, HslColor, MarkerColor};
pub use track::{PathSegment, TrackHistory, TrackSample};
pub use render::{MarkerStyle, RenderDispatcher, StyleChange, TrailStyle, VisualHandle};
pub use metadata::{AircraftMetadata, MetadataLookup, MetadataTable};
pub use telemetry::{AircraftData, AircraftSnapshot};
pub use entity::{Appearance, EntityState, TrailContext, Visibility};
pub use store::{TickStats, TrailStore};
