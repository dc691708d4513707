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

use std::{fmt, sync::Arc};
use geo::{Coord, Distance, Haversine, Point};
use uom::si::{f64::{Length,Velocity}, length::{meter,nautical_mile}, velocity::{foot_per_minute,knot}};
use tracing::debug;

use crate::{
    altitude::Altitude, color::{ColorModel, MarkerColor}, config::TrailConfig,
    metadata::AircraftMetadata,
    render::{MarkerStyle, RenderDispatcher, StyleChange, TrailStyle, VisualHandle},
    telemetry::AircraftData, track::{TrackHistory, TrackSample}
};

/// entities without any message for longer than this (sec) get hidden
pub const HIDE_AFTER: f64 = 58.0;
/// positions older than this (sec) are not shown unless the entity is selected
pub const POSITION_TIMEOUT: f64 = 60.0;

pub const MLAT_OPACITY: f64 = 0.75;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Visibility {
    Bootstrapping, // no telemetry yet
    Tracked,       // visible with a usable position
    Untracked,     // recent messages but no (recent) position
    Hidden,        // no messages for more than HIDE_AFTER
}

/// process wide state that is shared between entities, i.e. the currently selected aircraft and the
/// receiver site. This is passed explicitly into entity updates
#[derive(Debug,Clone,Default)]
pub struct TrailContext {
    selected: Option<Arc<String>>,
    pub site: Option<Coord<f64>>,
}

impl TrailContext {
    pub fn new (site: Option<Coord<f64>>)->Self {
        TrailContext { selected: None, site }
    }

    pub fn selected (&self)->Option<&str> { self.selected.as_ref().map( |s| s.as_str()) }
    pub fn is_selected (&self, icao24: &str)->bool { self.selected() == Some(icao24) }

    pub fn set_selected (&mut self, icao24: Option<Arc<String>>) { self.selected = icao24 }
    pub fn clear_selection (&mut self) { self.selected = None }
}

/// the static inputs for marker appearance (config plus derived color model)
#[derive(Debug,Clone)]
pub struct Appearance {
    pub config: TrailConfig,
    pub colors: ColorModel,
}

impl Appearance {
    pub fn new (config: TrailConfig)->Self {
        let colors = ColorModel::new( &config);
        Appearance { config, colors }
    }
}

impl Default for Appearance {
    fn default()->Self { Appearance::new( TrailConfig::default()) }
}

/// cached marker style plus the keys we use to detect relevant changes
#[derive(Debug,Clone,PartialEq)]
pub struct EntityVisualState {
    pub svg_key: String,   // color, outline, shape, weight
    pub style_key: String, // opacity, rotation
    pub style: MarkerStyle,
}

/// the state of a single tracked aircraft
#[derive(Debug)]
pub struct EntityState {
    pub icao24: Arc<String>,

    pub flight: Option<String>,
    pub squawk: Option<String>,
    pub category: Option<String>,
    pub registration: Option<String>,
    pub icao_type: Option<String>,

    pub altitude: Altitude,
    pub vertical_rate: Option<Velocity>,
    pub groundspeed: Option<Velocity>,
    pub track: Option<f64>, // heading in degrees
    pub position: Option<Coord<f64>>,
    pub from_mlat: bool,
    pub site_dist: Option<Length>,

    pub messages: Option<u64>,
    pub rssi: Option<f64>,

    pub last_message_time: Option<f64>,  // receiver time (sec)
    pub last_position_time: Option<f64>,
    pub seen: Option<f64>,               // sec since last message, updated by tick
    pub seen_pos: Option<f64>,           // sec since last position, updated by tick

    selected: bool,
    visibility: Visibility,
    history: TrackHistory,

    marker: Option<VisualHandle>,
    leader: Option<VisualHandle>,
    visual_state: Option<EntityVisualState>,
}

impl EntityState {
    pub fn new (icao24: impl Into<Arc<String>>)->Self {
        EntityState {
            icao24: icao24.into(),
            flight: None,
            squawk: None,
            category: None,
            registration: None,
            icao_type: None,
            altitude: Altitude::Unknown,
            vertical_rate: None,
            groundspeed: None,
            track: None,
            position: None,
            from_mlat: false,
            site_dist: None,
            messages: None,
            rssi: None,
            last_message_time: None,
            last_position_time: None,
            seen: None,
            seen_pos: None,
            selected: false,
            visibility: Visibility::Bootstrapping,
            history: TrackHistory::new(),
            marker: None,
            leader: None,
            visual_state: None,
        }
    }

    pub fn is_selected (&self)->bool { self.selected }
    pub fn visibility (&self)->Visibility { self.visibility }
    pub fn is_visible (&self)->bool { matches!( self.visibility, Visibility::Tracked | Visibility::Untracked) }
    pub fn history (&self)->&TrackHistory { &self.history }
    pub fn marker (&self)->Option<VisualHandle> { self.marker }
    pub fn leader (&self)->Option<VisualHandle> { self.leader }
    pub fn visual_state (&self)->Option<&EntityVisualState> { self.visual_state.as_ref() }

    /// merge a telemetry record received at `receiver_time`. Fields that are not set in `data` keep their values
    pub fn update_data (&mut self, receiver_time: f64, data: &AircraftData, ctx: &TrailContext) {
        if data.messages.is_some() { self.messages = data.messages }
        if data.rssi.is_some() { self.rssi = data.rssi }
        self.last_message_time = Some( receiver_time - data.seen);

        if let Some(alt) = &data.alt_baro { self.altitude = Altitude::from(alt) }
        if let Some(vr) = data.baro_rate { self.vertical_rate = Some( Velocity::new::<foot_per_minute>(vr)) }
        if let Some(gs) = data.gs { self.groundspeed = Some( Velocity::new::<knot>(gs)) }
        if let Some(trk) = data.track { self.track = Some(trk) }

        if let Some((lon,lat)) = data.position() {
            let pos = Coord{ x: lon, y: lat };
            self.position = Some(pos);
            self.last_position_time = Some( receiver_time - data.seen_pos.unwrap_or(0.0));

            if let Some(site) = ctx.site {
                let dist = Haversine.distance( Point::from(site), Point::from(pos));
                self.site_dist = Some( Length::new::<meter>(dist));
            }

            self.from_mlat = data.is_mlat_position();
        }

        if let Some(flight) = &data.flight { self.flight = Some( flight.clone()) }
        if let Some(squawk) = &data.squawk { self.squawk = Some( squawk.clone()) }
        if let Some(category) = &data.category { self.category = Some( category.clone()) }
    }

    /// the completion of an async metadata request. Returns true if the entity is selected, i.e. the
    /// caller should refresh the details display
    pub fn apply_metadata (&mut self, metadata: &AircraftMetadata)->bool {
        if metadata.registration.is_some() { self.registration = metadata.registration.clone() }
        if metadata.icao_type.is_some() { self.icao_type = metadata.icao_type.clone() }
        self.selected
    }

    /// the periodic update. This recomputes message ages, visibility, the track history and visuals.
    /// `last_batch_time` is the receiver time of the previous data batch
    pub fn update_tick<R> (&mut self, receiver_time: f64, last_batch_time: f64, ctx: &mut TrailContext, app: &Appearance, renderer: &mut R)->Visibility
        where R: RenderDispatcher + ?Sized
    {
        let Some(last_message_time) = self.last_message_time else { return self.visibility };

        let seen = receiver_time - last_message_time;
        self.seen = Some(seen);
        self.seen_pos = self.last_position_time.map( |t| receiver_time - t);

        if seen > HIDE_AFTER {
            if self.visibility != Visibility::Hidden {
                debug!("hiding {}", self.icao24);
                self.clear_marker( renderer);
                self.clear_lines( renderer);
                self.visibility = Visibility::Hidden;

                if ctx.is_selected( self.icao24.as_str()) {
                    ctx.clear_selection();
                    self.selected = false;
                }
            }

        } else {
            match self.track_sample() {
                Some(sample) if self.selected || self.seen_pos.is_some_and( |dt| dt < POSITION_TIMEOUT) => {
                    self.visibility = Visibility::Tracked;
                    if self.history.update( &sample, receiver_time, last_batch_time) {
                        self.update_lines( renderer);
                        self.update_marker( true, app, renderer);
                    } else {
                        self.update_marker( false, app, renderer);
                    }
                }
                _ => {
                    self.visibility = Visibility::Untracked;
                    self.clear_marker( renderer);
                }
            }
        }

        self.visibility
    }

    fn track_sample (&self)->Option<TrackSample> {
        let position = self.position?;
        let position_time = self.last_position_time?;
        Some( TrackSample { position, altitude: self.altitude, heading: self.track, position_time, from_mlat: self.from_mlat })
    }

    /// change selection state. Deselecting removes the trail visuals, selecting draws them right away
    pub fn set_selected<R> (&mut self, selected: bool, renderer: &mut R) where R: RenderDispatcher + ?Sized {
        if selected == self.selected { return }
        self.selected = selected;

        if selected {
            self.update_lines( renderer);
        } else {
            self.clear_lines( renderer);
        }
    }

    pub fn marker_color (&self, app: &Appearance)->MarkerColor {
        app.colors.color_for( self.altitude, self.seen_pos, self.selected, self.from_mlat, self.squawk.as_deref())
    }

    /// compute the current marker style and push it to the marker if anything visually relevant changed
    pub fn update_icon<R> (&mut self, app: &Appearance, renderer: &mut R)->MarkerStyle where R: RenderDispatcher + ?Sized {
        let color = self.marker_color( app);
        let outline = if self.from_mlat { &app.config.outline_mlat } else { &app.config.outline_adsb };
        let opacity = if self.from_mlat { MLAT_OPACITY } else { 1.0 };
        let base = app.config.base_marker( self.category.as_deref(), self.icao_type.as_deref());
        let weight = (((if self.selected { 2.0 } else { 1.0 }) / base.scale) * 10.0).round() / 10.0;
        let rotation = self.track.unwrap_or(0.0);

        let svg_key = format!("{}!{}!{}!{:.1}", color, outline, base.key, weight);
        let style_key = format!("{}!{}", opacity, rotation);

        let style = MarkerStyle {
            color,
            outline: outline.clone(),
            shape: base.key.clone(),
            scale: base.scale,
            weight,
            rotation,
            opacity,
        };

        let change = match &self.visual_state {
            None => Some(StyleChange::Icon),
            Some(vs) if vs.svg_key != svg_key => Some(StyleChange::Icon),
            Some(vs) if vs.style_key != style_key => Some(StyleChange::Orientation),
            _ => None
        };

        if let Some(change) = change {
            if let Some(marker) = self.marker {
                renderer.set_marker_style( marker, &style, change);
            }
            self.visual_state = Some( EntityVisualState{ svg_key, style_key, style: style.clone() });
        }
        style
    }

    /// create or move the marker. `moved` indicates if the position changed since the last call
    pub fn update_marker<R> (&mut self, moved: bool, app: &Appearance, renderer: &mut R) where R: RenderDispatcher + ?Sized {
        let Some(pos) = self.position.filter( |_| self.is_visible()) else {
            self.clear_marker( renderer);
            return
        };

        let style = self.update_icon( app, renderer);
        match self.marker {
            Some(marker) => if moved { renderer.set_marker_geometry( marker, pos) }
            None => self.marker = Some( renderer.add_marker( self.icao24.as_str(), pos, &style))
        }
    }

    pub fn clear_marker<R> (&mut self, renderer: &mut R) where R: RenderDispatcher + ?Sized {
        if let Some(marker) = self.marker.take() {
            renderer.remove_visual( marker);
        }
        self.visual_state = None;
    }

    /// draw missing or outdated trail visuals. Trails are only shown for the selected entity
    pub fn update_lines<R> (&mut self, renderer: &mut R) where R: RenderDispatcher + ?Sized {
        if !self.selected { return }
        let Some(pos) = self.position else { return };
        let Some(last_point) = self.history.last_segment().and_then( |seg| seg.last_point()) else { return };

        let icao24 = self.icao24.as_str();
        let leader_style = if self.altitude.is_ground() { TrailStyle::Ground } else { TrailStyle::Air };
        self.leader = Some( renderer.set_leader_line( self.leader, icao24, last_point, pos, leader_style));

        for seg in self.history.segments_mut() {
            if seg.is_drawn() { continue }

            if let Some(visual) = seg.take_visual() { // it grew since we last drew it
                renderer.remove_visual( visual);
            }
            let style = if seg.is_estimated() {
                TrailStyle::Estimated
            } else if seg.is_ground() {
                TrailStyle::Ground
            } else {
                TrailStyle::Air
            };
            let visual = renderer.add_segment_visual( icao24, seg.points(), style);
            seg.set_visual( visual);
        }
    }

    pub fn clear_lines<R> (&mut self, renderer: &mut R) where R: RenderDispatcher + ?Sized {
        for seg in self.history.segments_mut().iter_mut().rev() {
            if let Some(visual) = seg.take_visual() {
                renderer.remove_visual( visual);
            }
        }
        if let Some(leader) = self.leader.take() {
            renderer.remove_visual( leader);
        }
    }

    /// remove all visuals of this entity. The track history itself is kept
    pub fn destroy<R> (&mut self, renderer: &mut R) where R: RenderDispatcher + ?Sized {
        self.clear_lines( renderer);
        self.clear_marker( renderer);
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "EntityState( icao24: {}", self.icao24)?;
        if let Some(cs) = &self.flight { write!( f, ", flight: \"{}\"", cs.trim())?; }
        if let Some(reg) = &self.registration { write!( f, ", reg: {reg}")?; }
        if let Some(p) = self.position { write!( f, ", pos: ({:.5},{:.5})", p.x, p.y)?; }
        write!( f, ", alt: {}", self.altitude)?;
        if let Some(trk) = self.track { write!( f, ", trk: {trk:.0}")?; }
        if let Some(gs) = self.groundspeed { write!( f, ", spd: {:.0}", gs.get::<knot>())?; }
        if let Some(d) = self.site_dist { write!( f, ", dist: {:.1}nm", d.get::<nautical_mile>())?; }
        write!( f, ", segments: {}, points: {}, {:?})", self.history.segments().len(), self.history.history_size(), self.visibility)
    }
}
