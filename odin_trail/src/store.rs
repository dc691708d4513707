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

use std::{collections::HashMap, sync::Arc, time::Duration};
use geo::Coord;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug,info};

use crate::{
    config::TrailConfig,
    entity::{Appearance, EntityState, TrailContext, Visibility},
    metadata::{spawn_metadata_request, MetadataLookup, MetadataUpdate},
    render::RenderDispatcher,
    telemetry::{AircraftData, AircraftSnapshot},
};

/// summary of a store tick
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct TickStats {
    pub tracked: usize,
    pub untracked: usize,
    pub hidden: usize,
}

/// the owner of all entity states. This is where telemetry ingestion, periodic ticks, selection and
/// metadata completions get serialized, i.e. no entity is ever updated concurrently.
/// The RenderDispatcher is injected at construction and passed down into entity updates
pub struct TrailStore<R> where R: RenderDispatcher {
    appearance: Appearance,
    ctx: TrailContext,
    renderer: R,
    drop_after: Duration,

    entities: HashMap<String,EntityState>,
    dropped_list: Vec<Arc<String>>, // entities removed in last remove_stale()

    last_batch_time: Option<f64>, // receiver time of previous tick

    lookup: Option<Arc<dyn MetadataLookup>>,
    metadata_tx: UnboundedSender<MetadataUpdate>,
    metadata_rx: UnboundedReceiver<MetadataUpdate>,
}

impl<R> TrailStore<R> where R: RenderDispatcher {
    pub fn new (config: TrailConfig, renderer: R)->Self {
        let site = config.site.map( |s| Coord{ x: s.lon, y: s.lat });
        let drop_after = config.drop_after;
        let (metadata_tx, metadata_rx) = mpsc::unbounded_channel();

        TrailStore {
            appearance: Appearance::new( config),
            ctx: TrailContext::new( site),
            renderer,
            drop_after,
            entities: HashMap::new(),
            dropped_list: Vec::new(),
            last_batch_time: None,
            lookup: None,
            metadata_tx,
            metadata_rx,
        }
    }

    /// request static aircraft data for every new entity from `lookup`
    pub fn with_metadata_lookup (mut self, lookup: Arc<dyn MetadataLookup>)->Self {
        self.lookup = Some(lookup);
        self
    }

    // the external accessors
    pub fn renderer (&self)->&R { &self.renderer }
    pub fn renderer_mut (&mut self)->&mut R { &mut self.renderer }
    pub fn context (&self)->&TrailContext { &self.ctx }
    pub fn appearance (&self)->&Appearance { &self.appearance }

    pub fn entity (&self, icao24: &str)->Option<&EntityState> { self.entities.get(icao24) }
    pub fn entities (&self)->impl Iterator<Item=&EntityState> { self.entities.values() }
    pub fn len (&self)->usize { self.entities.len() }
    pub fn is_empty (&self)->bool { self.entities.is_empty() }

    pub fn dropped_list (&self)->&[Arc<String>] { self.dropped_list.as_slice() }

    /// merge a single telemetry record. Creates (and requests metadata for) entities we haven't seen yet
    pub fn update_data (&mut self, receiver_time: f64, data: &AircraftData) {
        let icao24 = data.hex.to_lowercase();

        if !self.entities.contains_key( icao24.as_str()) {
            let entity = EntityState::new( icao24.clone());
            if let Some(lookup) = &self.lookup {
                spawn_metadata_request( lookup.clone(), entity.icao24.clone(), self.metadata_tx.clone());
            }
            debug!("new entity {}", icao24);
            self.entities.insert( icao24.clone(), entity);
        }

        if let Some(entity) = self.entities.get_mut( icao24.as_str()) {
            entity.update_data( receiver_time, data, &self.ctx);
        }
    }

    /// run the periodic update of all entities for the given receiver time
    pub fn tick (&mut self, receiver_time: f64)->TickStats {
        let last_batch_time = self.last_batch_time.unwrap_or( receiver_time);
        let mut stats = TickStats::default();

        for entity in self.entities.values_mut() {
            match entity.update_tick( receiver_time, last_batch_time, &mut self.ctx, &self.appearance, &mut self.renderer) {
                Visibility::Tracked => stats.tracked += 1,
                Visibility::Untracked => stats.untracked += 1,
                Visibility::Hidden => stats.hidden += 1,
                Visibility::Bootstrapping => {}
            }
        }

        self.last_batch_time = Some(receiver_time);
        stats
    }

    /// merge all records of a receiver snapshot and then run a tick with the snapshot time
    pub fn ingest_snapshot (&mut self, snapshot: &AircraftSnapshot)->TickStats {
        for data in &snapshot.aircraft {
            self.update_data( snapshot.now, data);
        }
        self.tick( snapshot.now)
    }

    /// apply all metadata lookups that have completed since the last call. Returns the number of updated entities
    pub fn apply_metadata_updates (&mut self)->usize {
        let mut n = 0;
        while let Ok(update) = self.metadata_rx.try_recv() {
            n += self.apply_metadata( &update) as usize;
        }
        n
    }

    /// apply a single metadata completion. Late or duplicate completions just overwrite the same fields
    pub fn apply_metadata (&mut self, update: &MetadataUpdate)->bool {
        if let Some(entity) = self.entities.get_mut( update.icao24.as_str()) {
            if entity.apply_metadata( &update.metadata) {
                self.renderer.refresh_selected_details( update.icao24.as_str());
            }
            true
        } else {
            false // entity already removed
        }
    }

    /// change the selected entity. Returns false if there is no entity for the given address
    pub fn select (&mut self, icao24: Option<&str>)->bool {
        if let Some(prev) = self.ctx.selected().map( |s| s.to_string()) {
            if let Some(entity) = self.entities.get_mut( prev.as_str()) {
                entity.set_selected( false, &mut self.renderer);
            }
        }
        self.ctx.clear_selection();

        match icao24.map( |s| s.to_lowercase()) {
            Some(icao24) => match self.entities.get_mut( icao24.as_str()) {
                Some(entity) => {
                    entity.set_selected( true, &mut self.renderer);
                    self.ctx.set_selected( Some( entity.icao24.clone()));
                    true
                }
                None => false
            }
            None => true
        }
    }

    /// remove entities for which we didn't get any message within the configured `drop_after` duration.
    /// Their visuals get removed and the addresses end up in the `dropped_list`
    pub fn remove_stale (&mut self, receiver_time: f64)->usize {
        let max_age = self.drop_after.as_secs_f64();

        self.dropped_list.clear();
        for entity in self.entities.values() {
            let is_stale = entity.last_message_time.is_none_or( |t| receiver_time - t > max_age);
            if is_stale {
                self.dropped_list.push( entity.icao24.clone());
            }
        }

        for icao24 in &self.dropped_list {
            if let Some(mut entity) = self.entities.remove( icao24.as_str()) {
                entity.destroy( &mut self.renderer);
                if self.ctx.is_selected( icao24.as_str()) {
                    self.ctx.clear_selection();
                }
            }
        }

        if !self.dropped_list.is_empty() {
            info!("dropped {} stale entities", self.dropped_list.len());
        }
        self.dropped_list.len()
    }
}
