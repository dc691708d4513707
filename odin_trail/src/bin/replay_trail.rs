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

use std::{path::PathBuf, sync::Arc};
use tokio;
use anyhow::Result;
use clap::Parser;
use chrono::{DateTime,Utc};
use geo::{Coord, LineString};
use tracing::{debug,info};
use tracing_subscriber::EnvFilter;
use odin_trail::{
    load_config, AircraftSnapshot, MarkerStyle, MetadataTable, RenderDispatcher, StyleChange,
    TrailConfig, TrailStore, TrailStyle, VisualHandle
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "replay recorded aircraft.json snapshots and report trail segments")]
pub struct Args {
    /// RON config file (defaults to built-in values)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// JSON file that maps ICAO addresses to {"r":registration,"t":type}
    #[arg(short,long)]
    pub metadata: Option<PathBuf>,

    /// ICAO address of the aircraft to select
    #[arg(short,long)]
    pub select: Option<String>,

    /// snapshot files in chronological order
    #[arg(num_args=1..)]
    pub snapshots: Vec<PathBuf>,
}

/// a RenderDispatcher that only logs what it is asked to draw
#[derive(Default)]
struct LogDispatcher {
    next_id: u64,
    n_visuals: usize,
}

impl LogDispatcher {
    fn next_handle (&mut self)->VisualHandle {
        self.next_id += 1;
        self.n_visuals += 1;
        VisualHandle(self.next_id)
    }
}

impl RenderDispatcher for LogDispatcher {
    fn add_segment_visual (&mut self, icao24: &str, points: &LineString<f64>, style: TrailStyle)->VisualHandle {
        let h = self.next_handle();
        debug!("{icao24}: add {style:?} segment {h} with {} points", points.0.len());
        h
    }

    fn add_marker (&mut self, icao24: &str, position: Coord<f64>, style: &MarkerStyle)->VisualHandle {
        let h = self.next_handle();
        debug!("{icao24}: add marker {h} at ({:.5},{:.5}) color {}", position.x, position.y, style.color);
        h
    }

    fn set_marker_geometry (&mut self, marker: VisualHandle, position: Coord<f64>) {
        debug!("move {marker} to ({:.5},{:.5})", position.x, position.y);
    }

    fn set_marker_style (&mut self, marker: VisualHandle, style: &MarkerStyle, change: StyleChange) {
        debug!("restyle {marker} ({change:?}): {} {} rot {:.0}", style.color, style.shape, style.rotation);
    }

    fn set_leader_line (&mut self, leader: Option<VisualHandle>, icao24: &str, _from: Coord<f64>, to: Coord<f64>, _style: TrailStyle)->VisualHandle {
        let h = match leader { Some(h) => h, None => self.next_handle() };
        debug!("{icao24}: leader line {h} to ({:.5},{:.5})", to.x, to.y);
        h
    }

    fn remove_visual (&mut self, visual: VisualHandle) {
        self.n_visuals = self.n_visuals.saturating_sub(1);
        debug!("remove {visual}");
    }

    fn refresh_selected_details (&mut self, icao24: &str) {
        info!("details of selected {icao24} changed");
    }
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let config: TrailConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => TrailConfig::default()
    };

    let mut store = TrailStore::new( config, LogDispatcher::default());
    if let Some(path) = &args.metadata {
        let table = MetadataTable::from_file( path)?;
        info!("loaded {} metadata entries", table.len());
        store = store.with_metadata_lookup( Arc::new(table));
    }

    let mut last_time = 0.0;
    for path in &args.snapshots {
        let snapshot = AircraftSnapshot::from_file( path)?;
        last_time = snapshot.now;

        let stats = store.ingest_snapshot( &snapshot);
        tokio::task::yield_now().await; // give pending metadata requests a chance to complete
        store.apply_metadata_updates();

        if let Some(icao24) = &args.select {
            if store.context().selected().is_none() { store.select( Some(icao24.as_str())); }
        }

        let date = DateTime::<Utc>::from_timestamp_millis( (snapshot.now * 1000.0) as i64).unwrap_or_default();
        info!("{date}: {} aircraft, tracked: {}, untracked: {}, hidden: {}", store.len(), stats.tracked, stats.untracked, stats.hidden);
    }

    store.remove_stale( last_time);

    for entity in store.entities() {
        println!("{entity}");
        for seg in entity.history().segments() {
            println!("    {seg}");
        }
    }
    println!("live visuals: {}", store.renderer().n_visuals);

    Ok(())
}
