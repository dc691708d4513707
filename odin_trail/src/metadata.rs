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

use std::{collections::HashMap, fs, path::Path, sync::Arc};
use async_trait::async_trait;
use serde::{Serialize,Deserialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug,warn};
use crate::errors::{metadata_error, OdinTrailError, Result};

/// static aircraft data that does not come with ADS-B messages
#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct AircraftMetadata {
    #[serde(rename="r", default)]
    pub registration: Option<String>,
    #[serde(rename="t", default)]
    pub icao_type: Option<String>,
}

/// completion of a metadata request as it is sent back to the store
#[derive(Debug,Clone)]
pub struct MetadataUpdate {
    pub icao24: Arc<String>,
    pub metadata: AircraftMetadata,
}

/// the external (async) lookup of static aircraft data by ICAO 24bit address
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup (&self, icao24: &str)->Result<AircraftMetadata>;
}

/// a simple in-memory lookup table, e.g. loaded from a JSON object that maps hex addresses to `{"r":..,"t":..}`
#[derive(Debug,Clone,Default)]
pub struct MetadataTable {
    entries: HashMap<String,AircraftMetadata>,
}

impl MetadataTable {
    pub fn new (entries: HashMap<String,AircraftMetadata>)->Self {
        let entries = entries.into_iter().map( |(k,v)| (k.to_lowercase(), v)).collect();
        MetadataTable { entries }
    }

    pub fn from_json (json: &str)->Result<Self> {
        let entries: HashMap<String,AircraftMetadata> = serde_json::from_str(json)?;
        Ok( Self::new(entries) )
    }

    pub fn from_file (path: impl AsRef<Path>)->Result<Self> {
        let json = fs::read_to_string( path.as_ref())?;
        Self::from_json( json.as_str())
    }

    pub fn len (&self)->usize { self.entries.len() }
}

#[async_trait]
impl MetadataLookup for MetadataTable {
    async fn lookup (&self, icao24: &str)->Result<AircraftMetadata> {
        self.entries.get( icao24.to_lowercase().as_str())
            .cloned()
            .ok_or_else( || metadata_error!("no entry for {}", icao24))
    }
}

/// fire-and-forget metadata request. The completion is sent to `tx`, it never touches entity state directly.
/// Returns false if there is no tokio runtime to run the request in
pub fn spawn_metadata_request (lookup: Arc<dyn MetadataLookup>, icao24: Arc<String>, tx: UnboundedSender<MetadataUpdate>)->bool {
    match tokio::runtime::Handle::try_current() {
        Ok(rt) => {
            rt.spawn( async move {
                match lookup.lookup( icao24.as_str()).await {
                    Ok(metadata) => {
                        // receiver might be gone if the store was dropped - nothing to do then
                        let _ = tx.send( MetadataUpdate{ icao24, metadata });
                    }
                    Err(e) => debug!("metadata lookup for {} failed: {}", icao24, e)
                }
            });
            true
        }
        Err(_) => {
            warn!("no async runtime, skipping metadata request for {}", icao24);
            false
        }
    }
}
