/*
 * Copyright © 2025, CASAS (Center for the Analysis of Sustainable Agricultural Systems).
 * All rights reserved.
 *
 * The “casas_gis” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! configuration of the geographic locations we can map. These are loaded from `<location>.ron`
//! config files (see `configs/` for the known locations)

use std::path::PathBuf;
use serde::{Serialize,Deserialize};

use casas_build::deserialize_opt_expand_path;
use crate::render::LegendPolicy;

/// the GRASS database/location/mapset triple that defines a session
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct SessionConfig {
    #[serde(default, deserialize_with = "deserialize_opt_expand_path")]
    pub gisdb: Option<PathBuf>,
    pub location: String,
    pub mapset: String,
}

impl SessionConfig {
    pub fn new (gisdb: Option<PathBuf>, location: &str, mapset: &str)->Self {
        SessionConfig { gisdb, location: location.to_string(), mapset: mapset.to_string() }
    }

    /// the configured database, `$GISDBASE` or `~/grassdata` (in this order)
    pub fn gisdb (&self)->PathBuf {
        if let Some(gisdb) = &self.gisdb {
            gisdb.clone()
        } else if let Some(gisdb) = std::env::var_os("GISDBASE") {
            PathBuf::from( gisdb)
        } else {
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            home.join("grassdata")
        }
    }

    pub fn is_same_location (&self, other: &SessionConfig)->bool {
        self.location == other.location && self.gisdb() == other.gisdb()
    }
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct AdminDivisions {
    pub map_name: String,
    pub column: String,
    pub division_names: Vec<String>,
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct CropLayers {
    pub name: String,
    pub harvest_area_fraction: String,
}

/// the (pre-existing) map layers of the mapping location
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct MappingData {
    pub coastline: String,
    pub countries: String,
    pub target_region: String,
    pub admin_divisions: AdminDivisions,
    pub digital_elevation: String,
    pub shaded_relief: String,
    pub grey_shaded_relief: String,
    pub satellite_landuse: Option<String>,
    pub crop: Option<CropLayers>,
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct LegendSettings {
    pub font: String,
    pub font_size: u32,
    pub title_font_size: u32,
    pub text_color: String,
    pub background_color: String,
    pub tick_count: usize,
    #[serde(default)]
    pub policy: LegendPolicy,
}

impl Default for LegendSettings {
    fn default()->Self {
        LegendSettings {
            font: "Helvetica".to_string(),
            font_size: 10,
            title_font_size: 12,
            text_color: "black".to_string(),
            background_color: crate::NO_BG_COLOR.to_string(),
            tick_count: 5,
            policy: LegendPolicy::default(),
        }
    }
}

/// buffer and cell resolution (both in map units) of the computational region
#[derive(Debug,Clone,Copy,Serialize,Deserialize,PartialEq)]
pub struct RegionSettings {
    pub buffer: f64,
    pub resolution: f64,
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct LocationConfig {
    pub name: String,
    pub latlong_session: SessionConfig,
    pub mapping_session: SessionConfig,
    pub mapping_data: MappingData,
    #[serde(default)]
    pub legend_settings: LegendSettings,
    pub region_settings: RegionSettings,
}

impl LocationConfig {
    /// the configured subregion codes of the admin division layer
    pub fn division_names (&self)->&[String] {
        &self.mapping_data.admin_divisions.division_names
    }

    pub fn crop_layer (&self, crop: &str)->Option<&CropLayers> {
        self.mapping_data.crop.as_ref().filter(|c| c.name == crop)
    }
}
