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

//! map rendering into PNG (display monitor) and PostScript (ps.map) files

use std::path::{Path,PathBuf};
use serde::{Serialize,Deserialize};
use strum::{EnumString,Display,AsRefStr};
use tracing::{info,error};

use crate::grass::GrassEngine;
use crate::session::Session;
use crate::region::RegionInfo;
use crate::locations::{LegendSettings,MappingData};
use crate::interpolation::{SurfaceRange,SurfaceStats};
use crate::errors::{CasasGisError,Result};
use crate::{SELECTED_PREFIX,IDW_PREFIX,BSPLINE_PREFIX,strip_mapset};

pub mod png;
pub mod postscript;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,EnumString,Display,AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType { Png, Ps, Eps, Pdf, Svg }

impl FileType {
    pub fn is_supported (&self)->bool {
        matches!( self, FileType::Png | FileType::Ps)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum LegendPosition { Bottom, Right }

/// where to put the legend. Wide maps (`cols >= rows * ratio_threshold`) get it at the bottom,
/// tall maps on the right
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct LegendPolicy {
    pub ratio_threshold: f64,
}

impl Default for LegendPolicy {
    fn default()->Self { LegendPolicy { ratio_threshold: 1.0 } }
}

impl LegendPolicy {
    pub fn position (&self, rows: usize, cols: usize)->LegendPosition {
        if cols as f64 >= rows as f64 * self.ratio_threshold { LegendPosition::Bottom } else { LegendPosition::Right }
    }
}

/// value range shown in the legend
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum LegendRange {
    PerMap,
    Global,
    Fixed(f64,f64),
}

impl LegendRange {
    pub fn resolve (&self, surface: &SurfaceStats, all: &SurfaceRange)->(f64,f64) {
        match self {
            LegendRange::PerMap => (surface.min, surface.max),
            LegendRange::Global => (all.min, all.max),
            LegendRange::Fixed(lo,hi) => (*lo, *hi),
        }
    }
}

/// the background layers we draw underneath / on top of the surfaces
#[derive(Debug,Clone,PartialEq)]
pub struct MapLayers {
    pub relief: String,
    pub boundaries: Vec<String>,
}

impl MapLayers {
    pub fn new (data: &MappingData, grey: bool, boundary: &str)->Self {
        let relief = if grey { data.grey_shaded_relief.clone() } else { data.shaded_relief.clone() };
        MapLayers { relief, boundaries: vec![ data.countries.clone(), boundary.to_string(), data.coastline.clone() ] }
    }
}

#[derive(Debug,Clone)]
pub struct RenderOptions {
    pub file_type: FileType,
    /// figure resolution multiplier (1, 2 or 4)
    pub resolution: u32,
    pub title: String,
    pub legend_range: LegendRange,
    pub legend: LegendSettings,
}

/// the point map a surface was interpolated from
pub fn source_points_map (surface: &str)->String {
    let name = strip_mapset( surface);
    for prefix in [IDW_PREFIX, BSPLINE_PREFIX] {
        if let Some(base) = name.strip_prefix( prefix) {
            return format!("{SELECTED_PREFIX}{base}")
        }
    }
    format!("{SELECTED_PREFIX}{name}")
}

/// render all surfaces of `range` into `out_dir` and return the generated files.
/// Requested file types we can't produce yet are reported but do not abort the run
pub fn render_maps<E: GrassEngine> (session: &mut Session<E>, region: &RegionInfo, range: &SurfaceRange, layers: &MapLayers,
                                    opts: &RenderOptions, out_dir: &Path)->Result<Vec<PathBuf>> {
    if !opts.file_type.is_supported() {
        error!("{}", CasasGisError::NotImplemented( format!("{} output", opts.file_type)));
        return Ok( Vec::new())
    }
    session.require_region_mask()?;

    let position = opts.legend.policy.position( region.rows, region.cols);
    let mut files = Vec::with_capacity( range.surfaces.len());

    for surface in &range.surfaces {
        let legend_range = opts.legend_range.resolve( surface, range);
        let path = match opts.file_type {
            FileType::Png => png::render_png( session, region, surface, layers, opts, position, legend_range, out_dir)?,
            _ => postscript::render_ps( session, region, surface, layers, opts, position, legend_range, out_dir)?,
        };
        info!("rendered {:?}", path);
        files.push( path);
    }

    Ok(files)
}
