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

//! the mapping run: input -> import -> region mask -> selection -> interpolation -> colors -> rendering
//! -> report -> cleanup. Import happens in the lat/lon session, everything else in the (projected) mapping
//! session of the location. The steps have to be executed in this order since they communicate through
//! the GRASS mapset state

use std::path::{Path,PathBuf};
use chrono::Utc;
use tracing::{info,warn};

use casas_common::fs::ensure_writable_dir;
use crate::grass::GrassEngine;
use crate::session::Session;
use crate::locations::{LocationConfig,SessionConfig};
use crate::input::{ColumnId,prepare_input_tables};
use crate::import::{import_tables,reproject_vectors};
use crate::region::{MaskRequest,RegionInfo,build_mapping_mask};
use crate::selection::{SelectionBounds,select_interpolation_points};
use crate::interpolation::{InterpolationMethod,IdwParams,BsplineParams,SurfaceRange,interpolate_points_idw,interpolate_points_bspline};
use crate::color::{ColorOptions,apply_color_options};
use crate::render::{FileType,MapLayers,RenderOptions,render_maps};
use crate::report::write_stats_report;
use crate::cleanup::{clean_up_vectors,clean_up_rasters};
use crate::errors::{Result,invalid_option};

/// the output directories of a run
#[derive(Debug,Clone)]
pub struct OutputDirs {
    pub base: PathBuf,
    pub tmp: PathBuf,
    pub png: PathBuf,
    pub ps: PathBuf,
    pub reports: PathBuf,
}

impl OutputDirs {
    /// create (if needed) `<base>/{png,postscript,reports}` and `tmp`
    pub fn new (base: &Path, tmp: &Path)->Result<Self> {
        let dirs = OutputDirs {
            base: base.to_path_buf(),
            tmp: tmp.to_path_buf(),
            png: base.join("png"),
            ps: base.join("postscript"),
            reports: base.join("reports"),
        };
        for dir in [&dirs.tmp, &dirs.png, &dirs.ps, &dirs.reports] {
            ensure_writable_dir( dir)?;
        }
        Ok(dirs)
    }

    pub fn dir_for (&self, file_type: FileType)->&Path {
        match file_type {
            FileType::Png => &self.png,
            _ => &self.ps
        }
    }
}

#[derive(Debug,Clone)]
pub struct RunOptions {
    pub lon: ColumnId,
    pub lat: ColumnId,
    pub variable: ColumnId,

    pub method: InterpolationMethod,
    pub idw: IdwParams,
    pub bspline: BsplineParams,

    pub subregions: Vec<String>,
    pub crop: Option<String>,
    pub crop_threshold: f64,
    pub altitude: f64,
    pub bounds: SelectionBounds,

    pub colors: ColorOptions,
    /// scale colors to the range of all surfaces instead of each surface
    pub overall_range: bool,
    pub render: RenderOptions,

    pub report: bool,
    pub keep: bool,
}

#[derive(Debug,Clone)]
pub struct MappingOutcome {
    pub region: RegionInfo,
    pub surfaces: SurfaceRange,
    pub files: Vec<PathBuf>,
    pub report: Option<PathBuf>,
}

/// extract the lon/lat/variable tables of all model output files into the tmp dir
pub fn prepare_input (input_dir: &Path, dirs: &OutputDirs, opts: &RunOptions)->Result<Vec<PathBuf>> {
    let tables = prepare_input_tables( input_dir, &dirs.tmp, &opts.lon, &opts.lat, &opts.variable)?;
    info!("prepared {} input tables", tables.len());
    Ok(tables)
}

/// import the tables as point maps into the lat/lon session, replacing previous imports
pub fn run_import<E: GrassEngine> (session: &mut Session<E>, tables: &[PathBuf])->Result<Vec<String>> {
    clean_up_vectors( session)?;
    import_tables( session, tables)
}

pub fn run_mapping<E: GrassEngine> (session: &mut Session<E>, location: &LocationConfig, imported: &[String],
                                    opts: &RunOptions, dirs: &OutputDirs)->Result<MappingOutcome> {
    let import_session = &location.latlong_session;
    if !session.config().is_same_location( import_session) {
        clean_up_vectors( session)?;
        reproject_vectors( session, import_session, imported)?;
    }

    let data = &location.mapping_data;
    let crop = match &opts.crop {
        Some(name) => {
            let layers = location.crop_layer( name).ok_or_else(|| invalid_option( format!("no crop '{name}' in location {}", location.name)))?;
            Some(( layers.harvest_area_fraction.as_str(), opts.crop_threshold))
        }
        None => None
    };
    let req = MaskRequest {
        admin: &data.admin_divisions,
        selected: opts.subregions.clone(),
        dem: &data.digital_elevation,
        altitude: opts.altitude,
        crop,
        settings: location.region_settings,
    };
    let region = build_mapping_mask( session, &req)?;

    select_interpolation_points( session, &data.digital_elevation, &opts.bounds)?;

    let surfaces = match opts.method {
        InterpolationMethod::Idw => interpolate_points_idw( session, &opts.idw)?,
        InterpolationMethod::Bspline => interpolate_points_bspline( session, &opts.bspline, &dirs.reports)?,
    };

    for s in &surfaces.surfaces {
        let range = if opts.overall_range { (surfaces.min, surfaces.max) } else { (s.min, s.max) };
        apply_color_options( session, &s.name, &opts.colors, range)?;
    }

    let layers = MapLayers::new( data, opts.colors.grey, &data.admin_divisions.map_name);
    let files = render_maps( session, &region, &surfaces, &layers, &opts.render, dirs.dir_for( opts.render.file_type))?;

    let report = if opts.report { Some( write_stats_report( &dirs.reports, &surfaces, Utc::now())?) } else { None };

    if opts.keep {
        warn!("keeping intermediate maps");
    } else {
        clean_up_vectors( session)?;
        clean_up_rasters( session)?;
    }

    Ok( MappingOutcome { region, surfaces, files, report })
}
