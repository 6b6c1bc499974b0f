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

//! interpolation of the selected point maps into raster surfaces.
//!
//! The numerics are done by GRASS (`v.surf.idw`, `v.surf.bspline`), we only drive the modules, clip the
//! results to the region mask and collect statistics so that all maps of a run can share a legend range.

use std::path::{Path,PathBuf};
use serde::{Serialize,Deserialize};
use strum::{EnumString,Display,AsRefStr};
use tracing::{info,debug};

use casas_common::MinMax;
use crate::grass::{GrassCmd,GrassEngine,parse_f64,parse_usize};
use crate::session::Session;
use crate::errors::{CasasGisError,Result,parse_error};
use crate::{SELECTED_PREFIX,IDW_PREFIX,BSPLINE_PREFIX,base_name,replace_prefix};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,EnumString,Display,AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod { Idw, Bspline }

impl InterpolationMethod {
    pub fn prefix (&self)->&'static str {
        match self {
            InterpolationMethod::Idw => IDW_PREFIX,
            InterpolationMethod::Bspline => BSPLINE_PREFIX,
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,EnumString,Display,AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SplineMethod { #[default] Bicubic, Bilinear }

/// univariate statistics of one interpolated surface
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct SurfaceStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
    pub cells: usize,
}

/// the surfaces of one interpolation batch with their overall max/min
#[derive(Debug,Clone,PartialEq)]
pub struct SurfaceRange {
    pub surfaces: Vec<SurfaceStats>,
    pub max: f64,
    pub min: f64,
}

impl SurfaceRange {
    pub fn from_surfaces (surfaces: Vec<SurfaceStats>)->Result<Self> {
        let mut mm = MinMax::new();
        for s in &surfaces {
            mm.add( s.min);
            mm.add( s.max);
        }
        match mm.range() {
            Some((min,max)) => Ok( SurfaceRange { surfaces, max, min }),
            None => Err( CasasGisError::NoInputMaps( "interpolated surfaces".to_string()))
        }
    }

    pub fn get (&self, name: &str)->Option<&SurfaceStats> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    pub fn names (&self)->Vec<&str> {
        self.surfaces.iter().map(|s| s.name.as_str()).collect()
    }
}

/// raster statistics as reported by `r.univar -g`
pub fn surface_stats<E: GrassEngine> (session: &mut Session<E>, raster: &str)->Result<SurfaceStats> {
    let kv = session.parse_command( GrassCmd::new("r.univar").flags("ge").param( "map", raster))?;
    Ok( SurfaceStats {
        name: raster.to_string(),
        min: parse_f64( &kv, "min")?,
        max: parse_f64( &kv, "max")?,
        mean: parse_f64( &kv, "mean")?,
        stddev: parse_f64( &kv, "stddev")?,
        cells: parse_usize( &kv, "n")?,
    })
}

fn selected_maps<E: GrassEngine> (session: &mut Session<E>)->Result<Vec<String>> {
    let maps = session.list_strings( "vector", &format!("{SELECTED_PREFIX}*"))?;
    if maps.is_empty() {
        Err( CasasGisError::NoInputMaps( format!("{SELECTED_PREFIX}*")))
    } else {
        Ok(maps)
    }
}

/// null all cells outside of the region mask (v.surf.idw does not honor raster masks)
fn clip_to_region<E: GrassEngine> (session: &mut Session<E>, raster: &str)->Result<()> {
    let mask = session.require_region_mask()?.to_string();
    session.mapcalc( &format!("{raster} = if({mask}, {raster}, null())"))
}

/* #region IDW ***************************************************************************************/

#[derive(Debug,Clone,PartialEq)]
pub struct IdwParams {
    pub layer: String,
    pub npoints: u32,
    pub power: f64,
}

impl Default for IdwParams {
    fn default()->Self {
        IdwParams { layer: "1".to_string(), npoints: 3, power: 2.0 }
    }
}

/// inverse distance weighted interpolation of all selected point maps into `idw_` rasters
pub fn interpolate_points_idw<E: GrassEngine> (session: &mut Session<E>, params: &IdwParams)->Result<SurfaceRange> {
    session.require_region_mask()?;
    let maps = selected_maps( session)?;
    let mut surfaces = Vec::with_capacity( maps.len());

    for map in &maps {
        let column = base_name( map, SELECTED_PREFIX);
        let output = replace_prefix( map, SELECTED_PREFIX, IDW_PREFIX);

        session.run( GrassCmd::new("v.surf.idw")
            .flags("n")
            .param( "input", map)
            .param( "layer", &params.layer)
            .param( "column", &column)
            .param( "output", &output)
            .param( "npoints", params.npoints)
            .param( "power", params.power)
            .overwrite())?;
        clip_to_region( session, &output)?;

        let stats = surface_stats( session, &output)?;
        debug!("{output}: min={} max={}", stats.min, stats.max);
        surfaces.push( stats);
    }

    let range = SurfaceRange::from_surfaces( surfaces)?;
    info!("absolute (idw) raster range [{}, {}]", range.min, range.max);
    Ok(range)
}

/* #endregion IDW */

/* #region B-spline **********************************************************************************/

#[derive(Debug,Clone,PartialEq)]
pub struct BsplineParams {
    pub layer: String,
    pub ew_step: Option<f64>,
    pub ns_step: Option<f64>,
    pub method: SplineMethod,
    pub lambda_i: Option<f64>,
}

impl Default for BsplineParams {
    fn default()->Self {
        BsplineParams { layer: "1".to_string(), ew_step: None, ns_step: None, method: SplineMethod::Bicubic, lambda_i: None }
    }
}

impl BsplineParams {
    /// explicitly configured (ew,ns) steps. If only one of them is set it is used for both
    pub fn steps (&self)->Option<(f64,f64)> {
        match (self.ew_step, self.ns_step) {
            (Some(ew), Some(ns)) => Some((ew,ns)),
            (Some(s), None) | (None, Some(s)) => Some((s,s)),
            (None, None) => None
        }
    }
}

/// the mean point distance from the `v.surf.bspline -e` output, which ends with the estimate
pub fn parse_estimated_distance (output: &str)->Result<f64> {
    let token = output.split_whitespace().last().ok_or_else(|| parse_error("empty distance estimate"))?;
    token.parse::<f64>().map_err(|_| parse_error( format!("not a distance: {token}")))
}

/// one row of the `v.surf.bspline -c` cross validation table
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct CrossValidationRow {
    pub lambda: f64,
    pub rms: f64,
}

/// parse the `|` separated cross validation table. We need a header row that names the `lambda` and `rms`
/// columns, all non-numeric rows after that are ignored
pub fn parse_cross_validation (output: &str)->Result<Vec<CrossValidationRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader( output.as_bytes());

    let mut cols: Option<(usize,usize)> = None;
    let mut rows = Vec::new();

    for res in reader.records() {
        let rec = res?;
        match cols {
            None => {
                let lambda_idx = rec.iter().position(|f| f.eq_ignore_ascii_case("lambda"));
                let rms_idx = rec.iter().position(|f| f.eq_ignore_ascii_case("rms"));
                if let (Some(l), Some(r)) = (lambda_idx, rms_idx) {
                    cols = Some((l,r));
                }
            }
            Some((l,r)) => {
                let lambda = rec.get(l).and_then(|f| f.parse::<f64>().ok());
                let rms = rec.get(r).and_then(|f| f.parse::<f64>().ok());
                if let (Some(lambda), Some(rms)) = (lambda, rms) {
                    rows.push( CrossValidationRow { lambda, rms });
                }
            }
        }
    }

    if cols.is_none() {
        Err( parse_error("no lambda/rms header in cross validation output"))
    } else if rows.is_empty() {
        Err( parse_error("empty cross validation table"))
    } else {
        Ok(rows)
    }
}

/// the lambda with the minimal rms. Ties resolve to the first row
pub fn best_smoothing_parameter (rows: &[CrossValidationRow])->Result<f64> {
    let mut best: Option<&CrossValidationRow> = None;
    for row in rows {
        if row.rms.is_nan() { continue }
        match best {
            Some(b) if b.rms <= row.rms => {}
            _ => best = Some(row)
        }
    }
    best.map(|r| r.lambda).ok_or_else(|| parse_error("no valid rms in cross validation table"))
}

/// estimate the mean distance between points of `map` and return the doubled value as (ew,ns) step
pub fn estimate_steps<E: GrassEngine> (session: &mut Session<E>, map: &str, column: &str, output: &str, layer: &str)->Result<(f64,f64)> {
    let text = session.read( GrassCmd::new("v.surf.bspline")
        .flags("e")
        .param( "input", map)
        .param( "layer", layer)
        .param( "column", column)
        .param( "raster_output", output)
        .overwrite())?;
    let step = parse_estimated_distance( &text)? * 2.0;
    debug!("{map}: estimated step {step}");
    Ok((step,step))
}

/// run leave-one-out cross validation for `map`, pick the smoothing parameter with the minimal rms error
/// and write a `<column>_cross_validation.txt` report into `report_dir`
pub fn cross_validate_bspline<E: GrassEngine> (session: &mut Session<E>, map: &str, column: &str, output: &str,
                                               steps: (f64,f64), params: &BsplineParams, report_dir: &Path)->Result<(f64,PathBuf)> {
    let mask = session.require_region_mask()?.to_string();
    let text = session.read( GrassCmd::new("v.surf.bspline")
        .flags("c")
        .param( "input", map)
        .param( "layer", &params.layer)
        .param( "column", column)
        .param( "raster_output", output)
        .param( "mask", mask)
        .param( "ew_step", steps.0)
        .param( "ns_step", steps.1)
        .param( "method", params.method)
        .overwrite())?;

    let rows = parse_cross_validation( &text)?;
    let lambda = best_smoothing_parameter( &rows)?;

    let report = format!("Cross validation for\new_step (average west distance) = {} and\nns_step (average north distance) = {}\n\
                          Selected lambda_i (smoothing parameter) = {} (minimizes rms)\n\n{}", steps.0, steps.1, lambda, text);
    let path = report_dir.join( format!("{column}_cross_validation.txt"));
    std::fs::write( &path, report)?;

    info!("{map}: selected lambda_i {lambda} from {} candidates", rows.len());
    Ok((lambda, path))
}

/// bicubic/bilinear spline interpolation of all selected point maps into `bspline_` rasters. Missing steps
/// and smoothing parameters are computed per map. Spline results are clipped to the value range of the
/// input points to get rid of overshoots
pub fn interpolate_points_bspline<E: GrassEngine> (session: &mut Session<E>, params: &BsplineParams, report_dir: &Path)->Result<SurfaceRange> {
    let mask = session.require_region_mask()?.to_string();
    let maps = selected_maps( session)?;
    let mut surfaces = Vec::with_capacity( maps.len());

    for map in &maps {
        let column = base_name( map, SELECTED_PREFIX);
        let output = replace_prefix( map, SELECTED_PREFIX, BSPLINE_PREFIX);

        let steps = match params.steps() {
            Some(steps) => steps,
            None => estimate_steps( session, map, &column, &output, &params.layer)?
        };
        let lambda = match params.lambda_i {
            Some(lambda) => lambda,
            None => cross_validate_bspline( session, map, &column, &output, steps, params, report_dir)?.0
        };

        session.run( GrassCmd::new("v.surf.bspline")
            .param( "input", map)
            .param( "layer", &params.layer)
            .param( "column", &column)
            .param( "raster_output", &output)
            .param( "mask", &mask)
            .param( "ew_step", steps.0)
            .param( "ns_step", steps.1)
            .param( "method", params.method)
            .param( "lambda_i", lambda)
            .overwrite()
            .verbose())?;

        let kv = session.parse_command( GrassCmd::new("v.univar")
            .flags("ge")
            .param( "map", map)
            .param( "layer", &params.layer)
            .param( "type", "point")
            .param( "column", &column))?;
        let vmin = parse_f64( &kv, "min")?;
        let vmax = parse_f64( &kv, "max")?;
        session.mapcalc( &format!("{output} = if(({output} >= {vmin}) && ({output} <= {vmax}), {output}, null())"))?;

        let stats = surface_stats( session, &output)?;
        debug!("{output}: min={} max={} (points [{vmin}, {vmax}])", stats.min, stats.max);
        surfaces.push( stats);
    }

    let range = SurfaceRange::from_surfaces( surfaces)?;
    info!("absolute (bspline) raster range [{}, {}]", range.min, range.max);
    Ok(range)
}

/* #endregion B-spline */
