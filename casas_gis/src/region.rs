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

//! computational region and region mask raster

use std::collections::HashMap;
use tracing::info;

use casas_common::BoundingBox;
use crate::grass::{GrassCmd,GrassEngine,parse_f64,parse_usize};
use crate::session::Session;
use crate::locations::{AdminDivisions,RegionSettings};
use crate::errors::{Result,invalid_option};
use crate::{REGION_RASTER,SUBREGION_VECTOR};

/// the computational region as reported by `g.region -g`
#[derive(Debug,Clone,PartialEq)]
pub struct RegionInfo {
    pub n: f64,
    pub s: f64,
    pub e: f64,
    pub w: f64,
    pub nsres: f64,
    pub ewres: f64,
    pub rows: usize,
    pub cols: usize,
    pub cells: usize,
}

impl RegionInfo {
    pub fn from_key_values (kv: &HashMap<String,String>)->Result<Self> {
        Ok( RegionInfo {
            n: parse_f64( kv, "n")?,
            s: parse_f64( kv, "s")?,
            e: parse_f64( kv, "e")?,
            w: parse_f64( kv, "w")?,
            nsres: parse_f64( kv, "nsres")?,
            ewres: parse_f64( kv, "ewres")?,
            rows: parse_usize( kv, "rows")?,
            cols: parse_usize( kv, "cols")?,
            cells: parse_usize( kv, "cells")?,
        })
    }

    pub fn bbox (&self)->BoundingBox<f64> {
        BoundingBox::new( self.w, self.s, self.e, self.n)
    }
}

/// `<column> IN ('A','B')` filter for the selected subregion codes, or `None` if the whole layer is
/// selected (no codes or the word `all`). Codes have to be one of the configured `division_names`
pub fn subregion_filter (admin: &AdminDivisions, selected: &[String])->Result<Option<String>> {
    let column = &admin.column;
    let selected: Vec<&str> = selected.iter().flat_map(|s| s.split(',')).map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if selected.iter().any(|code| code.eq_ignore_ascii_case("all")) { return Ok(None) }

    let mut codes: Vec<&str> = Vec::new();
    for code in selected {
        if code.contains('\'') { return Err( invalid_option( format!("illegal subregion code {code}"))) }
        if !admin.division_names.iter().any(|n| n == code) {
            return Err( invalid_option( format!("unknown subregion {code} (expected one of {})", admin.division_names.join(","))))
        }
        if !codes.contains( &code) { codes.push( code) }
    }

    if codes.is_empty() {
        Ok(None)
    } else {
        let list: Vec<String> = codes.iter().map(|c| format!("'{c}'")).collect();
        Ok( Some( format!("{column} IN ({})", list.join(","))))
    }
}

/// grow `bbox` by `buffer` and snap it outwards to `resolution`
pub fn computational_extent (bbox: &BoundingBox<f64>, buffer: f64, resolution: f64)->BoundingBox<f64> {
    bbox.expand( buffer).snap_outward( resolution)
}

/// the bounding box of a vector map (`v.info -g`)
pub fn vector_extent<E: GrassEngine> (session: &mut Session<E>, map: &str)->Result<BoundingBox<f64>> {
    let kv = session.parse_command( GrassCmd::new("v.info").flags("g").param( "map", map))?;
    Ok( BoundingBox::new( parse_f64( &kv, "west")?, parse_f64( &kv, "south")?, parse_f64( &kv, "east")?, parse_f64( &kv, "north")?))
}

/// set the computational region to the (buffered and snapped) extent of the selected subregions of
/// `admin`, returning the name of the vector map the region is based on together with the new region
pub fn set_mapping_region<E: GrassEngine> (session: &mut Session<E>, admin: &AdminDivisions, selected: &[String], settings: &RegionSettings)->Result<(String,RegionInfo)> {
    let region_map = match subregion_filter( admin, selected)? {
        Some(filter) => {
            info!("extracting subregions: {filter}");
            session.run( GrassCmd::new("v.extract")
                .param( "input", &admin.map_name)
                .param( "output", SUBREGION_VECTOR)
                .param( "where", filter)
                .overwrite())?;
            SUBREGION_VECTOR.to_string()
        }
        None => admin.map_name.clone()
    };

    let extent = computational_extent( &vector_extent( session, &region_map)?, settings.buffer, settings.resolution);
    session.run( GrassCmd::new("g.region")
        .param( "n", extent.north)
        .param( "s", extent.south)
        .param( "e", extent.east)
        .param( "w", extent.west)
        .param( "res", settings.resolution))?;

    let region = session.region()?;
    info!("mapping region {region:?}");
    Ok( (region_map, region))
}

/// the raster condition that turns the rasterized subregions into the final region mask
pub fn mask_expression (dem: &str, altitude: f64, crop: Option<(&str,f64)>)->String {
    let mut cond = format!("{REGION_RASTER} && {dem} < {altitude}");
    if let Some((crop_map, fraction)) = crop {
        cond.push_str( &format!(" && {crop_map} > {fraction}"));
    }
    format!("{REGION_RASTER} = if({cond}, 1, null())")
}

/// rasterize `region_map` into the region mask and restrict it to cells below `altitude` (and above the
/// crop harvest area fraction if given). This is what all later interpolation and rendering depends on
pub fn create_region_mask<E: GrassEngine> (session: &mut Session<E>, region_map: &str, dem: &str, altitude: f64, crop: Option<(&str,f64)>)->Result<()> {
    session.run( GrassCmd::new("v.to.rast")
        .param( "input", region_map)
        .param( "output", REGION_RASTER)
        .param( "use", "val")
        .param( "value", 1)
        .overwrite())?;

    session.mapcalc( &mask_expression( dem, altitude, crop))?;
    session.set_region_mask( REGION_RASTER);
    Ok(())
}

/// everything that defines the region mask of a mapping run
#[derive(Debug,Clone)]
pub struct MaskRequest<'a> {
    pub admin: &'a AdminDivisions,
    pub selected: Vec<String>,
    pub dem: &'a str,
    pub altitude: f64,
    pub crop: Option<(&'a str,f64)>,
    pub settings: RegionSettings,
}

pub fn build_mapping_mask<E: GrassEngine> (session: &mut Session<E>, req: &MaskRequest)->Result<RegionInfo> {
    let (region_map, region) = set_mapping_region( session, req.admin, &req.selected, &req.settings)?;
    create_region_mask( session, &region_map, req.dem, req.altitude, req.crop)?;
    Ok(region)
}
