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
#![allow(unused)]

//! casas_gis maps the point output of physiologically based demographic models (PBDMs) by
//! orchestrating GRASS GIS modules: import, region masking, point selection, interpolation,
//! coloring, rendering and cleanup.

use lazy_static::lazy_static;
use regex::Regex;

casas_build::define_load_config!{}

pub mod errors;
pub use errors::*;

pub mod grass;
pub mod session;
pub mod locations;
pub mod input;
pub mod import;
pub mod region;
pub mod selection;
pub mod interpolation;
pub mod color;
pub mod render;
pub mod report;
pub mod cleanup;
pub mod pipeline;

/* #region naming *********************************************************************************/

pub const IMPORTED_PREFIX: &str = "imp_";
pub const SELECTED_PREFIX: &str = "sel_";
pub const IDW_PREFIX: &str = "idw_";
pub const BSPLINE_PREFIX: &str = "bspline_";
pub const DRAPE_PREFIX: &str = "drape_";

pub const REGION_RASTER: &str = "mapping_region";
pub const SUBREGION_VECTOR: &str = "mapping_subregions";
pub const ELEVATION_COLUMN: &str = "elevation";
pub const NO_BG_COLOR: &str = "none";

/// side length in inches of the paper we start from when laying out PostScript maps
pub const BASE_PAPER_SIDE: f64 = 5.0;

lazy_static! {
    static ref ILLEGAL_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_]").unwrap();
}

/// turn an arbitrary name (e.g. a file stem) into a legal GRASS map / column name
pub fn legal_name (name: &str)->String {
    let mut s = ILLEGAL_CHARS.replace_all( name, "_").to_string();
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert( 0, 'x');
    }
    s
}

/// strip a `@mapset` qualifier
pub fn strip_mapset (name: &str)->&str {
    name.split('@').next().unwrap_or(name)
}

/// replace the first occurrence of `from` with `to`, after stripping any mapset qualifier.
/// This is how all derived layer names (`sel_x` from `imp_x`, `idw_x` from `sel_x` ..) are created
pub fn replace_prefix (name: &str, from: &str, to: &str)->String {
    strip_mapset(name).replacen( from, to, 1)
}

/// the source name of a derived layer, which is also the name of its value column
pub fn base_name (name: &str, prefix: &str)->String {
    replace_prefix( name, prefix, "")
}

/* #endregion naming */
