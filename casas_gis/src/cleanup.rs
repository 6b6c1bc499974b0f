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

use tracing::info;

use crate::grass::{GrassCmd,GrassEngine};
use crate::session::Session;
use crate::errors::Result;
use crate::{IMPORTED_PREFIX,SELECTED_PREFIX,IDW_PREFIX,BSPLINE_PREFIX,DRAPE_PREFIX};

/// remove all maps of `map_type` whose names start with one of `prefixes`. Patterns that don't match
/// anything are not an error
pub fn remove_maps<E: GrassEngine> (session: &mut Session<E>, map_type: &str, prefixes: &[&str])->Result<()> {
    for prefix in prefixes {
        info!("removing {map_type} maps {prefix}*");
        session.run( GrassCmd::new("g.remove")
            .flags("f")
            .param( "type", map_type)
            .param( "pattern", format!("{prefix}*")))?;
    }
    Ok(())
}

pub fn clean_up_vectors<E: GrassEngine> (session: &mut Session<E>)->Result<()> {
    remove_maps( session, "vector", &[IMPORTED_PREFIX, SELECTED_PREFIX])
}

pub fn clean_up_rasters<E: GrassEngine> (session: &mut Session<E>)->Result<()> {
    remove_maps( session, "raster", &[IDW_PREFIX, BSPLINE_PREFIX, DRAPE_PREFIX])
}

/// vector maps of the current mapset
pub fn list_vector_maps<E: GrassEngine> (session: &mut Session<E>)->Result<Vec<String>> {
    session.list_strings( "vector", "*")
}

/// a printable `KEY: value` listing of the GRASS environment (location, mapset ..)
pub fn print_grass_environment<E: GrassEngine> (session: &mut Session<E>)->Result<String> {
    let env = session.gisenv()?;
    let mut keys: Vec<&String> = env.keys().collect();
    keys.sort();

    let mut s = String::new();
    for k in keys {
        s.push_str( &format!("{:16}{}\n", format!("{k}:"), env[k]));
    }
    Ok(s)
}
