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

use std::path::{Path,PathBuf};
use tracing::info;

use casas_common::fs::filestem;
use crate::grass::{GrassCmd,GrassEngine};
use crate::session::Session;
use crate::locations::SessionConfig;
use crate::errors::{Result,invalid_option};
use crate::{IMPORTED_PREFIX,legal_name};

/// import a lon/lat/value table as `imp_<name>` point map with value column `<name>`
pub fn import_table<E: GrassEngine> (session: &mut Session<E>, path: &Path)->Result<String> {
    let stem = filestem( &path).ok_or_else(|| invalid_option( format!("not a table file: {:?}", path)))?;
    let name = legal_name( stem);
    let output = format!("{IMPORTED_PREFIX}{name}");

    session.run( GrassCmd::new("v.in.ascii")
        .param( "input", path.display())
        .param( "output", &output)
        .param( "skip", 1)
        .param( "separator", "tab")
        .param( "x", 1)
        .param( "y", 2)
        .param( "z", 0)
        .param( "columns", format!("lon double precision, lat double precision, {name} double precision"))
        .overwrite())?;

    info!("imported {:?} as {output}", path);
    Ok(output)
}

pub fn import_tables<E: GrassEngine> (session: &mut Session<E>, paths: &[PathBuf])->Result<Vec<String>> {
    let mut imported = Vec::with_capacity( paths.len());
    for path in paths {
        imported.push( import_table( session, path)?);
    }
    Ok(imported)
}

/// reproject vector maps from the `source` location into the location of `session` (keeping names)
pub fn reproject_vectors<E: GrassEngine> (session: &mut Session<E>, source: &SessionConfig, maps: &[String])->Result<()> {
    let dbase = source.gisdb();
    for map in maps {
        session.run( GrassCmd::new("v.proj")
            .param( "input", map)
            .param( "location", &source.location)
            .param( "mapset", &source.mapset)
            .param( "dbase", dbase.display())
            .overwrite())?;
        info!("reprojected {map} from {}", source.location);
    }
    Ok(())
}
