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

use tracing::{info,debug};

use crate::grass::{GrassCmd,GrassEngine,parse_lines};
use crate::session::Session;
use crate::errors::Result;
use crate::{IMPORTED_PREFIX,SELECTED_PREFIX,ELEVATION_COLUMN,base_name,replace_prefix};

/// the thresholds for selecting interpolation points. Only the first set bound in the order
/// altitude cap, upper bound, lower bound is used
#[derive(Debug,Clone,Copy,Default,PartialEq)]
pub struct SelectionBounds {
    pub altitude_cap: Option<f64>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

impl SelectionBounds {
    /// the `v.extract` where clause for a layer with value column `column`. An empty clause selects all points
    pub fn filter_expression (&self, column: &str)->String {
        if let Some(cap) = self.altitude_cap {
            format!("({ELEVATION_COLUMN} < {cap})")
        } else if let Some(upper) = self.upper_bound {
            format!("({column} <= {upper})")
        } else if let Some(lower) = self.lower_bound {
            format!("({column} >= {lower})")
        } else {
            String::new()
        }
    }
}

fn has_column<E: GrassEngine> (session: &mut Session<E>, map: &str, column: &str)->Result<bool> {
    // v.info -c prints "<type>|<name>" lines
    let output = session.read( GrassCmd::new("v.info").flags("c").param( "map", map))?;
    Ok( parse_lines( &output).iter().any(|l| l.rsplit('|').next().map(|c| c.trim() == column).unwrap_or(false)))
}

/// sample `dem` into the elevation column of every imported point map and extract the points that pass
/// `bounds` into the corresponding `sel_` map. Returns the names of the selected maps
pub fn select_interpolation_points<E: GrassEngine> (session: &mut Session<E>, dem: &str, bounds: &SelectionBounds)->Result<Vec<String>> {
    let imported = session.list_strings( "vector", &format!("{IMPORTED_PREFIX}*"))?;
    let mut selected = Vec::with_capacity( imported.len());

    for map in &imported {
        if !has_column( session, map, ELEVATION_COLUMN)? {
            session.run( GrassCmd::new("v.db.addcolumn")
                .param( "map", map)
                .param( "columns", format!("{ELEVATION_COLUMN} double precision")))?;
        }
        session.run( GrassCmd::new("v.what.rast")
            .param( "map", map)
            .param( "raster", dem)
            .param( "column", ELEVATION_COLUMN))?;

        let column = base_name( map, IMPORTED_PREFIX);
        let filter = bounds.filter_expression( &column);
        let output = replace_prefix( map, IMPORTED_PREFIX, SELECTED_PREFIX);
        debug!("selecting {output} where '{filter}'");

        session.run( GrassCmd::new("v.extract")
            .param( "input", map)
            .param( "output", &output)
            .param( "where", filter)
            .overwrite())?;
        selected.push( output);
    }

    info!("selected interpolation points: {selected:?}");
    Ok(selected)
}
