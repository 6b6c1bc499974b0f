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

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use casas_common::{define_cli,check_cli};
use casas_gis::load_config;
use casas_gis::grass::ProcessEngine;
use casas_gis::session::Session;
use casas_gis::locations::LocationConfig;
use casas_gis::region::set_mapping_region;
use casas_gis::cleanup::{list_vector_maps,print_grass_environment};

define_cli! { ARGS [about="show_region - show the computational region and environment of a mapping location"] =
    list: bool [help="list vector maps of the mapping mapset", short, long],
    subregions: String [help="comma separated subregion codes, or 'all'", long, default_value="all"],
    location: String [help="name of location config (e.g. colombia, andalusia)", default_value="colombia"]
}

fn main ()->Result<()> {
    casas_build::set_bin_context!();
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())
        .init();

    let location: LocationConfig = load_config( &format!("{}.ron", ARGS.location))?;
    let grassbin = std::env::var("GRASSBIN").unwrap_or_else(|_| "grass".to_string());

    let engine = ProcessEngine::open( &grassbin, &location.mapping_session, casas_build::tmp_dir())?;
    let mut session = Session::new( engine, location.mapping_session.clone());

    print!("{}", print_grass_environment( &mut session)?);

    if ARGS.list {
        println!("\nvector maps:");
        for map in list_vector_maps( &mut session)? {
            println!("  {map}");
        }
    }

    let subregions = vec![ ARGS.subregions.clone() ];
    let (region_map, region) = set_mapping_region( &mut session, &location.mapping_data.admin_divisions, &subregions, &location.region_settings)?;

    println!("\nregion of {region_map}:");
    println!("  north: {}\n  south: {}\n  east:  {}\n  west:  {}", region.n, region.s, region.e, region.w);
    println!("  resolution: {} x {}\n  rows: {}\n  cols: {}\n  cells: {}", region.ewres, region.nsres, region.rows, region.cols, region.cells);
    println!("  legend: {:?}", location.legend_settings.policy.position( region.rows, region.cols));

    Ok(())
}
