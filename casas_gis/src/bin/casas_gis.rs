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

use std::path::{Path,PathBuf};
use anyhow::{Result,anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use casas_common::{define_cli,check_cli};
use casas_gis::load_config;
use casas_gis::grass::ProcessEngine;
use casas_gis::session::Session;
use casas_gis::locations::LocationConfig;
use casas_gis::input::ColumnId;
use casas_gis::selection::SelectionBounds;
use casas_gis::interpolation::{InterpolationMethod,IdwParams,BsplineParams};
use casas_gis::color::{ColorOptions,ColorSource,REGULAR_PATTERN,DIVERGENT_PATTERN};
use casas_gis::render::{FileType,LegendRange,RenderOptions};
use casas_gis::pipeline::{OutputDirs,RunOptions,prepare_input,run_import,run_mapping};

define_cli! { ARGS [about="casas_gis - map and analyze the output of physiologically based demographic models with GRASS GIS"] =
    location: String [help="name of location config (e.g. colombia, andalusia)", long, default_value="colombia"],
    input_dir: String [help="directory with tab separated model output files (*.txt)", long, default_value="input_data"],
    longitude: String [help="longitude column (index or name)", long, default_value="4"],
    latitude: String [help="latitude column (index or name)", long, default_value="5"],
    variable: String [help="column to map (index or name)", long],

    interpolation: String [help="interpolation method {idw,bspline}", long, default_value="bspline"],
    numpoints: u32 [help="number of interpolation points (idw only)", long, default_value="3"],
    power: f64 [help="distance weight power (idw only)", long, default_value="2.0"],

    legend: String [help="legend title", long, default_value=""],
    color_rule: Option<String> [help="name or path of color rules file", long],
    color_pattern: Option<String> [help="hyphen separated color pattern (GRASS color names or R:G:B)", long],
    divergent: bool [help="use divergent, zero-centered color pattern (requires positive max and negative min)", short, long],
    grey: bool [help="black and white output", short, long],
    equalized: bool [help="histogram equalized colors", short, long],
    logarithmic: bool [help="logarithmic color scaling", short, long],
    overall_range: bool [help="use overall range of all maps for colors", short="x", long],
    same_legend: bool [help="use overall range of all maps also for legends", short="a", long],
    legend_range: Option<Vec<f64>> [help="fixed legend range (low high)", long, number_of_values=2, allow_hyphen_values=true],

    lowercut: Option<f64> [help="cutting point to mask low values", long, allow_hyphen_values=true],
    uppercut: f64 [help="cutting point to mask high values", long, allow_hyphen_values=true, default_value="0"],
    use_uppercut: bool [help="use cutting point to mask high values", short="u", long],
    clip_stations: bool [help="do not interpolate stations above clipping altitude", short="c", long],

    subregions: String [help="comma separated subregion codes to map, or 'all'", long, default_value="all"],
    crop: String [help="constrain output to crop growing area, or 'none'", long, default_value="none"],
    cropthreshold: f64 [help="crop harvested area fraction above which mapping will occur", long, default_value="0.01"],
    alt: f64 [help="altitude (meters) above which to clip", long, default_value="10000"],
    resolution: u32 [help="resolution of output figure {1,2,4}", long, default_value="1"],
    file_type: String [help="output file type {png,ps}", long, default_value="png"],

    report: bool [help="write a report with raster statistics", short, long],
    keep: bool [help="keep intermediate maps", short, long],

    savedir: String [help="name of directory where to store output maps"]
}

fn main ()->Result<()> {
    casas_build::set_bin_context!();
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let location: LocationConfig = load_config( &format!("{}.ron", ARGS.location))?;
    let opts = run_options( &location)?;

    let dirs = OutputDirs::new( &casas_build::out_dir().join( &ARGS.savedir), casas_build::tmp_dir())?;
    let grassbin = std::env::var("GRASSBIN").unwrap_or_else(|_| "grass".to_string());

    let tables = prepare_input( Path::new( &ARGS.input_dir), &dirs, &opts)?;

    // only one GRASS session can be open at a time, drop the import session before opening the mapping one
    let imported = {
        let engine = ProcessEngine::open( &grassbin, &location.latlong_session, &dirs.tmp)?;
        let mut session = Session::new( engine, location.latlong_session.clone());
        run_import( &mut session, &tables)?
    };

    let engine = ProcessEngine::open( &grassbin, &location.mapping_session, &dirs.tmp)?;
    let mut session = Session::new( engine, location.mapping_session.clone());
    let outcome = run_mapping( &mut session, &location, &imported, &opts, &dirs)?;

    for file in &outcome.files {
        println!("{}", file.display());
    }
    if let Some(report) = &outcome.report {
        println!("statistics report: {}", report.display());
    }
    info!("mapped {} surfaces, overall range [{}, {}]", outcome.surfaces.surfaces.len(), outcome.surfaces.min, outcome.surfaces.max);

    Ok(())
}

fn run_options (location: &LocationConfig)->Result<RunOptions> {
    let variable = ARGS.variable.parse::<ColumnId>()?;
    let method = ARGS.interpolation.parse::<InterpolationMethod>().map_err(|_| anyhow!("unknown interpolation method {}", ARGS.interpolation))?;
    let file_type = ARGS.file_type.parse::<FileType>().map_err(|_| anyhow!("unknown file type {}", ARGS.file_type))?;
    if ![1,2,4].contains( &ARGS.resolution) {
        return Err( anyhow!("resolution has to be 1, 2 or 4"))
    }

    let source = if let Some(rule) = &ARGS.color_rule {
        ColorSource::RulesFile( rule.clone())
    } else {
        let default_pattern = if ARGS.divergent { DIVERGENT_PATTERN } else { REGULAR_PATTERN };
        let colors = ARGS.color_pattern.clone().unwrap_or_else(|| default_pattern.to_string());
        ColorSource::Pattern { colors, divergent: ARGS.divergent }
    };

    let legend_range = match &ARGS.legend_range {
        Some(v) if v.len() == 2 => LegendRange::Fixed( v[0], v[1]),
        _ => if ARGS.same_legend { LegendRange::Global } else { LegendRange::PerMap }
    };

    let title = if ARGS.legend.is_empty() { ARGS.variable.clone() } else { ARGS.legend.clone() };

    Ok( RunOptions {
        lon: ARGS.longitude.parse()?,
        lat: ARGS.latitude.parse()?,
        variable,
        method,
        idw: IdwParams { npoints: ARGS.numpoints, power: ARGS.power, ..IdwParams::default() },
        bspline: BsplineParams::default(),
        subregions: vec![ ARGS.subregions.clone() ],
        crop: if ARGS.crop == "none" { None } else { Some( ARGS.crop.clone()) },
        crop_threshold: ARGS.cropthreshold,
        altitude: ARGS.alt,
        bounds: SelectionBounds {
            altitude_cap: if ARGS.clip_stations { Some(ARGS.alt) } else { None },
            upper_bound: if ARGS.use_uppercut { Some(ARGS.uppercut) } else { None },
            lower_bound: ARGS.lowercut,
        },
        colors: ColorOptions { source, equalized: ARGS.equalized, logarithmic: ARGS.logarithmic, grey: ARGS.grey },
        overall_range: ARGS.overall_range,
        render: RenderOptions { file_type, resolution: ARGS.resolution, title, legend_range, legend: location.legend_settings.clone() },
        report: ARGS.report,
        keep: ARGS.keep,
    })
}
