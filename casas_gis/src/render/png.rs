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

use crate::grass::{GrassCmd,GrassEngine};
use crate::session::Session;
use crate::region::RegionInfo;
use crate::interpolation::SurfaceStats;
use crate::errors::Result;
use super::{LegendPosition,MapLayers,RenderOptions,source_points_map};

/// `at=bottom,top,left,right` placement of the legend (in percent of the frame)
pub fn legend_placement (position: LegendPosition)->&'static str {
    match position {
        LegendPosition::Bottom => "4,8,15,85",
        LegendPosition::Right => "10,90,90,94",
    }
}

/// image size in pixels, one pixel per region cell times the resolution multiplier
pub fn image_size (region: &RegionInfo, multiplier: u32)->(u32,u32) {
    let m = multiplier.max(1);
    (region.cols as u32 * m, region.rows as u32 * m)
}

pub fn render_png<E: GrassEngine> (session: &mut Session<E>, region: &RegionInfo, surface: &SurfaceStats, layers: &MapLayers,
                                   opts: &RenderOptions, position: LegendPosition, legend_range: (f64,f64), out_dir: &Path)->Result<PathBuf> {
    let path = out_dir.join( format!("{}.png", surface.name));
    let (width, height) = image_size( region, opts.resolution);
    let legend = &opts.legend;

    session.start_monitor( &path, width, height)?;

    session.run( GrassCmd::new("d.shade")
        .param( "shade", &layers.relief)
        .param( "color", &surface.name))?;

    for boundary in &layers.boundaries {
        session.run( GrassCmd::new("d.vect")
            .param( "map", boundary)
            .param( "type", "boundary,line")
            .param( "color", "grey")
            .param( "fill_color", crate::NO_BG_COLOR))?;
    }

    session.run( GrassCmd::new("d.vect")
        .param( "map", source_points_map( &surface.name))
        .param( "type", "point")
        .param( "icon", "basic/circle")
        .param( "size", 3 * opts.resolution.max(1))
        .param( "color", "black")
        .param( "fill_color", "black"))?;

    session.run( GrassCmd::new("d.legend")
        .param( "raster", &surface.name)
        .param( "at", legend_placement( position))
        .param( "range", format!("{},{}", legend_range.0, legend_range.1))
        .param( "title", &opts.title)
        .param( "font", &legend.font)
        .param( "fontsize", legend.font_size * opts.resolution.max(1))
        .param( "labelnum", legend.tick_count)
        .param( "color", &legend.text_color)
        .param( "bgcolor", &legend.background_color))?;

    session.stop_monitor()?;
    Ok(path)
}
