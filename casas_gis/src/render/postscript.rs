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

//! PostScript maps through `ps.map` instruction files

use std::fmt::Write;
use std::path::{Path,PathBuf};
use tracing::debug;

use crate::grass::{GrassCmd,GrassEngine};
use crate::session::Session;
use crate::region::RegionInfo;
use crate::interpolation::SurfaceStats;
use crate::errors::Result;
use crate::{BASE_PAPER_SIDE,DRAPE_PREFIX,IDW_PREFIX,BSPLINE_PREFIX,strip_mapset};
use super::{LegendPosition,MapLayers,RenderOptions,source_points_map};

const MARGIN: f64 = 0.1;        // inch
const LEGEND_BAND: f64 = 1.0;   // inch, reserved for the color table
const TITLE_BAND: f64 = 0.4;    // inch

/// paper and map frame dimensions in inches
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct PaperSize {
    pub width: f64,
    pub height: f64,
    pub map_width: f64,
    pub map_height: f64,
    /// upper left corner of the color table, relative to the page
    pub legend_x: f64,
    pub legend_y: f64,
    pub legend_width: f64,
    pub legend_height: f64,
}

/// the paper layout for a region of `rows`x`cols` cells. The longer map side is `base` inches, the legend band
/// is added below or to the right of the map
pub fn paper_size (rows: usize, cols: usize, position: LegendPosition, base: f64)->PaperSize {
    let rows = rows.max(1) as f64;
    let cols = cols.max(1) as f64;

    let (map_width, map_height) = if cols >= rows { (base, base * rows / cols) } else { (base * cols / rows, base) };

    match position {
        LegendPosition::Bottom => {
            PaperSize {
                width: map_width + 2.0 * MARGIN,
                height: map_height + TITLE_BAND + LEGEND_BAND + 2.0 * MARGIN,
                map_width, map_height,
                legend_x: MARGIN + map_width * 0.1,
                legend_y: MARGIN + TITLE_BAND + map_height + 0.2,
                legend_width: map_width * 0.8,
                legend_height: 0.2,
            }
        }
        LegendPosition::Right => {
            PaperSize {
                width: map_width + LEGEND_BAND + 2.0 * MARGIN,
                height: map_height + TITLE_BAND + 2.0 * MARGIN,
                map_width, map_height,
                legend_x: MARGIN + map_width + 0.2,
                legend_y: MARGIN + TITLE_BAND + map_height * 0.1,
                legend_width: 0.2,
                legend_height: map_height * 0.8,
            }
        }
    }
}

/// builder for `ps.map` instruction files. Each stanza is a keyword line followed by indented
/// sub-instructions and a closing `end`
#[derive(Debug,Clone,Default)]
pub struct PsMapInstructions {
    text: String,
}

impl PsMapInstructions {
    pub fn new ()->Self { PsMapInstructions { text: String::new() } }

    fn stanza (mut self, head: &str, lines: &[String])->Self {
        let _ = writeln!( self.text, "{head}");
        for l in lines {
            let _ = writeln!( self.text, "  {l}");
        }
        let _ = writeln!( self.text, "end");
        self
    }

    pub fn paper (self, paper: &PaperSize)->Self {
        self.stanza( "paper", &[
            format!("width {:.2}", paper.width),
            format!("height {:.2}", paper.height),
            format!("left {MARGIN}"), format!("right {MARGIN}"), format!("top {MARGIN}"), format!("bottom {MARGIN}"),
        ])
    }

    pub fn maploc (mut self, x: f64, y: f64, width: f64, height: f64)->Self {
        let _ = writeln!( self.text, "maploc {x:.2} {y:.2} {width:.2} {height:.2}");
        self
    }

    pub fn border (self, color: &str, width: f64)->Self {
        self.stanza( "border y", &[ format!("color {color}"), format!("width {width}") ])
    }

    pub fn raster (mut self, map: &str)->Self {
        let _ = writeln!( self.text, "raster {map}");
        self
    }

    pub fn vlines (self, map: &str, color: &str, width: f64)->Self {
        self.stanza( &format!("vlines {map}"), &[
            "type boundary".to_string(), format!("color {color}"), format!("width {width}")
        ])
    }

    pub fn vpoints (self, map: &str, symbol: &str, size: f64, color: &str)->Self {
        self.stanza( &format!("vpoints {map}"), &[
            "type point".to_string(), format!("symbol {symbol}"), format!("size {size}"),
            format!("color {color}"), format!("fcolor {color}")
        ])
    }

    pub fn colortable (self, raster: &str, paper: &PaperSize, range: (f64,f64), font: &str, fontsize: u32, color: &str)->Self {
        self.stanza( "colortable y", &[
            format!("raster {raster}"),
            format!("where {:.2} {:.2}", paper.legend_x, paper.legend_y),
            format!("width {:.2}", paper.legend_width),
            format!("height {:.2}", paper.legend_height),
            format!("range {} {}", range.0, range.1),
            format!("font {font}"),
            format!("fontsize {fontsize}"),
            format!("color {color}"),
        ])
    }

    pub fn text (self, x_percent: f64, y_percent: f64, text: &str, font: &str, fontsize: u32)->Self {
        self.stanza( &format!("text {x_percent}% {y_percent}% {text}"), &[
            format!("font {font}"), format!("fontsize {fontsize}"), "ref center center".to_string()
        ])
    }

    /// the complete instruction text, terminated by the final `end`
    pub fn build (mut self)->String {
        self.text.push_str( "end\n");
        self.text
    }
}

/// the name of the shaded surface raster we print
pub fn drape_name (surface: &str)->String {
    let name = strip_mapset( surface);
    let base = name.strip_prefix( IDW_PREFIX).or_else(|| name.strip_prefix( BSPLINE_PREFIX)).unwrap_or( name);
    format!("{DRAPE_PREFIX}{base}")
}

pub fn ps_instructions (surface: &str, drape: &str, layers: &MapLayers, paper: &PaperSize, opts: &RenderOptions, legend_range: (f64,f64))->String {
    let legend = &opts.legend;
    let mut psmap = PsMapInstructions::new()
        .paper( paper)
        .maploc( 0.0, TITLE_BAND, paper.map_width, paper.map_height)
        .border( "black", 0.5)
        .raster( drape);

    for boundary in &layers.boundaries {
        psmap = psmap.vlines( boundary, "grey", 0.5);
    }

    psmap.vpoints( &source_points_map( surface), "basic/circle", 3.0, "black")
        .colortable( surface, paper, legend_range, &legend.font, legend.font_size, &legend.text_color)
        .text( 50.0, 3.0, &opts.title, &legend.font, legend.title_font_size)
        .build()
}

/// shade the surface with the relief, write the `<surface>.psmap` instruction file and run ps.map on it
pub fn render_ps<E: GrassEngine> (session: &mut Session<E>, region: &RegionInfo, surface: &SurfaceStats, layers: &MapLayers,
                                  opts: &RenderOptions, position: LegendPosition, legend_range: (f64,f64), out_dir: &Path)->Result<PathBuf> {
    let drape = drape_name( &surface.name);
    session.run( GrassCmd::new("r.shade")
        .param( "shade", &layers.relief)
        .param( "color", &surface.name)
        .param( "output", &drape)
        .overwrite())?;

    let paper = paper_size( region.rows, region.cols, position, BASE_PAPER_SIDE);
    let instructions = ps_instructions( &surface.name, &drape, layers, &paper, opts, legend_range);
    debug!("ps.map instructions for {}:\n{instructions}", surface.name);

    let input = out_dir.join( format!("{}.psmap", surface.name));
    std::fs::write( &input, instructions)?;

    let output = out_dir.join( format!("{}.ps", surface.name));
    session.run( GrassCmd::new("ps.map")
        .param( "input", input.display())
        .param( "output", output.display())
        .overwrite())?;

    Ok(output)
}
