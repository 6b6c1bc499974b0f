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

//! color tables of interpolated surfaces

use std::fmt::Write;
use std::path::{Path,PathBuf};
use tracing::debug;

use crate::grass::{GrassCmd,GrassEngine};
use crate::session::Session;
use crate::errors::{Result,invalid_option};

pub const COLOR_RULES: &str = "color_rules";

/// default regular (grey scale) pattern
pub const REGULAR_PATTERN: &str = "255:255:255-204:204:204-150:150:150-150:150:150-99:99:99-99:99:99-37:37:37-37:37:37";

/// default divergent pattern (blue through yellow to red)
pub const DIVERGENT_PATTERN: &str = "32:96:255-32:159:255-32:191:255-0:207:255-42:255:255-85:255:255-127:255:255-170:255:255-\
                                     255:255:84-255:240:0-255:191:0-255:168:0-255:138:0-255:112:0-255:77:0-255:0:0";

#[derive(Debug,Clone,PartialEq)]
pub enum ColorSource {
    /// a rules file, either a path or a name that is looked up in the `color_rules` resource dir
    RulesFile(String),
    /// hyphen separated color names or R:G:B triplets that are spread over the value range
    Pattern { colors: String, divergent: bool },
    /// a predefined GRASS color table such as `viridis`
    Table(String),
}

#[derive(Debug,Clone,PartialEq)]
pub struct ColorOptions {
    pub source: ColorSource,
    pub equalized: bool,
    pub logarithmic: bool,
    pub grey: bool,
}

impl Default for ColorOptions {
    fn default()->Self {
        ColorOptions {
            source: ColorSource::Pattern { colors: REGULAR_PATTERN.to_string(), divergent: false },
            equalized: false,
            logarithmic: false,
            grey: false
        }
    }
}

fn split_pattern (pattern: &str)->Result<Vec<&str>> {
    let colors: Vec<&str> = pattern.split('-').map(|c| c.trim()).filter(|c| !c.is_empty()).collect();
    if colors.is_empty() {
        Err( invalid_option( format!("empty color pattern '{pattern}'")))
    } else {
        Ok(colors)
    }
}

/// `n` evenly spaced values from `lo` to `hi` (inclusive)
fn spread (lo: f64, hi: f64, n: usize)->Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![lo],
        _ => (0..n).map(|i| if i == n-1 { hi } else { lo + (hi - lo) * i as f64 / (n-1) as f64 }).collect()
    }
}

fn push_rule (rules: &mut String, value: f64, color: &str) {
    let _ = writeln!( rules, "{value} {color}");
}

/// r.colors rules spreading the hyphen separated `pattern` colors evenly over [min,max]
pub fn color_rules_from_pattern (pattern: &str, min: f64, max: f64)->Result<String> {
    let colors = split_pattern( pattern)?;
    if min > max { return Err( invalid_option( format!("empty value range [{min},{max}]"))) }

    let mut rules = String::new();
    if colors.len() == 1 {
        push_rule( &mut rules, min, colors[0]);
        push_rule( &mut rules, max, colors[0]);
    } else {
        for (v,c) in spread( min, max, colors.len()).into_iter().zip( colors.iter()) {
            push_rule( &mut rules, v, c);
        }
    }
    Ok(rules)
}

/// zero centered rules: the lower half of the colors covers [min,0], the upper half (0,max].
/// This only makes sense for ranges that contain both negative and positive values
pub fn divergent_color_rules (pattern: &str, min: f64, max: f64)->Result<String> {
    if !(max > 0.0 && min < 0.0) {
        return Err( invalid_option( format!("divergent colors need max > 0 > min, got [{min},{max}]")))
    }
    let colors = split_pattern( pattern)?;
    if colors.len() < 2 {
        return Err( invalid_option( "divergent pattern needs at least two colors"))
    }

    let half = colors.len() / 2;
    let (lower, upper) = colors.split_at( half);

    let mut rules = String::new();
    for (v,c) in spread( min, 0.0, lower.len()).into_iter().zip( lower.iter()) {
        push_rule( &mut rules, v, c);
    }
    let n = upper.len();
    for (i,c) in upper.iter().enumerate() {
        push_rule( &mut rules, max * (i+1) as f64 / n as f64, c);
    }
    Ok(rules)
}

/// the path of a color rules file, which is either given literally or looked up as a `color_rules` resource
pub fn find_color_rules (name: &str)->Result<PathBuf> {
    let path = Path::new( name);
    if path.is_file() {
        return Ok( path.to_path_buf())
    }
    casas_build::find_resource_file( COLOR_RULES, &casas_build::get_bin_context(), env!("CARGO_PKG_NAME"), name)
        .ok_or_else(|| invalid_option( format!("no color rules '{name}'")))
}

/// set the color table of `raster` according to `opts`, scaling generated rules to `range` (min,max)
pub fn apply_color_options<E: GrassEngine> (session: &mut Session<E>, raster: &str, opts: &ColorOptions, range: (f64,f64))->Result<()> {
    let mut flags = String::new();
    if opts.equalized { flags.push('e') }
    if opts.logarithmic { flags.push('g') }

    let cmd = GrassCmd::new("r.colors").param( "map", raster).flags( &flags);

    if opts.grey {
        return session.run( cmd.param( "color", "grey"))
    }

    match &opts.source {
        ColorSource::RulesFile(name) => {
            let path = find_color_rules( name)?;
            session.run( cmd.param( "rules", path.display()))
        }
        ColorSource::Table(table) => {
            session.run( cmd.param( "color", table))
        }
        ColorSource::Pattern { colors, divergent } => {
            let (min,max) = range;
            let rules = if *divergent { divergent_color_rules( colors, min, max)? } else { color_rules_from_pattern( colors, min, max)? };
            debug!("color rules for {raster}:\n{rules}");
            session.write( cmd.param( "rules", "-"), &rules)?;
            Ok(())
        }
    }
}
