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

use std::fs::File;
use std::io::Write;
use std::path::{Path,PathBuf};
use chrono::{DateTime,Utc,SecondsFormat};
use tracing::info;

use crate::interpolation::SurfaceRange;
use crate::errors::Result;

pub const STATS_REPORT: &str = "raster_statistics.csv";

/// write the per-surface statistics of `range` as CSV into `dir`. The first line is a `#` comment with
/// the generation time
pub fn write_stats_report (dir: &Path, range: &SurfaceRange, date: DateTime<Utc>)->Result<PathBuf> {
    let path = dir.join( STATS_REPORT);
    let mut file = File::create( &path)?;
    writeln!( file, "# generated {}", date.to_rfc3339_opts( SecondsFormat::Secs, true))?;

    let mut writer = csv::Writer::from_writer( file);
    for stats in &range.surfaces {
        writer.serialize( stats)?;
    }
    writer.flush()?;

    info!("wrote statistics of {} surfaces to {:?}", range.surfaces.len(), path);
    Ok(path)
}
