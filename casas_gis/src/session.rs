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

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug,warn};

use crate::grass::{GrassCmd,GrassEngine,parse_key_values,parse_lines};
use crate::locations::SessionConfig;
use crate::region::RegionInfo;
use crate::errors::{CasasGisError,Result};

/// the explicit state of a GRASS session: the engine that runs the modules, the location/mapset it is
/// bound to, the display monitor we started (if any) and if we did establish a region mask raster.
/// All operations of this crate take a `&mut Session`, reflecting that GRASS modules implicitly read and
/// modify mapset global state (computational region, monitors), i.e. call order matters
pub struct Session<E: GrassEngine> {
    engine: E,
    config: SessionConfig,
    monitor: Option<String>,
    region_mask: Option<String>,
}

impl<E: GrassEngine> Session<E> {
    pub fn new (engine: E, config: SessionConfig)->Self {
        Session { engine, config, monitor: None, region_mask: None }
    }

    pub fn config (&self)->&SessionConfig { &self.config }

    /// run module ignoring its output
    pub fn run (&mut self, cmd: GrassCmd)->Result<()> {
        self.engine.exec( &cmd, None)?;
        Ok(())
    }

    /// run module and return its stdout
    pub fn read (&mut self, cmd: GrassCmd)->Result<String> {
        self.engine.exec( &cmd, None)
    }

    /// run module with `input` fed to its stdin
    pub fn write (&mut self, cmd: GrassCmd, input: &str)->Result<String> {
        self.engine.exec( &cmd, Some(input))
    }

    /// run module and parse its `key=value` output lines
    pub fn parse_command (&mut self, cmd: GrassCmd)->Result<HashMap<String,String>> {
        let output = self.engine.exec( &cmd, None)?;
        Ok( parse_key_values( &output))
    }

    /// names (without mapset) of the maps of `map_type` in the current mapset matching `pattern`
    pub fn list_strings (&mut self, map_type: &str, pattern: &str)->Result<Vec<String>> {
        let cmd = GrassCmd::new("g.list")
            .param( "type", map_type)
            .param( "pattern", pattern)
            .param( "mapset", ".");
        let output = self.read( cmd)?;
        Ok( parse_lines( &output).iter().map(|s| crate::strip_mapset(s).to_string()).collect())
    }

    pub fn mapcalc (&mut self, expr: &str)->Result<()> {
        debug!("mapcalc: {expr}");
        self.run( GrassCmd::new("r.mapcalc").param( "expression", expr).overwrite())
    }

    /// the current computational region
    pub fn region (&mut self)->Result<RegionInfo> {
        let kv = self.parse_command( GrassCmd::new("g.region").flags("g"))?;
        RegionInfo::from_key_values( &kv)
    }

    pub fn gisenv (&mut self)->Result<HashMap<String,String>> {
        self.parse_command( GrassCmd::new("g.gisenv").flags("n"))
    }

    /* #region region mask */

    pub fn set_region_mask (&mut self, raster: &str) {
        self.region_mask = Some( raster.to_string());
    }

    pub fn region_mask (&self)->Option<&str> {
        self.region_mask.as_deref()
    }

    pub fn require_region_mask (&self)->Result<&str> {
        self.region_mask.as_deref().ok_or( CasasGisError::NoRegionMask)
    }

    /* #endregion region mask */

    /* #region display monitor */

    /// start a (file based) png display monitor. A stale monitor from a previous run would make the
    /// start fail, hence we always try to stop it first
    pub fn start_monitor (&mut self, path: &Path, width: u32, height: u32)->Result<()> {
        if self.monitor.is_some() {
            self.stop_monitor()?;
        }
        let stop = GrassCmd::new("d.mon").param( "stop", "png");
        if let Err(e) = self.run( stop) {
            debug!("no stale monitor to stop ({e})");
        }

        self.run( GrassCmd::new("d.mon")
            .param( "start", "png")
            .param( "output", path.display())
            .param( "width", width)
            .param( "height", height)
            .overwrite())?;
        self.monitor = Some( "png".to_string());
        Ok(())
    }

    /// stop the monitor we started. This is when the image file gets written
    pub fn stop_monitor (&mut self)->Result<()> {
        if let Some(mon) = self.monitor.take() {
            self.run( GrassCmd::new("d.mon").param( "stop", mon))?;
        }
        Ok(())
    }

    pub fn has_monitor (&self)->bool { self.monitor.is_some() }

    /* #endregion display monitor */
}

impl<E: GrassEngine> Drop for Session<E> {
    fn drop (&mut self) {
        if self.monitor.is_some() {
            if let Err(e) = self.stop_monitor() {
                warn!("failed to stop display monitor: {e}");
            }
        }
    }
}
