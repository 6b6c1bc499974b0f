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

//! low level access to GRASS GIS modules
//!
//! GRASS modules are separate executables that get all their context (database, location, mapset,
//! computational region) from a `GISRC` file plus the `GISBASE` environment. We model a single
//! invocation as a [`GrassCmd`] and the thing that runs it as a [`GrassEngine`], which lets us
//! substitute the real [`ProcessEngine`] with scripted engines in tests.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::{Path,PathBuf};
use std::process::{Command,Stdio};
use std::sync::atomic::{AtomicBool,Ordering};
use tracing::{debug,info,warn};

use casas_common::fs::ensure_writable_dir;
use crate::locations::SessionConfig;
use crate::errors::{CasasGisError,Result,parse_error};

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Verbosity { Normal, Quiet, Verbose }

/// one GRASS module invocation, e.g. `v.extract -t input=a output=b where="x > 1" --overwrite`
#[derive(Debug,Clone,PartialEq)]
pub struct GrassCmd {
    pub module: String,
    pub flags: String,
    pub params: Vec<(String,String)>,
    pub overwrite: bool,
    pub verbosity: Verbosity,
}

impl GrassCmd {
    pub fn new (module: &str)->Self {
        GrassCmd { module: module.to_string(), flags: String::new(), params: Vec::new(), overwrite: false, verbosity: Verbosity::Normal }
    }

    pub fn flags (mut self, flags: &str)->Self {
        for c in flags.chars() {
            if !self.flags.contains(c) { self.flags.push(c) }
        }
        self
    }

    pub fn param (mut self, key: &str, value: impl ToString)->Self {
        let value = value.to_string();
        if let Some(p) = self.params.iter_mut().find(|p| p.0 == key) {
            p.1 = value;
        } else {
            self.params.push( (key.to_string(), value));
        }
        self
    }

    pub fn opt_param<T: ToString> (self, key: &str, value: Option<T>)->Self {
        match value {
            Some(v) => self.param( key, v),
            None => self
        }
    }

    pub fn overwrite (mut self)->Self { self.overwrite = true; self }
    pub fn quiet (mut self)->Self { self.verbosity = Verbosity::Quiet; self }
    pub fn verbose (mut self)->Self { self.verbosity = Verbosity::Verbose; self }

    pub fn get (&self, key: &str)->Option<&str> {
        self.params.iter().find(|p| p.0 == key).map(|p| p.1.as_str())
    }

    pub fn has_flag (&self, flag: char)->bool {
        self.flags.contains(flag)
    }

    /// the argv (without module name) as passed to the module executable
    pub fn args (&self)->Vec<String> {
        let mut args = Vec::with_capacity( self.params.len() + 3);
        if !self.flags.is_empty() {
            args.push( format!("-{}", self.flags));
        }
        for (k,v) in &self.params {
            args.push( format!("{k}={v}"));
        }
        if self.overwrite { args.push( "--overwrite".to_string()) }
        match self.verbosity {
            Verbosity::Quiet => args.push( "--quiet".to_string()),
            Verbosity::Verbose => args.push( "--verbose".to_string()),
            Verbosity::Normal => {}
        }
        args
    }
}

impl fmt::Display for GrassCmd {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "{}", self.module)?;
        for a in self.args() {
            if a.contains(' ') { write!(f, " \"{a}\"")? } else { write!(f, " {a}")? }
        }
        Ok(())
    }
}

/// something that can execute GRASS modules within an established session context
pub trait GrassEngine {
    /// run `cmd`, optionally feeding `stdin` to it, and return its stdout
    fn exec (&mut self, cmd: &GrassCmd, stdin: Option<&str>)->Result<String>;
}

/* #region process engine ****************************************************************************/

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// a [`GrassEngine`] that runs modules as child processes of a GRASS installation.
/// There can only be one of them at any given time since GRASS sessions share the computational
/// region and display monitor state of the mapset
#[derive(Debug)]
pub struct ProcessEngine {
    gisbase: PathBuf,
    gisrc: PathBuf,
}

impl ProcessEngine {
    /// open a session for the database/location/mapset given by `config`. `grassbin` is the GRASS
    /// start script that is used to find the installation (`grass --config path`)
    pub fn open (grassbin: &str, config: &SessionConfig, gisrc_dir: &Path)->Result<Self> {
        if SESSION_ACTIVE.swap( true, Ordering::SeqCst) {
            return Err( CasasGisError::SessionActive)
        }

        match Self::init( grassbin, config, gisrc_dir) {
            Ok(engine) => Ok(engine),
            Err(e) => {
                SESSION_ACTIVE.store( false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn init (grassbin: &str, config: &SessionConfig, gisrc_dir: &Path)->Result<Self> {
        let gisbase = get_gisbase( grassbin)?;

        let gisdb = config.gisdb();
        let mapset_dir = gisdb.join( &config.location).join( &config.mapset);
        if !mapset_dir.is_dir() {
            return Err( CasasGisError::ExecError( format!("no such mapset {:?}", mapset_dir)))
        }

        ensure_writable_dir( gisrc_dir)?;
        let gisrc = gisrc_dir.join( format!("gisrc_{}_{}", config.location, std::process::id()));
        let contents = format!("GISDBASE: {}\nLOCATION_NAME: {}\nMAPSET: {}\nGUI: text\n",
                               gisdb.display(), config.location, config.mapset);
        std::fs::write( &gisrc, contents)?;

        info!("opened GRASS session {}/{} in {:?}", config.location, config.mapset, gisdb);
        Ok( ProcessEngine { gisbase, gisrc })
    }

    fn command (&self, module: &str)->Command {
        let mut cmd = Command::new( module);

        cmd.env( "GISBASE", &self.gisbase);
        cmd.env( "GISRC", &self.gisrc);
        cmd.env( "PATH", prepend_paths( &[self.gisbase.join("bin"), self.gisbase.join("scripts")], "PATH"));
        cmd.env( "LD_LIBRARY_PATH", prepend_paths( &[self.gisbase.join("lib")], "LD_LIBRARY_PATH"));
        cmd.env( "PYTHONPATH", prepend_paths( &[self.gisbase.join("etc").join("python")], "PYTHONPATH"));

        cmd
    }
}

impl GrassEngine for ProcessEngine {
    fn exec (&mut self, gcmd: &GrassCmd, stdin: Option<&str>)->Result<String> {
        debug!("executing {gcmd}");

        let mut cmd = self.command( &gcmd.module);
        cmd.args( gcmd.args())
            .stdin( if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout( Stdio::piped())
            .stderr( Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| CasasGisError::ExecError( format!("{}: {}", gcmd.module, e)))?;

        // the child has to be reaped even if it stops reading its input early (broken pipe)
        let written = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut child_stdin)) => child_stdin.write_all( input.as_bytes()), // dropping child_stdin closes the pipe
            _ => Ok(())
        };

        let output = child.wait_with_output().map_err(|e| CasasGisError::ExecError( format!("{}: {}", gcmd.module, e)))?;
        let stdout = String::from_utf8_lossy( &output.stdout).to_string();

        if output.status.success() && written.is_ok() {
            debug!("{} completed with status {}", gcmd.module, output.status);
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy( &output.stderr).trim().to_string();
            if let Err(e) = &written {
                warn!("{} did not accept its input: {e}", gcmd.module);
            }
            warn!("{} failed with status {}", gcmd.module, output.status);
            Err( CasasGisError::CommandFailed { module: gcmd.module.clone(), status: output.status.to_string(), stderr })
        }
    }
}

impl Drop for ProcessEngine {
    fn drop (&mut self) {
        if let Err(e) = std::fs::remove_file( &self.gisrc) {
            warn!("failed to remove {:?}: {e}", self.gisrc);
        }
        SESSION_ACTIVE.store( false, Ordering::SeqCst);
        info!("closed GRASS session");
    }
}

/// ask the GRASS start script where the installation is
pub fn get_gisbase (grassbin: &str)->Result<PathBuf> {
    let output = Command::new( grassbin).arg("--config").arg("path").output()
        .map_err(|e| CasasGisError::ExecError( format!("{grassbin}: {e}")))?;

    if !output.status.success() {
        return Err( CasasGisError::CommandFailed {
            module: grassbin.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy( &output.stderr).trim().to_string()
        })
    }

    let path = String::from_utf8_lossy( &output.stdout).trim().to_string();
    if path.is_empty() {
        Err( parse_error( format!("{grassbin} --config path returned nothing")))
    } else {
        Ok( PathBuf::from( path))
    }
}

fn prepend_paths (dirs: &[PathBuf], var: &str)->OsString {
    let mut paths: Vec<PathBuf> = dirs.to_vec();
    if let Some(existing) = std::env::var_os( var) {
        paths.extend( std::env::split_paths( &existing));
    }
    std::env::join_paths( paths).unwrap_or_default()
}

/* #endregion process engine */

/* #region output parsing ****************************************************************************/

/// parse `key=value` (or `key: value`) lines as produced by modules run with `-g` / shell style output.
/// Lines without separator are ignored
pub fn parse_key_values (text: &str)->HashMap<String,String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() { continue }

        let kv = line.split_once('=').or_else(|| line.split_once(':'));
        if let Some((k,v)) = kv {
            let v = v.trim().trim_matches(|c| c == '"' || c == '\'');
            map.insert( k.trim().to_string(), v.to_string());
        }
    }
    map
}

pub fn parse_f64 (map: &HashMap<String,String>, key: &str)->Result<f64> {
    let v = map.get(key).ok_or_else(|| parse_error( format!("missing key '{key}'")))?;
    v.parse::<f64>().map_err(|_| parse_error( format!("not a number for '{key}': {v}")))
}

pub fn parse_usize (map: &HashMap<String,String>, key: &str)->Result<usize> {
    let v = map.get(key).ok_or_else(|| parse_error( format!("missing key '{key}'")))?;
    // some modules report integral values in float notation
    v.parse::<usize>()
        .or_else(|_| v.parse::<f64>().map(|x| x as usize))
        .map_err(|_| parse_error( format!("not an integer for '{key}': {v}")))
}

/// non-empty output lines (e.g. from `g.list`)
pub fn parse_lines (text: &str)->Vec<String> {
    text.lines().map(|l| l.trim()).filter(|l| !l.is_empty()).map(|l| l.to_string()).collect()
}

/* #endregion output parsing */
