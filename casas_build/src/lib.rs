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

//! runtime resource lookup for casas crates: where to find config files and where to put
//! generated output (the root dir and its `out`, `tmp` subdirs)

use std::{path::{Path,PathBuf}, sync::OnceLock, env};

mod configs;
pub use configs::*;

mod utils;
pub use utils::*;

mod errors;
pub use errors::*;

/* #region bin globals *******************************************************************/

#[derive(Debug)]
pub struct BinContext {
    pub bin_name: String,
    pub bin_crate: String,
    pub proc_id: Option<u32>,
}

impl BinContext {
    pub fn set(bin_name: &str, bin_crate: &str, proc_id: Option<u32>) {
        // a second set is a programming error in the bin, but not worth a panic
        let _ = BIN_CONTEXT.set( Self{ bin_name: bin_name.to_string(), bin_crate: bin_crate.to_string(), proc_id });
    }
}

pub static BIN_CONTEXT: OnceLock<BinContext> = OnceLock::new();

/// this has to be called (once) from the bin source
#[macro_export]
macro_rules! set_bin_context {
    () => {
        {
            casas_build::BinContext::set(env!("CARGO_BIN_NAME"), env!("CARGO_PKG_NAME"), Some(std::process::id()));
        }
    }
}

pub fn get_bin_context()->Option<&'static BinContext> {
    BIN_CONTEXT.get()
}

// the global dirs of the application, which are invariant after init
static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();
static OUT_DIR: OnceLock<PathBuf> = OnceLock::new();
static TMP_DIR: OnceLock<PathBuf> = OnceLock::new();

/// the global root dir: `CASAS_ROOT`
/// this will try to create the directory if it does not exist and panics if that fails
pub fn root_dir()->&'static PathBuf {
    ROOT_DIR.get_or_init(|| get_or_create_root_dir().expect("failed to locate CASAS root"))
}

/// the global output dir: `CASAS_ROOT/out`
pub fn out_dir()->&'static PathBuf {
    OUT_DIR.get_or_init(|| ensure_dir( root_dir().join( Path::new("out"))))
}

/// the global scratch dir for intermediate text files: `CASAS_ROOT/tmp`
pub fn tmp_dir()->&'static PathBuf {
    TMP_DIR.get_or_init(|| ensure_dir( root_dir().join( Path::new("tmp"))))
}

/// Note - this panics if the directory does not exist and can't be created
pub fn ensure_dir (dir: PathBuf)->PathBuf {
    if !&dir.is_dir() {
        std::fs::create_dir_all(&dir).unwrap();
    }
    dir
}

/* #endregion bin globals */

/* #region resource lookup ***************************************************************/

/// locate a resource file within a resource dir (e.g. `configs`) and return its PathBuf
pub fn find_resource_file (resource_dir: &str, ctx: &Option<&BinContext>, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    // check an explicit CASAS_HOME first
    if let Ok(casas_home) = env::var("CASAS_HOME") {
        let mut path = Path::new( casas_home.as_str()).to_path_buf();
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // try the parent of the workspace dir next - this is the first dir outside the source repo
    if let Some(mut path) = get_workspace_parent() {
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // as a last resort try an implicit ~/.casas/CONFIG_DIR
    if let Ok(usr_home) = env::var("HOME") {
        let mut path = Path::new(usr_home.as_str()).to_path_buf();
        path.push(".casas");
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // try to find the resource within the repo
    if let Some(mut path) = get_workspace_dir() {
        if find_internal_resource( &mut path, resource_dir, resource_crate, filename) { return Some(path) }
    }

    None
}

fn find_external_resource (path: &mut PathBuf, resource_dir: &str, bin_ctx: &Option<&BinContext>, resource_crate: &str, filename: &str)->bool {

    // check bin specific override first
    if let Some(ctx) = bin_ctx {
        let bin_crate = ctx.bin_crate.as_str();
        let bin_name = ctx.bin_name.as_str();
        if path_cond!( is_file, path, resource_dir, bin_crate, bin_name, resource_crate, filename) { return true }
    }

    // now check resource crate global
    if path_cond!( is_file, path, resource_dir, resource_crate, filename) { return true }

    false
}

fn find_internal_resource (path: &mut PathBuf, resource_dir: &str, resource_crate: &str, filename: &str)->bool {
    path_cond!( is_file, path, resource_crate, resource_dir, filename)
}

/* #endregion resource lookup */
