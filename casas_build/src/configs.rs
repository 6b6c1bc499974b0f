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
use crate::*;
use crate::errors::*;

pub const CONFIGS: &'static str = "configs";

pub fn find_config_file (ctx: &Option<&BinContext>, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    find_resource_file( CONFIGS, ctx, resource_crate, filename)
}

/// this is mostly for tests and tools that want to bypass the lookup and already know the config path
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = file_contents_as_bytes(path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// runtime (crate) part of config management
/// this is the main macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs.
/// Lookup order is `$CASAS_HOME`, the workspace parent, `~/.casas` and finally `<crate>/configs/` within the repo
#[macro_export]
macro_rules! define_load_config {
    () => {
        mod configs {
            /// load config using casas_build - based lookup mechanism
            pub fn load_config<C> (filename: &str) -> casas_build::Result<C> where C: for <'a> serde::Deserialize<'a> {
                let bin_ctx = casas_build::BIN_CONTEXT.get();
                let resource_crate = env!("CARGO_PKG_NAME");

                if let Some(path) = casas_build::find_config_file( &bin_ctx, resource_crate, filename) {
                    return casas_build::load_config_path( &path)
                }

                Err( casas_build::CasasBuildError::ResourceNotFoundError(filename.to_string()) )
            }
        }
        pub use configs::*; // make load_config() visible at the crate level
    }
}
