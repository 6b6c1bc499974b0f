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

use serde::{Deserialize,Deserializer};
use std::{io::Read,path::{Path,PathBuf},fs::{self,File},env};
use crate::errors::Result;

pub fn file_contents_as_bytes (path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// expand `~` and `$VAR` path elements of a string path. Unset variables are kept verbatim
pub fn expand_path (s: &str)->PathBuf {
    let mut res: PathBuf = PathBuf::new();

    for (i,e) in Path::new(s).iter().enumerate() {
        let e = e.to_string_lossy();
        if i == 0 && e == "~" {
            match env::var("HOME") {
                Ok(home) => res.push(home),
                Err(_) => res.push(e.as_ref())
            }
        } else if e.starts_with('$') && e.len() > 1 {
            match env::var(&e[1..]) {
                Ok(se) => res.push(se),
                Err(_) => res.push(e.as_ref())
            }
        } else {
            res.push(e.as_ref())
        }
    }
    res
}

pub fn deserialize_expand_path <'a,D>(deserializer: D) -> std::result::Result<PathBuf,D::Error> where D: Deserializer<'a> {
    String::deserialize(deserializer).map( |s| expand_path( s.as_str()))
}

pub fn deserialize_opt_expand_path <'a,D>(deserializer: D) -> std::result::Result<Option<PathBuf>,D::Error> where D: Deserializer<'a> {
    Option::<String>::deserialize(deserializer).map( |opt| opt.map( |s| expand_path( s.as_str())))
}

/// modify path and check if path condition holds. If not revert the path to its previous state
#[macro_export]
macro_rules! path_cond {
    ( $pred:ident, $path_expr:expr, $($e:expr),* ) => {
        {
            let path: &mut PathBuf = $path_expr;
            let n0 = path.components().count();
            $( path.push($e); )*
            if path.$pred() {
                true
            } else {
                // restore path
                let mut n = path.components().count();
                while n > n0 { path.pop(); n -= 1; }
                false
            }
        }
    }
}

#[macro_export]
macro_rules! has_any_path_cond {
    ($pred:ident, $path_expr:expr, $($e:expr),*) => {
        {
            let path: &mut PathBuf = $path_expr;
            let mut holds = |e| { path.push(e); let res=path.$pred(); path.pop(); res };
            $( holds($e) || )* false
        }
    }
}

/// this is the highest parent from the current dir that still has a Cargo.toml
pub fn get_workspace_dir()->Option<PathBuf> {
    if let Ok(mut path) = env::current_dir() {
        while path_cond!( is_file, &mut path, "..", "Cargo.toml") {
            path.pop(); // pops Cargo.toml
            path.pop(); // pops ".."
            if !path.pop() { return None } // no parent
        }
        return Some(path)
    }
    None
}

pub fn get_workspace_parent()->Option<PathBuf> {
    get_workspace_dir().map( |mut p| { p.pop(); p})
}

pub fn get_env_casas_root()->Option<PathBuf> {
    env::var("CASAS_ROOT").ok().map( |root| expand_path( root.as_str()))
}

pub fn default_casas_root()->PathBuf {
    let mut path = env::var("HOME").map( |home| PathBuf::from(home)).unwrap_or_else( |_| PathBuf::from("."));
    path.push( ".casas");
    path
}

/// get the root dir to use. If this returns Ok the path is guaranteed to exist.
/// Lookup is in the following order:
///
/// 1. use $CASAS_ROOT if set
/// 2. workspace parent if it has any of the casas dirs {out,configs,color_rules}
/// 3. $HOME/.casas
pub fn get_or_create_root_dir()->Result<PathBuf> {
    let path = if let Some(path) = get_env_casas_root() {
        path

    } else {
        let computed_path = if let Some(mut path) = get_workspace_parent() {
            if has_any_path_cond!( is_dir, &mut path, "out", "configs", "color_rules") {
                path
            } else {
                default_casas_root()
            }
        } else {
            default_casas_root()
        };
        // automatically set CASAS_ROOT to the computed path for the current process and the engine processes we spawn
        // NOTE - this is not multi-threaded. Caller has to make sure this assumption holds
        unsafe {
            env::set_var("CASAS_ROOT", &computed_path);
        }

        computed_path
    };

    if !path.is_dir() {
        fs::create_dir_all(&path)?;
    }
    Ok( path )
}

