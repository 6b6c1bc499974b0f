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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasasGisError>;

#[derive(Error,Debug)]
pub enum CasasGisError {

    #[error("config error {0}")]
    ConfigError( #[from] casas_build::CasasBuildError),

    // pass through for IO errors
    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError( #[from] csv::Error),

    // the engine module could not be started at all
    #[error("execution failed {0}")]
    ExecError(String),

    // the engine module ran but returned a non-zero exit status
    #[error("{module} failed with {status}: {stderr}")]
    CommandFailed { module: String, status: String, stderr: String },

    #[error("another GRASS session is already active")]
    SessionActive,

    #[error("no region mask established in this session")]
    NoRegionMask,

    #[error("failed to parse engine output: {0}")]
    ParseError(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no input maps matching {0}")]
    NoInputMaps(String),

    #[error("no input files in {0}")]
    NoInputFiles(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),
}

pub fn parse_error<S: ToString> (msg: S)->CasasGisError {
    CasasGisError::ParseError(msg.to_string())
}

pub fn invalid_option<S: ToString> (msg: S)->CasasGisError {
    CasasGisError::InvalidOption(msg.to_string())
}
