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

//! reading PBDM model output (tab separated text files with a header row) and extracting the
//! lon/lat/variable tables we import as vector point maps

use std::fmt;
use std::path::{Path,PathBuf};
use std::str::FromStr;
use regex::Regex;
use tracing::{info,debug};

use casas_common::fs::{matching_files_in_dir,filestem,ensure_writable_dir};
use crate::errors::{CasasGisError,Result,invalid_option};
use crate::legal_name;

/// a column reference, either by zero based index or by header name
#[derive(Debug,Clone,PartialEq)]
pub enum ColumnId {
    Index(usize),
    Name(String),
}

impl FromStr for ColumnId {
    type Err = CasasGisError;

    fn from_str (s: &str)->Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            Err( invalid_option("empty column id"))
        } else if let Ok(idx) = s.parse::<usize>() {
            Ok( ColumnId::Index(idx))
        } else {
            Ok( ColumnId::Name(s.to_string()))
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        match self {
            ColumnId::Index(idx) => write!(f, "{idx}"),
            ColumnId::Name(name) => write!(f, "{name}"),
        }
    }
}

/// one model output file
#[derive(Debug,Clone)]
pub struct InputTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InputTable {
    pub fn read (path: &Path)->Result<Self> {
        let name = filestem( &path).unwrap_or("input").to_string();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path( path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for res in reader.records() {
            let rec = res?;
            if rec.iter().all(|f| f.is_empty()) { continue }
            rows.push( rec.iter().map(|f| f.to_string()).collect());
        }

        Ok( InputTable { name, headers, rows })
    }

    pub fn n_rows (&self)->usize { self.rows.len() }
    pub fn n_columns (&self)->usize { self.headers.len() }

    pub fn column_index (&self, id: &ColumnId)->Result<usize> {
        match id {
            ColumnId::Index(idx) => {
                if *idx < self.headers.len() { Ok(*idx) }
                else { Err( invalid_option( format!("column {idx} out of range for {} ({} columns)", self.name, self.headers.len()))) }
            }
            ColumnId::Name(name) => self.headers.iter().position(|h| h == name)
                .ok_or_else(|| invalid_option( format!("no column '{name}' in {}", self.name)))
        }
    }

    /// write a lon/lat/variable table named `<table>_<variable>.txt` into `dir`
    pub fn select_variable (&self, dir: &Path, lon: &ColumnId, lat: &ColumnId, variable: &ColumnId)->Result<PathBuf> {
        let cols = [ self.column_index(lon)?, self.column_index(lat)?, self.column_index(variable)? ];
        let var_name = legal_name( &self.headers[cols[2]]);
        let path = dir.join( format!("{}_{}.txt", self.name, var_name));

        let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path( &path)?;
        writer.write_record( cols.iter().map(|i| self.headers[*i].as_str()))?;
        for row in &self.rows {
            writer.write_record( cols.iter().map(|i| row.get(*i).map(|s| s.as_str()).unwrap_or("")))?;
        }
        writer.flush()?;

        debug!("wrote {} rows to {:?}", self.rows.len(), path);
        Ok(path)
    }
}

/// read all `*.txt` model output files in `dir` (sorted by name)
pub fn read_input_dir (dir: &Path)->Result<Vec<InputTable>> {
    let re = Regex::new(r"\.txt$").map_err(|e| invalid_option(e))?;
    let files = matching_files_in_dir( &dir, &re)?;
    if files.is_empty() {
        return Err( CasasGisError::NoInputFiles( dir.display().to_string()))
    }

    let mut tables = Vec::with_capacity( files.len());
    for path in &files {
        let table = InputTable::read( path)?;
        info!("{} has {} rows and {} columns", table.name, table.n_rows(), table.n_columns());
        tables.push( table);
    }
    Ok(tables)
}

/// extract the lon/lat/variable tables of all model output files in `input_dir` into `tmp_dir`
pub fn prepare_input_tables (input_dir: &Path, tmp_dir: &Path, lon: &ColumnId, lat: &ColumnId, variable: &ColumnId)->Result<Vec<PathBuf>> {
    ensure_writable_dir( tmp_dir)?;

    let tables = read_input_dir( input_dir)?;
    let mut paths = Vec::with_capacity( tables.len());
    for table in &tables {
        paths.push( table.select_variable( tmp_dir, lon, lat, variable)?);
    }
    Ok(paths)
}
