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
#![allow(unused)]

//! a scripted in-memory GRASS engine for tests. It keeps track of the vector/raster maps, the region and the
//! display monitor of each location, and records every module invocation

use std::cell::RefCell;
use std::collections::{BTreeMap,HashMap,HashSet};
use std::path::Path;
use std::rc::Rc;
use regex::Regex;

use casas_common::BoundingBox;
use casas_gis::grass::{GrassCmd,GrassEngine};
use casas_gis::session::Session;
use casas_gis::locations::SessionConfig;
use casas_gis::errors::{CasasGisError,Result};

#[derive(Debug,Clone,Default)]
pub struct MockPoint {
    pub x: f64,
    pub y: f64,
    pub values: HashMap<String,f64>,
}

#[derive(Debug,Clone)]
pub struct MockArea {
    pub attrs: HashMap<String,String>,
    pub bbox: BoundingBox<f64>,
}

#[derive(Debug,Clone,Default)]
pub struct MockVector {
    pub columns: Vec<String>,
    pub points: Vec<MockPoint>,
    pub areas: Vec<MockArea>,
}

impl MockVector {
    pub fn extent (&self)->Option<BoundingBox<f64>> {
        let mut bbox: Option<BoundingBox<f64>> = None;
        for a in &self.areas {
            bbox = Some( match bbox { Some(b) => b.union(&a.bbox), None => a.bbox });
        }
        for p in &self.points {
            let pb = BoundingBox::new( p.x, p.y, p.x, p.y);
            bbox = Some( match bbox { Some(b) => b.union(&pb), None => pb });
        }
        bbox
    }

    pub fn column_values (&self, column: &str)->Vec<f64> {
        self.points.iter().filter_map(|p| p.values.get(column).copied()).collect()
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct MockRaster {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
    pub n: usize,
    pub color_rules: Option<String>,
}

impl MockRaster {
    pub fn constant (v: f64, n: usize)->Self {
        MockRaster { min: v, max: v, mean: v, stddev: 0.0, n, color_rules: None }
    }

    pub fn from_values (values: &[f64])->Self {
        let n = values.len();
        let min = values.iter().cloned().fold( f64::MAX, f64::min);
        let max = values.iter().cloned().fold( f64::MIN, f64::max);
        let mean = values.iter().sum::<f64>() / n as f64;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
        MockRaster { min, max, mean, stddev: var.sqrt(), n, color_rules: None }
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct MockRegion {
    pub n: f64,
    pub s: f64,
    pub e: f64,
    pub w: f64,
    pub res: f64,
}

impl MockRegion {
    pub fn rows (&self)->usize { ((self.n - self.s) / self.res).round() as usize }
    pub fn cols (&self)->usize { ((self.e - self.w) / self.res).round() as usize }
}

/// the state of one GRASS location (we only have one mapset per location)
#[derive(Debug,Clone,Default)]
pub struct MockLocation {
    pub vectors: BTreeMap<String,MockVector>,
    pub rasters: BTreeMap<String,MockRaster>,
    pub region: Option<MockRegion>,
    pub monitor: Option<String>,
}

#[derive(Debug,Clone)]
pub struct MockCall {
    pub location: String,
    pub cmd: GrassCmd,
    pub stdin: Option<String>,
}

pub struct MockWorld {
    pub gisdb: String,
    pub locations: HashMap<String,MockLocation>,
    pub calls: Vec<MockCall>,
    pub fail_modules: HashSet<String>,
    pub elevation: fn(f64,f64)->f64,
    pub estimate_output: String,
    pub cv_table: String,
}

/// the default elevation model: height grows from west to east
pub fn west_east_elevation (x: f64, _y: f64)->f64 { x }

pub const CV_TABLE: &str = "\
 lambda | mean | rms |
 0.0001| -0.0351| 1.9410|
 0.001| -0.0298| 1.7320|
 0.01| -0.0211| 1.5011|
 0.1| -0.0185| 1.5011|
 1| 0.0023| 2.2802|
";

impl MockWorld {
    pub fn new ()->Self {
        MockWorld {
            gisdb: "/tmp/grassdata".to_string(),
            locations: HashMap::new(),
            calls: Vec::new(),
            fail_modules: HashSet::new(),
            elevation: west_east_elevation,
            estimate_output: "Estimated point density: 1.2e-07\nEstimated mean distance between points: 2500.5\n".to_string(),
            cv_table: CV_TABLE.to_string(),
        }
    }

    pub fn location (&mut self, name: &str)->&mut MockLocation {
        self.locations.entry( name.to_string()).or_default()
    }

    pub fn calls_of (&self, module: &str)->Vec<GrassCmd> {
        self.calls.iter().filter(|c| c.cmd.module == module).map(|c| c.cmd.clone()).collect()
    }

    pub fn stdin_of (&self, module: &str)->Vec<String> {
        self.calls.iter().filter(|c| c.cmd.module == module).filter_map(|c| c.stdin.clone()).collect()
    }
}

pub type World = Rc<RefCell<MockWorld>>;

pub fn mock_world ()->World {
    Rc::new( RefCell::new( MockWorld::new()))
}

pub struct MockGrass {
    pub world: World,
    pub location: String,
}

impl MockGrass {
    pub fn new (world: &World, location: &str)->Self {
        world.borrow_mut().location( location);
        MockGrass { world: world.clone(), location: location.to_string() }
    }
}

pub fn session_config (location: &str)->SessionConfig {
    SessionConfig::new( Some("/tmp/grassdata".into()), location, "medgold")
}

pub fn mock_session (world: &World, location: &str)->Session<MockGrass> {
    Session::new( MockGrass::new( world, location), session_config( location))
}

fn failed (module: &str, msg: impl ToString)->CasasGisError {
    CasasGisError::CommandFailed { module: module.to_string(), status: "exit status: 1".to_string(), stderr: format!("ERROR: {}", msg.to_string()) }
}

fn req<'a> (cmd: &'a GrassCmd, key: &str)->Result<&'a str> {
    cmd.get(key).ok_or_else(|| failed( &cmd.module, format!("required parameter <{key}> not set")))
}

fn req_f64 (cmd: &GrassCmd, key: &str)->Result<f64> {
    let v = req( cmd, key)?;
    v.parse::<f64>().map_err(|_| failed( &cmd.module, format!("<{key}> not a number: {v}")))
}

fn glob_match (pattern: &str, name: &str)->bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with( prefix),
        None => pattern == name
    }
}

/// evaluate a `(col op num) and (..)` where clause. An empty clause selects everything
fn eval_where (clause: &str, values: &HashMap<String,f64>)->std::result::Result<bool,String> {
    let clause = clause.trim();
    if clause.is_empty() { return Ok(true) }

    for cond in clause.split(" and ") {
        let c = cond.trim().trim_start_matches('(').trim_end_matches(')').trim();
        let mut parsed = None;
        for op in ["<=", ">=", "<", ">", "="] {
            if let Some(idx) = c.find(op) {
                parsed = Some( (c[..idx].trim(), op, c[idx+op.len()..].trim()));
                break
            }
        }
        let (col, op, num) = parsed.ok_or_else(|| format!("malformed condition '{c}'"))?;
        let v = *values.get(col).ok_or_else(|| format!("no column '{col}'"))?;
        let x: f64 = num.parse().map_err(|_| format!("not a number '{num}'"))?;
        let ok = match op {
            "<=" => v <= x,
            ">=" => v >= x,
            "<" => v < x,
            ">" => v > x,
            _ => v == x
        };
        if !ok { return Ok(false) }
    }
    Ok(true)
}

fn kv_lines (pairs: &[(&str,String)])->String {
    pairs.iter().map(|(k,v)| format!("{k}={v}\n")).collect()
}

impl GrassEngine for MockGrass {
    fn exec (&mut self, cmd: &GrassCmd, stdin: Option<&str>)->Result<String> {
        let mut world = self.world.borrow_mut();
        world.calls.push( MockCall { location: self.location.clone(), cmd: cmd.clone(), stdin: stdin.map(|s| s.to_string()) });

        if world.fail_modules.contains( &cmd.module) {
            return Err( failed( &cmd.module, "scripted failure"))
        }

        let elevation = world.elevation;
        let gisdb = world.gisdb.clone();
        let estimate_output = world.estimate_output.clone();
        let cv_table = world.cv_table.clone();

        // v.proj reads from another location
        if cmd.module == "v.proj" {
            let input = req( cmd, "input")?;
            let src_location = req( cmd, "location")?;
            let src = world.locations.get( src_location).and_then(|l| l.vectors.get(input)).cloned()
                .ok_or_else(|| failed( "v.proj", format!("vector <{input}> not found in {src_location}")))?;
            world.location( &self.location).vectors.insert( cmd.get("output").unwrap_or(input).to_string(), src);
            return Ok( String::new())
        }

        let location = self.location.clone();
        let loc = world.location( &location);
        let module = cmd.module.as_str();

        match module {
            "g.list" => {
                let pattern = cmd.get("pattern").unwrap_or("*");
                let names: Vec<String> = match req( cmd, "type")? {
                    "vector" => loc.vectors.keys().filter(|n| glob_match( pattern, n)).cloned().collect(),
                    "raster" => loc.rasters.keys().filter(|n| glob_match( pattern, n)).cloned().collect(),
                    t => return Err( failed( module, format!("unknown type {t}")))
                };
                Ok( names.iter().map(|n| format!("{n}@medgold\n")).collect())
            }

            "g.remove" => {
                let pattern = req( cmd, "pattern")?;
                match req( cmd, "type")? {
                    "vector" => loc.vectors.retain(|n,_| !glob_match( pattern, n)),
                    "raster" => loc.rasters.retain(|n,_| !glob_match( pattern, n)),
                    t => return Err( failed( module, format!("unknown type {t}")))
                }
                Ok( String::new())
            }

            "g.gisenv" => {
                Ok( kv_lines( &[ ("GISDBASE", gisdb), ("LOCATION_NAME", location.clone()), ("MAPSET", "medgold".to_string()) ]))
            }

            "g.region" => {
                if cmd.has_flag('g') {
                    let r = loc.region.ok_or_else(|| failed( module, "no region"))?;
                    Ok( kv_lines( &[
                        ("projection", "99".to_string()), ("zone", "0".to_string()),
                        ("n", r.n.to_string()), ("s", r.s.to_string()), ("w", r.w.to_string()), ("e", r.e.to_string()),
                        ("nsres", r.res.to_string()), ("ewres", r.res.to_string()),
                        ("rows", r.rows().to_string()), ("cols", r.cols().to_string()), ("cells", (r.rows() * r.cols()).to_string()),
                    ]))
                } else {
                    loc.region = Some( MockRegion {
                        n: req_f64( cmd, "n")?, s: req_f64( cmd, "s")?, e: req_f64( cmd, "e")?, w: req_f64( cmd, "w")?, res: req_f64( cmd, "res")?
                    });
                    Ok( String::new())
                }
            }

            "v.info" => {
                let map = req( cmd, "map")?;
                let v = loc.vectors.get(map).ok_or_else(|| failed( module, format!("vector <{map}> not found")))?;
                if cmd.has_flag('c') {
                    let mut s = "INTEGER|cat\n".to_string();
                    for c in &v.columns { s.push_str( &format!("DOUBLE PRECISION|{c}\n")) }
                    Ok(s)
                } else {
                    let b = v.extent().ok_or_else(|| failed( module, format!("vector <{map}> is empty")))?;
                    Ok( kv_lines( &[ ("north", b.north.to_string()), ("south", b.south.to_string()), ("east", b.east.to_string()),
                                     ("west", b.west.to_string()), ("top", "0".to_string()), ("bottom", "0".to_string()) ]))
                }
            }

            "v.extract" => {
                let input = req( cmd, "input")?;
                let output = req( cmd, "output")?.to_string();
                let clause = cmd.get("where").unwrap_or("");
                let src = loc.vectors.get(input).cloned().ok_or_else(|| failed( module, format!("vector <{input}> not found")))?;

                let mut out = MockVector { columns: src.columns.clone(), ..MockVector::default() };
                if !src.areas.is_empty() {
                    let re = Regex::new(r"^(\w+) IN \((.*)\)$").unwrap();
                    let caps = re.captures( clause.trim()).ok_or_else(|| failed( module, format!("unsupported where clause '{clause}'")))?;
                    let column = &caps[1];
                    let codes: Vec<String> = caps[2].split(',').map(|c| c.trim().trim_matches('\'').to_string()).collect();
                    if !src.columns.iter().any(|c| c == column) {
                        return Err( failed( module, format!("column '{column}' not found")))
                    }
                    out.areas = src.areas.iter().filter(|a| a.attrs.get(column).map(|v| codes.contains(v)).unwrap_or(false)).cloned().collect();
                } else {
                    for p in &src.points {
                        if eval_where( clause, &p.values).map_err(|e| failed( module, e))? {
                            out.points.push( p.clone());
                        }
                    }
                }
                loc.vectors.insert( output, out);
                Ok( String::new())
            }

            "v.to.rast" => {
                let input = req( cmd, "input")?;
                if !loc.vectors.contains_key(input) { return Err( failed( module, format!("vector <{input}> not found"))) }
                let r = loc.region.ok_or_else(|| failed( module, "no region"))?;
                loc.rasters.insert( req( cmd, "output")?.to_string(), MockRaster::constant( 1.0, r.rows() * r.cols()));
                Ok( String::new())
            }

            "r.mapcalc" => {
                let expr = req( cmd, "expression")?;
                let (target, rhs) = expr.split_once(" = ").ok_or_else(|| failed( module, format!("syntax error in '{expr}'")))?;
                let target = target.trim();

                let ident = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
                for m in ident.find_iter( rhs) {
                    let name = m.as_str();
                    if name == "if" || name == "null" { continue }
                    if !loc.rasters.contains_key(name) {
                        return Err( failed( module, format!("raster map <{name}> not found")))
                    }
                }

                let clip = Regex::new(r"^if\(\((\w+) >= ([-0-9.e]+)\) && \((\w+) <= ([-0-9.e]+)\), (\w+), null\(\)\)$").unwrap();
                if let Some(caps) = clip.captures( rhs.trim()) {
                    let lo: f64 = caps[2].parse().unwrap();
                    let hi: f64 = caps[4].parse().unwrap();
                    if let Some(r) = loc.rasters.get_mut( target) {
                        r.min = r.min.max(lo);
                        r.max = r.max.min(hi);
                    }
                } else if !loc.rasters.contains_key( target) {
                    loc.rasters.insert( target.to_string(), MockRaster::constant( 1.0, 0));
                }
                Ok( String::new())
            }

            "v.in.ascii" => {
                let input = req( cmd, "input")?;
                let text = std::fs::read_to_string( input).map_err(|e| failed( module, format!("{input}: {e}")))?;
                let skip: usize = cmd.get("skip").and_then(|s| s.parse().ok()).unwrap_or(0);
                let columns: Vec<String> = req( cmd, "columns")?.split(',')
                    .filter_map(|c| c.split_whitespace().next().map(|s| s.to_string())).collect();
                if columns.len() != 3 { return Err( failed( module, "expected 3 columns")) }

                let mut v = MockVector { columns: columns.clone(), ..MockVector::default() };
                for line in text.lines().skip(skip) {
                    let fields: Vec<f64> = line.split('\t').filter_map(|f| f.trim().parse::<f64>().ok()).collect();
                    if fields.len() < 3 { continue }
                    let mut values = HashMap::new();
                    for (i,c) in columns.iter().enumerate() { values.insert( c.clone(), fields[i]); }
                    v.points.push( MockPoint { x: fields[0], y: fields[1], values });
                }
                loc.vectors.insert( req( cmd, "output")?.to_string(), v);
                Ok( String::new())
            }

            "v.db.addcolumn" => {
                let map = req( cmd, "map")?;
                let column = req( cmd, "columns")?.split_whitespace().next().unwrap_or("").to_string();
                let v = loc.vectors.get_mut(map).ok_or_else(|| failed( module, format!("vector <{map}> not found")))?;
                if v.columns.contains( &column) {
                    return Err( failed( module, format!("column <{column}> already exists")))
                }
                v.columns.push( column);
                Ok( String::new())
            }

            "v.what.rast" => {
                let map = req( cmd, "map")?;
                let raster = req( cmd, "raster")?;
                let column = req( cmd, "column")?.to_string();
                if !loc.rasters.contains_key(raster) { return Err( failed( module, format!("raster <{raster}> not found"))) }
                let v = loc.vectors.get_mut(map).ok_or_else(|| failed( module, format!("vector <{map}> not found")))?;
                if !v.columns.contains( &column) { return Err( failed( module, format!("column <{column}> not found"))) }
                for p in v.points.iter_mut() {
                    p.values.insert( column.clone(), elevation( p.x, p.y));
                }
                Ok( String::new())
            }

            "v.surf.idw" => {
                let input = req( cmd, "input")?;
                let column = req( cmd, "column")?;
                let v = loc.vectors.get(input).ok_or_else(|| failed( module, format!("vector <{input}> not found")))?;
                let values = v.column_values( column);
                if values.is_empty() { return Err( failed( module, "no data points found")) }
                loc.rasters.insert( req( cmd, "output")?.to_string(), MockRaster::from_values( &values));
                Ok( String::new())
            }

            "v.surf.bspline" => {
                let input = req( cmd, "input")?;
                let column = req( cmd, "column")?;
                let v = loc.vectors.get(input).ok_or_else(|| failed( module, format!("vector <{input}> not found")))?;
                let values = v.column_values( column);
                if values.is_empty() { return Err( failed( module, "no data points found")) }

                if cmd.has_flag('e') {
                    Ok( estimate_output)
                } else if cmd.has_flag('c') {
                    Ok( cv_table)
                } else {
                    if let Some(mask) = cmd.get("mask") {
                        if !loc.rasters.contains_key(mask) { return Err( failed( module, format!("raster <{mask}> not found"))) }
                    }
                    req_f64( cmd, "lambda_i")?;
                    // splines overshoot the range of the input values
                    let mut r = MockRaster::from_values( &values);
                    let d = (r.max - r.min).max(1.0) * 0.1;
                    r.min -= d;
                    r.max += d;
                    loc.rasters.insert( req( cmd, "raster_output")?.to_string(), r);
                    Ok( String::new())
                }
            }

            "v.univar" => {
                let map = req( cmd, "map")?;
                let column = req( cmd, "column")?;
                let v = loc.vectors.get(map).ok_or_else(|| failed( module, format!("vector <{map}> not found")))?;
                let r = MockRaster::from_values( &v.column_values( column));
                Ok( kv_lines( &[ ("n", r.n.to_string()), ("min", r.min.to_string()), ("max", r.max.to_string()),
                                 ("range", (r.max - r.min).to_string()), ("mean", r.mean.to_string()) ]))
            }

            "r.univar" => {
                let map = req( cmd, "map")?;
                let r = loc.rasters.get(map).ok_or_else(|| failed( module, format!("raster <{map}> not found")))?;
                Ok( kv_lines( &[ ("n", r.n.to_string()), ("null_cells", "0".to_string()), ("cells", r.n.to_string()),
                                 ("min", r.min.to_string()), ("max", r.max.to_string()), ("range", (r.max - r.min).to_string()),
                                 ("mean", r.mean.to_string()), ("stddev", r.stddev.to_string()), ("variance", (r.stddev * r.stddev).to_string()) ]))
            }

            "r.colors" => {
                let map = req( cmd, "map")?;
                let rules = match (cmd.get("rules"), cmd.get("color")) {
                    (Some("-"), _) => stdin.map(|s| s.to_string()).ok_or_else(|| failed( module, "no rules on stdin"))?,
                    (Some(path), _) => std::fs::read_to_string( path).map_err(|e| failed( module, format!("{path}: {e}")))?,
                    (None, Some(color)) => color.to_string(),
                    (None, None) => return Err( failed( module, "no color source"))
                };
                let r = loc.rasters.get_mut(map).ok_or_else(|| failed( module, format!("raster <{map}> not found")))?;
                r.color_rules = Some( rules);
                Ok( String::new())
            }

            "d.mon" => {
                if let Some(start) = cmd.get("start") {
                    if loc.monitor.is_some() { return Err( failed( module, format!("monitor <{start}> is already running"))) }
                    loc.monitor = Some( req( cmd, "output")?.to_string());
                } else {
                    let path = loc.monitor.take().ok_or_else(|| failed( module, "no monitor running"))?;
                    std::fs::write( &path, b"\x89PNG").map_err(|e| failed( module, e))?;
                }
                Ok( String::new())
            }

            "d.shade" | "d.vect" | "d.legend" => {
                if loc.monitor.is_none() { return Err( failed( module, "no graphics device selected")) }
                let raster_keys: &[&str] = match module {
                    "d.shade" => &["shade", "color"],
                    "d.legend" => &["raster"],
                    _ => &[]
                };
                for key in raster_keys {
                    let name = req( cmd, key)?;
                    if !loc.rasters.contains_key(name) {
                        return Err( failed( module, format!("raster <{name}> not found")))
                    }
                }
                if let Some(map) = cmd.get("map") {
                    if !loc.vectors.contains_key(map) { return Err( failed( module, format!("vector <{map}> not found"))) }
                }
                Ok( String::new())
            }

            "r.shade" => {
                for key in ["shade", "color"] {
                    let name = req( cmd, key)?;
                    if !loc.rasters.contains_key(name) { return Err( failed( module, format!("raster <{name}> not found"))) }
                }
                let color = loc.rasters[req( cmd, "color")?].clone();
                loc.rasters.insert( req( cmd, "output")?.to_string(), color);
                Ok( String::new())
            }

            "ps.map" => {
                let input = req( cmd, "input")?;
                let instructions = std::fs::read_to_string( input).map_err(|e| failed( module, format!("{input}: {e}")))?;
                if !instructions.trim_end().ends_with("end") { return Err( failed( module, "missing final end")) }
                std::fs::write( req( cmd, "output")?, b"%!PS-Adobe-3.0\n").map_err(|e| failed( module, e))?;
                Ok( String::new())
            }

            _ => Err( failed( module, format!("unknown module {module}")))
        }
    }
}

/* #region fixtures */

pub const MAPPING_LOCATION: &str = "laea_andalusia";
pub const LATLONG_LOCATION: &str = "latlong_medgold";

pub const ADMIN_MAP: &str = "andalusia_provinces";
pub const DEM: &str = "elevation_1KMmd_GMTEDmd_andalusia";
pub const CROP: &str = "olive_HarvestedAreaFraction_andalusia";

fn area (code: &str, w: f64, s: f64, e: f64, n: f64)->MockArea {
    let mut attrs = HashMap::new();
    attrs.insert( "iso_3166_2".to_string(), code.to_string());
    MockArea { attrs, bbox: BoundingBox::new( w, s, e, n) }
}

/// the map layers of the Andalusia mapping location
pub fn andalusia_fixture (world: &World) {
    let mut w = world.borrow_mut();
    let loc = w.location( MAPPING_LOCATION);

    let provinces = MockVector {
        columns: vec![ "cat".to_string(), "iso_3166_2".to_string() ],
        points: vec![],
        areas: vec![
            area( "ES-H",  -251_340.5, -166_020.0, -151_200.0,   -4_500.0),
            area( "ES-SE", -165_800.0, -200_300.0,  -20_100.0,   20_700.0),
            area( "ES-CA", -190_400.0, -290_800.0,  -80_000.0, -170_300.0),
            area( "ES-MA",  -90_200.0, -260_100.0,   40_300.0, -160_000.0),
            area( "ES-CO",  -60_700.0,  -80_000.0,   60_100.0,   60_400.0),
            area( "ES-J",    40_000.0, -100_500.0,  180_900.0,   40_200.0),
            area( "ES-GR",   30_000.0, -240_000.0,  190_300.0,  -60_000.0),
            area( "ES-AL",  150_000.0, -250_000.0,  283_100.25,  -90_000.0),
        ],
    };
    loc.vectors.insert( ADMIN_MAP.to_string(), provinces);
    loc.vectors.insert( "ne_10m_coastline_andalusia".to_string(), MockVector { areas: vec![ area("", -300_000.0, -300_000.0, 300_000.0, 100_000.0)], ..MockVector::default() });
    loc.vectors.insert( "ne_10m_admin_0_countries_lakes_andalusia".to_string(), MockVector { areas: vec![ area("", -300_000.0, -300_000.0, 300_000.0, 100_000.0)], ..MockVector::default() });

    loc.rasters.insert( DEM.to_string(), MockRaster::from_values( &[0.0, 3478.0]));
    loc.rasters.insert( CROP.to_string(), MockRaster::from_values( &[0.0, 0.9]));
    loc.rasters.insert( "SR_HR_andalusia_clip_250m".to_string(), MockRaster::from_values( &[0.0, 255.0]));
    loc.rasters.insert( "GRAY_HR_SR_OB_DR_andalusia_250m".to_string(), MockRaster::from_values( &[0.0, 255.0]));
}

/// add a point map (x, y, value) with value column `name` to `location`
pub fn add_points (world: &World, location: &str, map: &str, name: &str, points: &[(f64,f64,f64)]) {
    let mut w = world.borrow_mut();
    let loc = w.location( location);
    let v = MockVector {
        columns: vec![ "cat".to_string(), "lon".to_string(), "lat".to_string(), name.to_string() ],
        points: points.iter().map(|(x,y,v)| {
            let mut values = HashMap::new();
            values.insert( "lon".to_string(), *x);
            values.insert( "lat".to_string(), *y);
            values.insert( name.to_string(), *v);
            MockPoint { x: *x, y: *y, values }
        }).collect(),
        areas: vec![],
    };
    loc.vectors.insert( map.to_string(), v);
}

/// a mapping region over the whole fixture with a region mask raster
pub fn with_region_mask (world: &World, session: &mut Session<MockGrass>) {
    {
        let mut w = world.borrow_mut();
        let loc = w.location( MAPPING_LOCATION);
        loc.region = Some( MockRegion { n: 100_000.0, s: -300_000.0, e: 300_000.0, w: -300_000.0, res: 1000.0 });
        loc.rasters.insert( casas_gis::REGION_RASTER.to_string(), MockRaster::constant( 1.0, 240_000));
    }
    session.set_region_mask( casas_gis::REGION_RASTER);
}

/* #endregion fixtures */
