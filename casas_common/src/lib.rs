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

use serde::{Serialize,Deserialize};
use num::{Num,ToPrimitive};

pub mod macros;
pub mod fs;

/// a generic bounding box without semantics for the coordinate type
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }

    pub fn width (&self) -> T { self.east - self.west }
    pub fn height (&self) -> T { self.north - self.south }
}

impl BoundingBox<f64> {
    /// grow the box by `d` on every side
    pub fn expand (&self, d: f64) -> Self {
        BoundingBox{ west: self.west - d, south: self.south - d, east: self.east + d, north: self.north + d }
    }

    /// snap outwards so that all edges are multiples of `res` (the box can only grow)
    pub fn snap_outward (&self, res: f64) -> Self {
        if res <= 0.0 { return *self }
        BoundingBox {
            west: (self.west / res).floor() * res,
            south: (self.south / res).floor() * res,
            east: (self.east / res).ceil() * res,
            north: (self.north / res).ceil() * res
        }
    }

    /// smallest box containing both
    pub fn union (&self, other: &Self) -> Self {
        BoundingBox {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north)
        }
    }
}

/// a simple incremental min/max accumulator
#[derive(Debug,Clone,PartialEq)]
pub struct MinMax {
    pub n: usize,
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new()->Self { MinMax { n: 0, min: f64::MAX, max: f64::MIN } }

    /// add a new observation. NaNs are ignored
    pub fn add (&mut self, x: f64) {
        if x.is_nan() { return }
        self.n += 1;

        if self.n > 1 {
            if x < self.min { self.min = x }
            if x > self.max { self.max = x }
        } else {
            self.min = x;
            self.max = x;
        }
    }

    /// the (min,max) pair if we have seen at least one observation
    pub fn range (&self)->Option<(f64,f64)> {
        if self.n > 0 { Some((self.min,self.max)) } else { None }
    }
}

impl Default for MinMax {
    fn default()->Self { MinMax::new() }
}
