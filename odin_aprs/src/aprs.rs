/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

//! APRS position report payloads (no timestamp, no messaging: data type identifier '!')
//!
//! uncompressed: `!DDMM.mmN/DDDMM.mmW>comment`
//! compressed:   `!/YYYYXXXX>csTcomment` with base-91 lat/lon, course/speed and compression type bytes

use serde::{Serialize,Deserialize};
use crate::{PositionSnapshot, errors::{Result,OdinAprsError,config_error}};

pub const POSITION_NO_TIMESTAMP: char = '!';

/// max comment length for position reports without timestamp
pub const MAX_COMMENT_LEN: usize = 43;

const BASE91_OFFSET: u8 = 33;
const B91_3: u32 = 91*91*91;
const B91_2: u32 = 91*91;

const LAT_SCALE: f64 = 380926.0;
const LON_SCALE: f64 = 190463.0;
const SPEED_BASE: f64 = 1.08;

/// compression type: current GPS fix (0b1 << 5), NMEA source RMC (0b11 << 3), origin compressed (0b000)
pub const COMPRESSION_TYPE: u8 = (0x20 | 0x18) + BASE91_OFFSET;

/// the map symbol to display for our station
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct Symbol {
    pub table: char, // '/' primary, '\\' alternate, or overlay char
    pub code: char,
}

impl Default for Symbol {
    fn default()->Self { Symbol { table: '/', code: '>' } } // car
}

impl Symbol {
    pub fn validate (&self)->Result<()> {
        if !(self.table == '/' || self.table == '\\' || self.table.is_ascii_digit() || self.table.is_ascii_uppercase()) {
            return Err( config_error!("invalid symbol table '{}'", self.table))
        }
        if !self.code.is_ascii_graphic() {
            return Err( config_error!("invalid symbol code '{}'", self.code))
        }
        Ok(())
    }
}

/* #region coordinate conversion ******************************************************************/

/// convert a NMEA packed (D)DDMM.mmmm magnitude into decimal degrees
pub fn ddmm_to_degrees (ddmm: f64)->f64 {
    let deg = (ddmm / 100.0).trunc();
    deg + (ddmm - deg * 100.0) / 60.0
}

/// split a decimal degree magnitude into whole degrees and hundredths of minutes
/// (rounded so that we never get 60.00 minutes)
fn degrees_to_deg_hmin (deg: f64)->(u32,u32) {
    let total = (deg.abs() * 6000.0).round() as u32;
    (total / 6000, total % 6000)
}

/// "DDMM.mmN"
pub fn format_latitude (lat: f64)->String {
    let (d,hm) = degrees_to_deg_hmin( lat);
    let hemi = if lat < 0.0 { 'S' } else { 'N' };
    format!("{:02}{:02}.{:02}{}", d, hm / 100, hm % 100, hemi)
}

/// "DDDMM.mmW"
pub fn format_longitude (lon: f64)->String {
    let (d,hm) = degrees_to_deg_hmin( lon);
    let hemi = if lon < 0.0 { 'W' } else { 'E' };
    format!("{:03}{:02}.{:02}{}", d, hm / 100, hm % 100, hemi)
}

/* #endregion coordinate conversion */

/* #region compressed encoding ********************************************************************/

/// 4 printable base-91 digits, most significant first
pub fn base91_encode (value: u32)->[u8;4] {
    let mut v = value;
    let mut digits = [0u8;4];

    for (i,div) in [B91_3, B91_2, 91, 1].iter().enumerate() {
        digits[i] = (v / div) as u8 + BASE91_OFFSET;
        v %= div;
    }
    digits
}

pub fn base91_decode (digits: &[u8;4])->u32 {
    digits.iter().fold( 0, |acc,&d| acc * 91 + (d - BASE91_OFFSET) as u32)
}

pub fn compressed_latitude (lat: f64)->[u8;4] {
    base91_encode( (LAT_SCALE * (90.0 - lat.clamp(-90.0,90.0))).round() as u32)
}

pub fn compressed_longitude (lon: f64)->[u8;4] {
    base91_encode( (LON_SCALE * (180.0 + lon.clamp(-180.0,180.0))).round() as u32)
}

/// course in 4 degree steps
pub fn course_byte (heading: f64)->u8 {
    (heading.rem_euclid(360.0) as u32 / 4) as u8 + BASE91_OFFSET
}

/// speed in knots as exponent of 1.08: `speed = 1.08^s - 1`
pub fn speed_byte (knots: f64)->u8 {
    let s = ((knots.max(0.0) + 1.0).ln() / SPEED_BASE.ln()).round();
    s.min(89.0) as u8 + BASE91_OFFSET
}

pub fn speed_from_byte (b: u8)->f64 {
    SPEED_BASE.powi( b.saturating_sub(BASE91_OFFSET) as i32) - 1.0
}

/* #endregion compressed encoding */

/// the APRS position payload for the current position
pub fn encode_position (pos: &PositionSnapshot, symbol: &Symbol, comment: &str, compressed: bool)->String {
    if compressed {
        compressed_position( pos, symbol, comment)
    } else {
        uncompressed_position( pos, symbol, comment)
    }
}

pub fn uncompressed_position (pos: &PositionSnapshot, symbol: &Symbol, comment: &str)->String {
    format!("{}{}{}{}{}{}",
        POSITION_NO_TIMESTAMP,
        format_latitude( pos.latitude), symbol.table,
        format_longitude( pos.longitude), symbol.code,
        comment)
}

pub fn compressed_position (pos: &PositionSnapshot, symbol: &Symbol, comment: &str)->String {
    let mut s = String::with_capacity( 14 + comment.len());

    s.push( POSITION_NO_TIMESTAMP);
    s.push( symbol.table);
    for b in compressed_latitude( pos.latitude) { s.push( b as char) }
    for b in compressed_longitude( pos.longitude) { s.push( b as char) }
    s.push( symbol.code);
    s.push( course_byte( pos.heading) as char);
    s.push( speed_byte( pos.speed_knots()) as char);
    s.push( COMPRESSION_TYPE as char);
    s.push_str( comment);

    s
}
