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

use chrono::{NaiveDate,NaiveTime};
use uom::si::{f64::Velocity, velocity::knot};
use tokio::io::{AsyncRead,AsyncBufReadExt,BufReader};
use tracing::{debug,warn};
use crate::{PositionSnapshot, PositionSender, aprs::ddmm_to_degrees, errors::{Result,OdinAprsError,parse_error}};

/// the RMC ("recommended minimum") sentence ids we process (GPS-only and multi-constellation talker)
pub const RMC_IDS: [&[u8];2] = [b"$GPRMC", b"$GNRMC"];

/// lines shorter than this cannot be a sentence and are dropped
pub const MIN_LINE_LEN: usize = 7;

/// NMEA sentences are at most 82 chars - anything beyond this without newline is noise
pub const MAX_LINE_LEN: usize = 256;

pub const N_RMC_FIELDS: usize = 12;

// RMC field indices (after the sentence id)
const TIME: usize = 0;
const STATUS: usize = 1;
const LAT: usize = 2;
const LAT_HEMI: usize = 3;
const LON: usize = 4;
const LON_HEMI: usize = 5;
const SPEED: usize = 6;
const COURSE: usize = 7;
const DATE: usize = 8;

/// what a completed input line amounts to
#[derive(Debug,Clone,PartialEq)]
pub enum LineEvent {
    Incomplete,              // too short or overflowed, dropped
    Ignored,                 // not a sentence we process
    Fix(PositionSnapshot),   // valid RMC fix
    NoFix,                   // RMC without valid fix, or malformed RMC
}

/// byte level line assembler for a NMEA stream.
/// Bytes are accumulated until a newline completes the line, which is then classified and parsed
pub struct RmcParser {
    line: Vec<u8>,
    overflow: bool,
}

impl RmcParser {
    pub fn new ()->Self {
        RmcParser { line: Vec::with_capacity( 128), overflow: false }
    }

    /// returns the LineEvent if `b` completed a line, None if we are still accumulating
    pub fn push_byte (&mut self, b: u8)->Option<LineEvent> {
        if b == b'\n' {
            let event = if self.overflow {
                LineEvent::Incomplete
            } else {
                debug!("received: {}", String::from_utf8_lossy( &self.line).trim_end());
                process_line( &self.line)
            };
            self.line.clear();
            self.overflow = false;
            Some(event)

        } else {
            if !self.overflow {
                if self.line.len() < MAX_LINE_LEN {
                    self.line.push( b);
                } else {
                    self.overflow = true;
                    self.line.clear();
                }
            }
            None
        }
    }
}

/// classify and parse a complete line (without the terminating newline)
pub fn process_line (line: &[u8])->LineEvent {
    let line = line.strip_suffix( b"\r").unwrap_or( line);

    if line.len() < MIN_LINE_LEN {
        LineEvent::Incomplete
    } else if !is_rmc( line) {
        LineEvent::Ignored
    } else {
        match parse_rmc( line) {
            Ok(Some(pos)) => LineEvent::Fix(pos),
            Ok(None) => LineEvent::NoFix,
            Err(e) => {
                warn!("malformed RMC sentence: {}", e);
                LineEvent::NoFix
            }
        }
    }
}

/// sentence id followed by the first field separator (e.g. "$GPRMC,")
fn is_rmc (line: &[u8])->bool {
    RMC_IDS.iter().any( |id| line.starts_with( id)) && line.get( 6) == Some(&b',')
}

/// parse a RMC sentence, returning None if the receiver reported the fix as invalid
///
/// Sentence example:
///   $GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A
///
/// fields:
///   0: UTC time hhmmss[.sss]
///   1: status (A = valid, V = warning)
///   2: latitude ddmm.mmmm
///   3: N/S
///   4: longitude dddmm.mmmm
///   5: E/W
///   6: speed over ground in knots
///   7: course over ground in degrees true
///   8: date ddmmyy
///   9: magnetic variation
///  10: E/W
///  11: mode indicator
pub fn parse_rmc (line: &[u8])->Result<Option<PositionSnapshot>> {
    let line = std::str::from_utf8( line).map_err( |_| parse_error!("non ASCII chars in sentence"))?;
    let sentence = strip_checksum( line)?;

    if sentence.as_bytes().get(6) != Some(&b',') {
        return Err( parse_error!("missing field separator after sentence id"))
    }

    let fields = RmcFields::split( &sentence[7..])?;

    if fields.get(STATUS) != "A" {
        return Ok(None)
    }

    let time = parse_time( fields.get(TIME))?;
    let date = parse_date( fields.get(DATE))?;

    let (latitude, lat_hemisphere) = parse_coordinate( fields.get(LAT), fields.get(LAT_HEMI), 'N', 'S', 90.0)?;
    let (longitude, lon_hemisphere) = parse_coordinate( fields.get(LON), fields.get(LON_HEMI), 'E', 'W', 180.0)?;

    let speed = parse_optional_number( fields.get(SPEED))?;
    let heading = parse_optional_number( fields.get(COURSE))?;
    if heading >= 360.0 {
        return Err( parse_error!("course out of range: '{}'", fields.get(COURSE)))
    }

    Ok( Some( PositionSnapshot {
        latitude,
        longitude,
        lat_hemisphere,
        lon_hemisphere,
        speed: Velocity::new::<knot>( speed),
        heading,
        time: Some( date.and_time( time).and_utc()),
        fix_valid: true
    }))
}

/// XOR of all chars between '$' and '*'
pub fn checksum (sentence: &str)->u8 {
    sentence.bytes().skip(1).fold( 0, |acc,b| acc ^ b)
}

/// verify and remove an optional "*hh" checksum suffix
fn strip_checksum (line: &str)->Result<&str> {
    if let Some(idx) = memchr::memrchr( b'*', line.as_bytes()) {
        let sentence = &line[..idx];
        let hex = line[idx+1..].trim_end();
        let expected = u8::from_str_radix( hex, 16).map_err( |_| parse_error!("invalid checksum '{}'", hex))?;
        let actual = checksum( sentence);

        if actual != expected {
            return Err( parse_error!("checksum mismatch: expected {:02X}, got {:02X}", expected, actual))
        }
        Ok(sentence)
    } else {
        Ok(line)
    }
}

/// positional RMC fields. Missing trailing fields are empty, but we need at least all fields up to the date
struct RmcFields<'a> ([&'a str; N_RMC_FIELDS]);

impl<'a> RmcFields<'a> {
    fn split (s: &'a str)->Result<Self> {
        let mut fields = [""; N_RMC_FIELDS];
        let mut n = 0;

        for (i,f) in s.splitn( N_RMC_FIELDS, ',').enumerate() {
            fields[i] = f;
            n = i+1;
        }

        if n <= DATE {
            Err( parse_error!("RMC sentence has only {} fields", n))
        } else {
            Ok( RmcFields(fields) )
        }
    }

    fn get (&self, idx: usize)->&'a str { self.0[idx] }
}

fn parse_two_digits (s: &str, i: usize)->Result<u32> {
    s.get( i..i+2)
        .filter( |d| d.bytes().all( |b| b.is_ascii_digit()))
        .and_then( |d| d.parse().ok())
        .ok_or_else( || parse_error!("invalid digits in '{}'", s))
}

fn parse_time (s: &str)->Result<NaiveTime> {
    let h = parse_two_digits( s, 0)?;
    let m = parse_two_digits( s, 2)?;
    let sec = parse_two_digits( s, 4)?;
    NaiveTime::from_hms_opt( h, m, sec).ok_or_else( || parse_error!("invalid time '{}'", s))
}

// the 2-digit year is taken as years since 2000 (tm_year + 100)
fn parse_date (s: &str)->Result<NaiveDate> {
    let day = parse_two_digits( s, 0)?;
    let month = parse_two_digits( s, 2)?;
    let year = parse_two_digits( s, 4)? as i32 + 2000;
    NaiveDate::from_ymd_opt( year, month, day).ok_or_else( || parse_error!("invalid date '{}'", s))
}

fn parse_number (s: &str)->Result<f64> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err( parse_error!("invalid number '{}'", s))
    }
}

/// receivers leave speed and course empty if they are not known (e.g. when stationary)
fn parse_optional_number (s: &str)->Result<f64> {
    if s.is_empty() { Ok(0.0) } else { parse_number( s) }
}

fn parse_coordinate (mag: &str, hemi: &str, pos: char, neg: char, max: f64)->Result<(f64,char)> {
    let ddmm = parse_number( mag)?;
    if ddmm % 100.0 >= 60.0 {
        return Err( parse_error!("coordinate minutes out of range: '{}'", mag))
    }

    let deg = ddmm_to_degrees( ddmm);
    if deg > max {
        return Err( parse_error!("coordinate out of range: '{}'", mag))
    }

    match hemi.chars().next() {
        Some(c) if hemi.len() == 1 && c == pos => Ok( (deg, c) ),
        Some(c) if hemi.len() == 1 && c == neg => Ok( (-deg, c) ),
        _ => Err( parse_error!("invalid hemisphere '{}'", hemi))
    }
}

/// publish a line event to the position handoff. Only valid fixes replace the snapshot, otherwise we
/// just invalidate the current one
pub fn publish (tx: &PositionSender, event: LineEvent) {
    match event {
        LineEvent::Fix(pos) => {
            debug!("{}", pos);
            tx.send_replace( pos);
        }
        LineEvent::NoFix => {
            tx.send_if_modified( |pos| {
                let was_valid = pos.fix_valid;
                pos.fix_valid = false;
                was_valid
            });
        }
        _ => {} // no state change
    }
}

/// the GPS reader task: feed everything we get from `input` through a RmcParser and publish
/// the results. Returns when the input is closed
pub async fn read_gps<R> (input: R, tx: PositionSender)->Result<()> where R: AsyncRead + Unpin {
    let mut reader = BufReader::with_capacity( 4096, input);
    let mut parser = RmcParser::new();

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            debug!("GPS input closed");
            return Ok(())
        }

        let len = buf.len();
        for &b in buf {
            if let Some(event) = parser.push_byte( b) {
                publish( &tx, event);
            }
        }
        reader.consume( len);
    }
}
