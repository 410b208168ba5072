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

//! AX.25 link layer support for outbound UI frames
//!
//! ```text
//! | dest (7) | source (7) | path (0..8 x 7) | control (1) | pid (1) | info (N) |
//! ```
//! Address elements hold the space padded callsign with each char shifted left by one bit, followed
//! by a SSID byte `HRRSSSSE` (H: has-been-repeated, R: reserved (1), S: SSID, E: end of address field)

use std::{fmt, str::FromStr};
use serde::{Serialize,Deserialize};
use crate::{TOCALL, kiss, errors::{Result,OdinAprsError,config_error}};

pub const MAX_CALLSIGN_LEN: usize = 6;
pub const MAX_SSID: u8 = 15;
pub const MAX_PATH_LEN: usize = 8;
pub const ADDRESS_LEN: usize = 7;

pub const CONTROL_UI: u8 = 0x03; // unnumbered information
pub const PID_NO_LAYER3: u8 = 0xF0;

const SSID_RESERVED_BITS: u8 = 0x60; // 011xxxxx
const SSID_REPEATED_BITS: u8 = 0xE0; // 111xxxxx
const ADDRESS_END_BIT: u8 = 0x01;

/// a station id (callsign plus SSID) that has been validated at construction time.
/// Parsed from and displayed as "CALL[-SSID]"
#[derive(Debug,Clone,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(try_from="String", into="String")]
pub struct Callsign {
    call: String,
    ssid: u8
}

impl Callsign {
    pub fn new (call: &str, ssid: u8)->Result<Self> {
        if call.is_empty() || call.len() > MAX_CALLSIGN_LEN {
            return Err( config_error!("callsign '{}' must have 1 to {} characters", call, MAX_CALLSIGN_LEN))
        }
        if !call.bytes().all( |b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            return Err( config_error!("callsign '{}' has to consist of uppercase letters and digits", call))
        }
        if ssid > MAX_SSID {
            return Err( config_error!("SSID of '{}' must be between 0 and {}: {}", call, MAX_SSID, ssid))
        }
        Ok( Callsign{ call: call.to_string(), ssid } )
    }

    /// the destination we use to identify our beacons
    pub fn tocall ()->Self {
        Callsign{ call: TOCALL.to_string(), ssid: 0 }
    }

    pub fn call (&self)->&str { self.call.as_str() }
    pub fn ssid (&self)->u8 { self.ssid }
}

impl FromStr for Callsign {
    type Err = OdinAprsError;

    fn from_str (s: &str)->Result<Self> {
        let s = s.trim();
        match s.split_once('-') {
            Some((call,ssid)) => {
                let ssid: u8 = ssid.parse().map_err( |_| config_error!("invalid SSID in '{}'", s))?;
                Callsign::new( call, ssid)
            }
            None => Callsign::new( s, 0)
        }
    }
}

impl TryFrom<String> for Callsign {
    type Error = OdinAprsError;
    fn try_from (s: String)->Result<Self> { s.parse() }
}

impl From<Callsign> for String {
    fn from (cs: Callsign)->Self { cs.to_string() }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid > 0 {
            write!( f, "{}-{}", self.call, self.ssid)
        } else {
            write!( f, "{}", self.call)
        }
    }
}

/// a relay station in the outbound path
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct PathEntry {
    pub station: Callsign,
    pub repeated: bool, // H-bit - we only originate frames so this is normally not set
}

impl PathEntry {
    pub fn new (station: Callsign)->Self { PathEntry{ station, repeated: false } }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.station)?;
        if self.repeated { write!( f, "*")?; }
        Ok(())
    }
}

/// encode a single address element. The callsign is assumed to be pre-validated (at most 6 chars)
pub fn encode_address (call: &str, ssid: u8, repeated: bool, last: bool)->[u8;ADDRESS_LEN] {
    let mut addr = [b' ' << 1; ADDRESS_LEN];

    for (i,b) in call.bytes().take(MAX_CALLSIGN_LEN).enumerate() {
        addr[i] = b << 1;
    }

    let mut ssid_byte = (ssid & 0x0F) << 1;
    ssid_byte |= if repeated { SSID_REPEATED_BITS } else { SSID_RESERVED_BITS };
    if last { ssid_byte |= ADDRESS_END_BIT; }
    addr[6] = ssid_byte;

    addr
}

/// reverse of [`encode_address`]: returns (callsign, ssid, repeated, last)
pub fn decode_address (addr: &[u8;ADDRESS_LEN])->(String,u8,bool,bool) {
    let call: String = addr[..6].iter().map( |&b| (b >> 1) as char).collect();
    let ssid_byte = addr[6];

    ( call.trim_end().to_string(),
      (ssid_byte >> 1) & 0x0F,
      ssid_byte & 0x80 != 0,
      ssid_byte & ADDRESS_END_BIT != 0 )
}

/// an outbound AX.25 UI frame
#[derive(Debug,Clone,PartialEq)]
pub struct Ax25Frame {
    pub destination: Callsign,
    pub source: Callsign,
    pub path: Vec<PathEntry>, // in transmission order, at most MAX_PATH_LEN entries
    pub payload: Vec<u8>,
}

impl Ax25Frame {
    pub fn new (destination: Callsign, source: Callsign, path: Vec<PathEntry>, payload: impl Into<Vec<u8>>)->Self {
        Ax25Frame { destination, source, path, payload: payload.into() }
    }

    /// the un-escaped frame body: address field, control/pid and payload
    pub fn encode (&self)->Vec<u8> {
        let n_path = self.path.len();
        let mut buf = Vec::with_capacity( ADDRESS_LEN * (2 + n_path) + 2 + self.payload.len());

        buf.extend_from_slice( &encode_address( self.destination.call(), self.destination.ssid(), false, false));
        buf.extend_from_slice( &encode_address( self.source.call(), self.source.ssid(), false, n_path == 0));

        for (i,e) in self.path.iter().enumerate() {
            buf.extend_from_slice( &encode_address( e.station.call(), e.station.ssid(), e.repeated, i+1 == n_path));
        }

        buf.push( CONTROL_UI);
        buf.push( PID_NO_LAYER3);
        buf.extend_from_slice( &self.payload);

        buf
    }

    /// the complete byte sequence to send to a KISS TNC
    pub fn to_kiss (&self)->Vec<u8> {
        kiss::wrap( &self.encode())
    }
}

/// TNC2 monitor format: "SRC>DEST,PATH1,PATH2:payload"
impl fmt::Display for Ax25Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}>{}", self.source, self.destination)?;
        for e in &self.path {
            write!( f, ",{}", e)?;
        }
        write!( f, ":{}", String::from_utf8_lossy( &self.payload))
    }
}
