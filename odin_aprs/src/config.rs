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

use std::{fmt, fs, path::{Path,PathBuf}};
use serde::{Serialize,Deserialize};
use tracing::warn;
use crate::{
    ax25::{Callsign,MAX_PATH_LEN},
    aprs::{Symbol,MAX_COMMENT_LEN},
    beacon::BeaconMode,
    errors::{Result,OdinAprsError,config_error}
};

/// where we read NMEA from or write KISS frames to. Serial devices have to be configured
/// (baud rate, raw mode) before we open them
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum Endpoint {
    Device(PathBuf),
    Tcp(String), // "host:port"
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Device(path) => write!( f, "{}", path.display()),
            Endpoint::Tcp(addr) => write!( f, "tcp://{}", addr)
        }
    }
}

/// the tracker configuration. Callsigns are validated during deserialization, the rest by `validate()`
///
/// ```text
/// TrackerConfig(
///     station: "N0CALL-9",
///     path: ["WIDE1-1", "WIDE2-1"],
///     gps: Device("/dev/ttyUSB0"),
///     tnc: Tcp("localhost:8001"),
///     beacon: Static( rate: 900 ),
/// )
/// ```
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct TrackerConfig {
    pub station: Callsign, // who we are

    #[serde(default="Callsign::tocall")]
    pub destination: Callsign,

    #[serde(default)]
    pub path: Vec<Callsign>, // relay stations in transmission order

    pub gps: Endpoint,
    pub tnc: Endpoint,

    pub beacon: BeaconMode,

    #[serde(default)]
    pub symbol: Symbol,

    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub compressed: bool,
}

impl TrackerConfig {
    pub fn validate (&self)->Result<()> {
        if self.path.len() > MAX_PATH_LEN {
            return Err( config_error!("cannot have more than {} digipeaters in path, got {}", MAX_PATH_LEN, self.path.len()))
        }
        self.beacon.validate()?;
        self.symbol.validate()?;

        if self.comment.len() > MAX_COMMENT_LEN {
            warn!("beacon comment exceeds {} chars and might get truncated by receivers", MAX_COMMENT_LEN);
        }
        Ok(())
    }
}

/// parse and validate a RON config string
pub fn parse_config (src: &str)->Result<TrackerConfig> {
    let config: TrackerConfig = ron::from_str( src)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config<P> (path: P)->Result<TrackerConfig> where P: AsRef<Path> {
    let data = fs::read( path.as_ref())?;
    let config: TrackerConfig = ron::de::from_bytes( data.as_slice())?;
    config.validate()?;
    Ok(config)
}
