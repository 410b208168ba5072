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

//! crate to turn a live GPS (NMEA RMC) feed into periodic APRS position beacons that are sent as
//! KISS encapsulated AX.25 UI frames to a serial or networked packet radio TNC

use std::fmt;
use chrono::{DateTime,Utc};
use uom::si::{f64::Velocity, velocity::knot};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, filter::Directive};

pub mod errors;
pub use errors::{OdinAprsError,Result};

pub mod ax25;
pub mod kiss;
pub mod aprs;
pub mod nmea;
pub mod beacon;

pub mod config;
pub use config::{TrackerConfig,Endpoint,load_config};

pub mod tracker;
pub use tracker::AprsTracker;

/// the AX.25 destination ("tocall") that identifies our beacons
pub const TOCALL: &str = "APMGT1";

/// the last known position, velocity and time reported by the GPS.
/// Values are only replaced as a whole (see [`PositionSender`]) - an invalid fix just clears the
/// `fix_valid` flag and leaves the rest of the last valid fix in place
#[derive(Debug,Clone,PartialEq)]
pub struct PositionSnapshot {
    pub latitude: f64,  // decimal degrees, negative south
    pub longitude: f64, // decimal degrees, negative west
    pub lat_hemisphere: char,
    pub lon_hemisphere: char,
    pub speed: Velocity, // ground speed
    pub heading: f64, // true course in degrees [0..360)
    pub time: Option<DateTime<Utc>>,
    pub fix_valid: bool,
}

impl Default for PositionSnapshot {
    fn default()->Self {
        PositionSnapshot {
            latitude: 0.0,
            longitude: 0.0,
            lat_hemisphere: 'N',
            lon_hemisphere: 'E',
            speed: Velocity::new::<knot>(0.0),
            heading: 0.0,
            time: None,
            fix_valid: false,
        }
    }
}

impl PositionSnapshot {
    pub fn speed_knots (&self)->f64 { self.speed.get::<knot>() }
}

impl fmt::Display for PositionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "PositionSnapshot( lat: {:.5}, lon: {:.5}, spd: {:.1}, hdg: {:.0}", self.latitude, self.longitude, self.speed_knots(), self.heading)?;
        if let Some(time) = &self.time { write!( f, ", time: {}", time.format("%Y-%m-%dT%H:%M:%SZ"))?; }
        write!( f, ", {})", if self.fix_valid { "valid" } else { "invalid" })
    }
}

/// the single writer side of the position handoff (owned by the NMEA reader)
pub type PositionSender = watch::Sender<PositionSnapshot>;

/// the reader side of the position handoff. Each `borrow()` sees a complete snapshot
pub type PositionReceiver = watch::Receiver<PositionSnapshot>;

/// create the position handoff, initialized with an invalid fix
pub fn position_channel ()->(PositionSender,PositionReceiver) {
    watch::channel( PositionSnapshot::default())
}

/// set up a global tracing subscriber. RUST_LOG takes precedence over `verbose`, `debug_targets` are
/// added as `<target>=debug` directives (e.g. "odin_aprs::nmea")
pub fn init_tracing (verbose: bool, debug_targets: &[&str])->Result<()> {
    let level = if verbose { "info" } else { "warn" };
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new( level));

    for target in debug_targets {
        let directive = format!("{target}=debug").parse::<Directive>()
            .map_err( |e| OdinAprsError::OpFailedError( format!("invalid trace directive for {target}: {e}")))?;
        filter = filter.add_directive( directive);
    }

    // this only succeeds if there is no global subscriber set yet
    tracing_subscriber::fmt()
        .with_env_filter( filter)
        .try_init()
        .map_err( |e| OdinAprsError::OpFailedError( format!("failed to initialize tracing: {e}")))
}
