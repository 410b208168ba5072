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

use std::{sync::Arc, time::Duration};
use serde::{Serialize,Deserialize};
use tokio::{io::AsyncWrite, time::{self,MissedTickBehavior}};
use tracing::{debug,info,warn,error};
use crate::{
    PositionSnapshot, PositionReceiver, TrackerConfig,
    aprs, ax25::{Ax25Frame,PathEntry}, kiss::KissWriter,
    errors::{Result,OdinAprsError,config_error}
};

/// the controller resolution
pub const TICK: Duration = Duration::from_secs(1);

/// how we decide when to send the next beacon. Speeds are in knots, rates and times in seconds and
/// turn angles in degrees
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum BeaconMode {
    /// fixed beacon interval
    Static { rate: u32 },

    /// speed dependent interval plus "corner pegging" for heading changes (SmartBeaconing)
    Smart {
        low_speed: f64,   // below this we use low_rate
        low_rate: u32,
        high_speed: f64,  // above this we use high_rate
        high_rate: u32,
        turn_min: f64,    // minimum heading change to trigger a turn beacon
        turn_time: u32,   // minimum time since last beacon for a turn beacon
        turn_slope: f64,  // speed dependent part of turn threshold: turn_min + turn_slope/speed
    }
}

impl BeaconMode {
    pub fn validate (&self)->Result<()> {
        match self {
            BeaconMode::Static{rate} => {
                if *rate == 0 { return Err( config_error!("static beacon rate has to be > 0")) }
            }
            BeaconMode::Smart{low_speed,low_rate,high_speed,high_rate,turn_min,turn_time,turn_slope} => {
                if *low_rate == 0 || *high_rate == 0 {
                    return Err( config_error!("smart beacon rates have to be > 0"))
                }
                if !(*low_speed > 0.0 && low_speed < high_speed) {
                    return Err( config_error!("smart beacon speeds need 0 < low_speed < high_speed, got {} and {}", low_speed, high_speed))
                }
                if *turn_min < 0.0 || *turn_slope < 0.0 {
                    return Err( config_error!("smart beacon turn parameters cannot be negative"))
                }
            }
        }
        Ok(())
    }

    fn initial_interval (&self)->u32 {
        match self {
            BeaconMode::Static{rate} => *rate,
            BeaconMode::Smart{low_rate,..} => *low_rate
        }
    }
}

/// the SmartBeaconing interval for a given speed. Between the low and high speed thresholds the
/// interval is inverse proportional to the speed
pub fn smart_interval (speed: f64, low_speed: f64, low_rate: u32, high_speed: f64, high_rate: u32)->u32 {
    if speed < low_speed {
        low_rate
    } else if speed > high_speed {
        high_rate
    } else {
        (high_rate as f64 * high_speed / speed).round() as u32
    }
}

/// the heading change that triggers a corner pegging beacon at the given speed
pub fn turn_threshold (speed: f64, turn_min: f64, turn_slope: f64)->f64 {
    turn_min + turn_slope / speed // infinite at standstill, i.e. no turn beacons
}

/// the beacon timing state, advanced once per second
#[derive(Debug,Clone)]
pub struct BeaconTimer {
    mode: BeaconMode,
    interval: u32,      // current beacon interval in seconds
    elapsed: u32,       // seconds since last beacon
    last_heading: f64,
    heading_delta: f64, // accumulated since last beacon
}

impl BeaconTimer {
    pub fn new (mode: BeaconMode)->Self {
        let interval = mode.initial_interval();
        BeaconTimer { mode, interval, elapsed: 0, last_heading: 0.0, heading_delta: 0.0 }
    }

    pub fn with_elapsed (mut self, elapsed: u32)->Self {
        self.elapsed = elapsed;
        self
    }

    pub fn interval (&self)->u32 { self.interval }
    pub fn elapsed (&self)->u32 { self.elapsed }
    pub fn heading_delta (&self)->f64 { self.heading_delta }

    /// advance by one tick with the current speed (knots) and heading (degrees).
    /// Returns true if a beacon is due
    pub fn tick (&mut self, speed: f64, heading: f64)->bool {
        self.elapsed = self.elapsed.saturating_add(1);

        // raw difference, a 359->1 transition counts as -358
        self.heading_delta += heading - self.last_heading;
        self.last_heading = heading;

        match &self.mode {
            BeaconMode::Static{rate} => {
                self.interval = *rate;
            }
            BeaconMode::Smart{low_speed,low_rate,high_speed,high_rate,turn_min,turn_time,turn_slope} => {
                self.interval = smart_interval( speed, *low_speed, *low_rate, *high_speed, *high_rate);

                let threshold = turn_threshold( speed, *turn_min, *turn_slope);
                if self.heading_delta.abs() > threshold && self.elapsed > *turn_time {
                    debug!("corner pegging: heading change {:.0} > {:.0} after {}s", self.heading_delta, threshold, self.elapsed);
                    self.elapsed = self.interval;
                }
            }
        }

        self.elapsed >= self.interval
    }

    /// called after each beacon
    pub fn reset (&mut self) {
        self.elapsed = 0;
        self.heading_delta = 0.0;
    }
}

/// the AX.25 frame for a position beacon
pub fn beacon_frame (config: &TrackerConfig, pos: &PositionSnapshot)->Ax25Frame {
    let payload = aprs::encode_position( pos, &config.symbol, &config.comment, config.compressed);
    let path = config.path.iter().cloned().map( PathEntry::new).collect();

    Ax25Frame::new( config.destination.clone(), config.station.clone(), path, payload)
}

pub async fn transmit<W> (config: &TrackerConfig, pos: &PositionSnapshot, writer: &mut KissWriter<W>)->Result<()>
    where W: AsyncWrite + Unpin
{
    let frame = beacon_frame( config, pos);
    writer.send_frame( &frame).await?;
    info!("beacon sent: {}", frame);
    Ok(())
}

/// wait until the position source reports a valid fix and return it
pub async fn wait_for_fix (rx: &mut PositionReceiver)->Result<PositionSnapshot> {
    rx.wait_for( |pos| pos.fix_valid).await
        .map( |pos| pos.clone())
        .map_err( |_| OdinAprsError::OpFailedError( "position source closed".into()))
}

/// the beacon task. Runs until the position source is closed
pub async fn run_beacons<W> (config: Arc<TrackerConfig>, mut rx: PositionReceiver, mut writer: KissWriter<W>)->Result<()>
    where W: AsyncWrite + Unpin
{
    let mut timer = BeaconTimer::new( config.beacon.clone());
    let mut ticker = time::interval( TICK);
    ticker.set_missed_tick_behavior( MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if rx.has_changed().is_err() {
            return Err( OdinAprsError::OpFailedError( "position source closed".into()))
        }

        let (speed, heading, fix_valid) = {
            let pos = rx.borrow();
            (pos.speed_knots(), pos.heading, pos.fix_valid)
        };

        if timer.tick( speed, heading) {
            if !fix_valid { info!("beacon due, waiting for GPS fix"); }
            let pos = wait_for_fix( &mut rx).await?;

            if let Err(e) = transmit( &config, &pos, &mut writer).await {
                error!("beacon transmission failed: {}", e);
            }
            timer.reset();
        }
    }
}
