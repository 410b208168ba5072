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

use std::path::PathBuf;
use tokio::{self, signal};
use anyhow::Result;
use clap::{Parser,ValueEnum};
use tracing::info;
use odin_aprs::{AprsTracker, init_tracing, load_config};

#[derive(Clone,Copy,Debug,ValueEnum)]
enum DebugTarget {
    Gps, // log received NMEA lines and parsed fixes
    Tnc, // log sent frames
}

impl DebugTarget {
    fn module (&self)->&'static str {
        match self {
            DebugTarget::Gps => "odin_aprs::nmea",
            DebugTarget::Tnc => "odin_aprs::kiss",
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = "APRS tracker that sends GPS position beacons to a KISS TNC")]
struct Args {
    /// pathname of the RON tracker config
    #[arg(short,long, default_value = "aprs_tracker.ron")]
    config: PathBuf,

    /// report what is going on
    #[arg(short,long)]
    verbose: bool,

    /// enable debug output for GPS input and/or TNC output
    #[arg(short='z', long="debug", value_enum)]
    debug: Vec<DebugTarget>,
}

#[tokio::main]
async fn main()->Result<()> {
    let args = Args::parse();

    let debug_targets: Vec<&str> = args.debug.iter().map( |t| t.module()).collect();
    init_tracing( args.verbose, &debug_targets)?;

    let config = load_config( &args.config)?;
    info!("using config file {}", args.config.display());

    let mut tracker = AprsTracker::new( config);
    tracker.start().await?;

    tokio::select! {
        res = tracker.join() => res?,
        _ = signal::ctrl_c() => info!("shutting down"),
    }
    tracker.terminate();

    Ok(())
}
