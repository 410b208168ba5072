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
use tokio;
use anyhow::Result;
use clap::Parser;
use odin_aprs::{Endpoint, init_tracing, position_channel, nmea::read_gps, tracker::open_gps};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "GPS monitoring tool that prints position updates from NMEA RMC sentences")]
struct Args {
    /// treat source as "host:port" of a NMEA socket instead of a device path
    #[arg(long)]
    tcp: bool,

    /// log every received line
    #[arg(short,long)]
    verbose: bool,

    /// device pathname or socket address to read NMEA sentences from
    source: String,
}

#[tokio::main]
async fn main()->Result<()> {
    let args = Args::parse();
    if args.verbose { init_tracing( false, &["odin_aprs::nmea"])?; }

    let endpoint = if args.tcp { Endpoint::Tcp( args.source.clone()) } else { Endpoint::Device( PathBuf::from( &args.source)) };
    let input = open_gps( &endpoint).await?;

    let (tx, mut rx) = position_channel();
    let reader = tokio::spawn( read_gps( input, tx));

    while rx.changed().await.is_ok() {
        println!("{}", *rx.borrow_and_update());
    }

    reader.await??;
    Ok(())
}
