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
use odin_aprs::{
    TrackerConfig, Endpoint, load_config, TOCALL,
    aprs::Symbol,
    beacon::BeaconMode,
    config::parse_config,
};

// run with "cargo test --test test_config -- --nocapture"

fn config_with (station: &str, path: &str, beacon: &str)->String {
    format!(r#"TrackerConfig(
        station: "{station}",
        path: [{path}],
        gps: Device("/dev/ttyUSB0"),
        tnc: Tcp("localhost:8001"),
        beacon: {beacon},
    )"#)
}

#[test]
fn test_sample_config() {
    let config = load_config( "configs/aprs_tracker.ron").unwrap();
    println!("{config:#?}");

    assert_eq!( config.station.to_string(), "N0CALL-9");
    assert_eq!( config.destination.call(), TOCALL);
    assert_eq!( config.path.len(), 2);
    assert_eq!( config.gps, Endpoint::Device( PathBuf::from("/dev/ttyUSB0")));
    assert_eq!( config.tnc, Endpoint::Tcp( "127.0.0.1:8001".into()));
    assert!( matches!( config.beacon, BeaconMode::Smart{ low_rate: 1800, high_rate: 180, turn_time: 15, .. }));
    assert!( config.compressed);
}

#[test]
fn test_defaults() {
    let config = parse_config( &config_with( "N0CALL", "", "Static( rate: 600 )")).unwrap();

    assert_eq!( config.station.ssid(), 0);
    assert_eq!( config.destination.to_string(), TOCALL);
    assert!( config.path.is_empty());
    assert_eq!( config.symbol, Symbol::default());
    assert!( config.comment.is_empty());
    assert!( !config.compressed);
    assert_eq!( config.beacon, BeaconMode::Static{ rate: 600 });
}

#[test]
fn test_invalid_callsigns() {
    assert!( parse_config( &config_with( "TOOLONG1", "", "Static( rate: 600 )")).is_err());
    assert!( parse_config( &config_with( "N0CALL-16", "", "Static( rate: 600 )")).is_err());
    assert!( parse_config( &config_with( "N0CALL", "\"WIDE1-X\"", "Static( rate: 600 )")).is_err());
}

#[test]
fn test_path_length() {
    let path8 = vec!["\"WIDE1-1\""; 8].join(",");
    assert!( parse_config( &config_with( "N0CALL", &path8, "Static( rate: 600 )")).is_ok());

    let path9 = vec!["\"WIDE1-1\""; 9].join(",");
    let res = parse_config( &config_with( "N0CALL", &path9, "Static( rate: 600 )"));
    println!("{res:?}");
    assert!( res.is_err());
}

#[test]
fn test_invalid_beacon_params() {
    assert!( parse_config( &config_with( "N0CALL", "", "Static( rate: 0 )")).is_err());

    let smart = |low_speed: f64, high_speed: f64, low_rate: u32| format!(
        "Smart( low_speed: {low_speed:?}, low_rate: {low_rate}, high_speed: {high_speed:?}, high_rate: 180, turn_min: 30.0, turn_time: 15, turn_slope: 240.0 )"
    );

    assert!( parse_config( &config_with( "N0CALL", "", &smart( 3.0, 50.0, 1800))).is_ok());
    assert!( parse_config( &config_with( "N0CALL", "", &smart( 50.0, 50.0, 1800))).is_err());
    assert!( parse_config( &config_with( "N0CALL", "", &smart( 60.0, 50.0, 1800))).is_err());
    assert!( parse_config( &config_with( "N0CALL", "", &smart( 3.0, 50.0, 0))).is_err());
}
