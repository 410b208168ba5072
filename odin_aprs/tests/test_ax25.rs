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

use odin_aprs::ax25::{self, Ax25Frame, Callsign, PathEntry, encode_address, decode_address, CONTROL_UI, PID_NO_LAYER3};

// run with "cargo test --test test_ax25 -- --nocapture"

fn cs (s: &str)->Callsign { s.parse().unwrap() }

#[test]
fn test_address_layout() {
    let addr = encode_address( "N0CALL", 5, false, false);
    println!("N0CALL-5: {:02X?}", addr);

    assert_eq!( addr.len(), 7);
    assert_eq!( &addr[..6], &[b'N'<<1, b'0'<<1, b'C'<<1, b'A'<<1, b'L'<<1, b'L'<<1]);
    assert_eq!( addr[6], 0x60 | (5 << 1));

    // short callsigns are padded with (shifted) spaces
    let addr = encode_address( "AB1", 0, false, true);
    assert_eq!( &addr[3..6], &[0x40, 0x40, 0x40]);
    assert_eq!( addr[6], 0x61);
}

#[test]
fn test_address_flags() {
    let not_repeated = encode_address( "WIDE2", 1, false, false);
    assert_eq!( not_repeated[6] & 0xE0, 0x60);
    assert_eq!( not_repeated[6] & 0x01, 0);

    let repeated = encode_address( "WIDE2", 1, true, true);
    assert_eq!( repeated[6] & 0xE0, 0xE0);
    assert_eq!( repeated[6] & 0x01, 1);
}

#[test]
fn test_address_roundtrip() {
    for call in ["K", "N0", "AB1", "W1AW", "KI6ABC", "N0CALL"] {
        for ssid in [0u8, 1, 7, 9, 15] {
            for last in [false, true] {
                let addr = encode_address( call, ssid, false, last);
                let (c, s, repeated, l) = decode_address( &addr);
                assert_eq!( c, call);
                assert_eq!( s, ssid);
                assert!( !repeated);
                assert_eq!( l, last);
            }
        }
    }
}

#[test]
fn test_callsign_parsing() {
    let c = cs("N0CALL-5");
    assert_eq!( c.call(), "N0CALL");
    assert_eq!( c.ssid(), 5);
    assert_eq!( c.to_string(), "N0CALL-5");

    let c = cs("WIDE1");
    assert_eq!( c.ssid(), 0);
    assert_eq!( c.to_string(), "WIDE1");

    assert!( "TOOLONG".parse::<Callsign>().is_err());
    assert!( "".parse::<Callsign>().is_err());
    assert!( "n0call".parse::<Callsign>().is_err());
    assert!( "N0CALL-16".parse::<Callsign>().is_err());
    assert!( "N0CALL-X".parse::<Callsign>().is_err());
}

#[test]
fn test_frame_without_path() {
    let frame = Ax25Frame::new( Callsign::tocall(), cs("N0CALL-5"), vec![], b"!4903.50N/07201.75W>".to_vec());
    let body = frame.encode();

    assert_eq!( body.len(), 14 + 2 + 20);
    assert_eq!( &body[..7], &encode_address( "APMGT1", 0, false, false));
    assert_eq!( &body[7..14], &encode_address( "N0CALL", 5, false, true)); // source ends address field
    assert_eq!( &body[14..16], &[CONTROL_UI, PID_NO_LAYER3]);
    assert_eq!( &body[16..], b"!4903.50N/07201.75W>");
}

#[test]
fn test_frame_with_path() {
    let path = vec![ PathEntry::new( cs("WIDE1-1")), PathEntry::new( cs("WIDE2-2")) ];
    let frame = Ax25Frame::new( Callsign::tocall(), cs("N0CALL-5"), path, "test");
    let body = frame.encode();

    assert_eq!( body.len(), 28 + 2 + 4);
    assert_eq!( body[13] & 0x01, 0); // source no longer last
    assert_eq!( &body[14..21], &encode_address( "WIDE1", 1, false, false));
    assert_eq!( &body[21..28], &encode_address( "WIDE2", 2, false, true));
    assert_eq!( &body[28..30], &[0x03, 0xF0]);

    // exactly one address element has the end bit set
    let n_last = (0..4).filter( |i| body[i*7 + 6] & 0x01 != 0).count();
    assert_eq!( n_last, 1);
}

#[test]
fn test_frame_tnc2_display() {
    let mut path = vec![ PathEntry::new( cs("WIDE1-1")), PathEntry::new( cs("WIDE2-1")) ];
    path[0].repeated = true;
    let frame = Ax25Frame::new( Callsign::tocall(), cs("N0CALL-9"), path, "!4903.50N/07201.75W>hi");

    let s = frame.to_string();
    println!("{s}");
    assert_eq!( s, "N0CALL-9>APMGT1,WIDE1-1*,WIDE2-1:!4903.50N/07201.75W>hi");
}
