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

//! KISS transport framing for TNCs
//!
//! `FEND CMD <escaped frame> FEND` where FEND and FESC bytes inside of the frame are replaced by
//! `FESC TFEND` and `FESC TFESC` respectively

use memchr::memchr2;
use tokio::io::{AsyncWrite,AsyncWriteExt};
use tracing::{debug,info};
use crate::{ax25::Ax25Frame, errors::{Result,OdinAprsError,parse_error}};

pub const FEND: u8 = 0xC0;
pub const FESC: u8 = 0xDB;
pub const TFEND: u8 = 0xDC;
pub const TFESC: u8 = 0xDD;

/// command byte: data frame on TNC port 0
pub const CMD_DATA_PORT0: u8 = 0x00;

/// single forward pass - inserted escape bytes are never re-scanned
pub fn escape (body: &[u8])->Vec<u8> {
    let mut out = Vec::with_capacity( body.len() + body.len()/8 + 2);
    let mut i = 0;

    while let Some(j) = memchr2( FEND, FESC, &body[i..]) {
        let k = i + j;
        out.extend_from_slice( &body[i..k]);
        out.push( FESC);
        out.push( if body[k] == FEND { TFEND } else { TFESC });
        i = k + 1;
    }
    out.extend_from_slice( &body[i..]);

    out
}

pub fn unescape (data: &[u8])->Result<Vec<u8>> {
    let mut out = Vec::with_capacity( data.len());
    let mut it = data.iter();

    while let Some(&b) = it.next() {
        match b {
            FESC => match it.next() {
                Some(&TFEND) => out.push( FEND),
                Some(&TFESC) => out.push( FESC),
                Some(other) => return Err( parse_error!("invalid KISS escape sequence: 0x{:02X}", other)),
                None => return Err( parse_error!("dangling KISS escape at end of frame"))
            }
            FEND => return Err( parse_error!("unescaped frame delimiter in KISS data")),
            _ => out.push( b)
        }
    }

    Ok(out)
}

/// the complete KISS frame for a given (un-escaped) AX.25 frame body
pub fn wrap (body: &[u8])->Vec<u8> {
    let escaped = escape( body);
    let mut out = Vec::with_capacity( escaped.len() + 3);

    out.push( FEND);
    out.push( CMD_DATA_PORT0);
    out.extend_from_slice( &escaped);
    out.push( FEND);

    out
}

/// writes complete KISS frames to a TNC sink. Each frame is handed to the sink in a single write and
/// then flushed. A failed or short write is returned as an error, the remainder is not retried
pub struct KissWriter<W> {
    sink: W,
    n_sent: u64,
}

impl<W> KissWriter<W> where W: AsyncWrite + Unpin {
    pub fn new (sink: W)->Self {
        KissWriter { sink, n_sent: 0 }
    }

    pub async fn send_frame (&mut self, frame: &Ax25Frame)->Result<()> {
        let bytes = frame.to_kiss();

        let len = self.sink.write( &bytes).await?;
        if len < bytes.len() {
            return Err( OdinAprsError::OpFailedError( format!("short write to TNC: {} of {} bytes", len, bytes.len())))
        }
        self.sink.flush().await?;
        self.n_sent += 1;

        debug!("sent frame {} ({} bytes): {}", self.n_sent, bytes.len(), frame);
        Ok(())
    }

    pub fn frames_sent (&self)->u64 { self.n_sent }

    pub fn into_inner (self)->W { self.sink }
}
