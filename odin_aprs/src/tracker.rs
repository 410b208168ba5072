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

use std::sync::Arc;
use tokio::{
    fs::OpenOptions, net::TcpStream,
    io::{AsyncRead,AsyncWrite},
    task::JoinHandle
};
use tracing::{debug,info,warn,error};
use crate::{
    PositionSnapshot, PositionReceiver, TrackerConfig, Endpoint, position_channel,
    beacon::run_beacons, kiss::KissWriter, nmea::read_gps,
    errors::{Result,OdinAprsError}
};

pub type GpsInput = Box<dyn AsyncRead + Send + Unpin>;
pub type TncOutput = Box<dyn AsyncWrite + Send + Unpin>;

pub async fn open_gps (endpoint: &Endpoint)->Result<GpsInput> {
    let input: GpsInput = match endpoint {
        Endpoint::Device(path) => Box::new( OpenOptions::new().read(true).open( path).await?),
        Endpoint::Tcp(addr) => Box::new( TcpStream::connect( addr).await?)
    };
    info!("opened GPS input {}", endpoint);
    Ok(input)
}

pub async fn open_tnc (endpoint: &Endpoint)->Result<TncOutput> {
    let output: TncOutput = match endpoint {
        Endpoint::Device(path) => Box::new( OpenOptions::new().write(true).open( path).await?),
        Endpoint::Tcp(addr) => Box::new( TcpStream::connect( addr).await?)
    };
    info!("opened KISS output {}", endpoint);
    Ok(output)
}

/// the tracker, which runs two concurrent tasks:
///   - the GPS reader that parses NMEA input and publishes position snapshots
///   - the beacon loop that reads the last snapshot once per second and sends beacons when due
/// The only state shared between them is the position handoff channel
pub struct AprsTracker {
    config: Arc<TrackerConfig>,
    position: Option<PositionReceiver>,
    gps_task: Option<JoinHandle<Result<()>>>,
    beacon_task: Option<JoinHandle<Result<()>>>,
}

impl AprsTracker {
    pub fn new (config: TrackerConfig)->Self {
        AprsTracker { config: Arc::new(config), position: None, gps_task: None, beacon_task: None }
    }

    pub fn config (&self)->&TrackerConfig { self.config.as_ref() }

    /// open the configured endpoints and start the tasks
    pub async fn start (&mut self)->Result<()> {
        let gps = open_gps( &self.config.gps).await?;
        let tnc = open_tnc( &self.config.tnc).await?;
        self.start_with( gps, tnc);
        Ok(())
    }

    /// start the tasks with already opened endpoints
    pub fn start_with<R,W> (&mut self, gps: R, tnc: W) where R: AsyncRead + Send + Unpin + 'static, W: AsyncWrite + Send + Unpin + 'static {
        if self.gps_task.is_some() || self.beacon_task.is_some() {
            warn!("tracker already running");
            return
        }

        let (tx, rx) = position_channel();
        self.position = Some(rx.clone());

        info!("operating as {} ({:?})", self.config.station, self.config.beacon);
        self.gps_task = Some( tokio::spawn( read_gps( gps, tx)));
        self.beacon_task = Some( tokio::spawn( run_beacons( self.config.clone(), rx, KissWriter::new( tnc))));
    }

    /// the last published position (if we are running)
    pub fn position (&self)->Option<PositionSnapshot> {
        self.position.as_ref().map( |rx| rx.borrow().clone())
    }

    /// wait until one of our tasks terminates. A closed GPS input is reported as an error since
    /// we cannot send beacons without it
    pub async fn join (&mut self)->Result<()> {
        let res = match (self.gps_task.as_mut(), self.beacon_task.as_mut()) {
            (Some(gps_task), Some(beacon_task)) => {
                tokio::select! {
                    res = gps_task => match res {
                        Ok(Ok(())) => Err( OdinAprsError::OpFailedError( "GPS input closed".into())),
                        Ok(Err(e)) => Err(e),
                        Err(e) => Err(e.into())
                    },
                    res = beacon_task => match res {
                        Ok(res) => res,
                        Err(e) => Err(e.into())
                    }
                }
            }
            _ => Ok(())
        };

        if let Err(e) = &res { error!("tracker terminated: {}", e) }
        self.terminate();
        res
    }

    pub fn terminate (&mut self) {
        if let Some(task) = self.gps_task.take() { task.abort() }
        if let Some(task) = self.beacon_task.take() { task.abort() }
    }
}

impl Drop for AprsTracker {
    fn drop (&mut self) {
        self.terminate();
    }
}
