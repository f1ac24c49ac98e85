use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::config::Timings;

/// What happened on a single progress tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Progress(u8),
    Complete,
    /// A newer upload took over; stop ticking
    Superseded,
}

/// Drives simulated upload progress on a fixed cadence
#[derive(Debug, Clone)]
pub struct UploadSimulator {
    tick: Duration,
    step: u8,
}

impl UploadSimulator {
    pub fn new(timings: &Timings) -> Self {
        Self {
            tick: timings.upload_tick,
            step: timings.upload_step,
        }
    }

    /// Call `advance(step)` once per tick until it reports completion or
    /// that the upload was superseded. Returns true on completion.
    pub async fn run<F>(&self, mut advance: F) -> Result<bool>
    where
        F: FnMut(u8) -> Result<TickOutcome>,
    {
        loop {
            tokio::time::sleep(self.tick).await;
            match advance(self.step)? {
                TickOutcome::Progress(p) => debug!("⏫ Upload progress {}%", p),
                TickOutcome::Complete => return Ok(true),
                TickOutcome::Superseded => return Ok(false),
            }
        }
    }
}
