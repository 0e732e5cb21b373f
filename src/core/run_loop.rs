use std::time::Duration;

use super::cancel::CancelToken;
use super::session::{advance_frame, Session};
use super::timer::FpsCounter;
use crate::traits::{FrameSink, RefreshFlag, RefreshScheduler};

/// What a headless run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub failed_frames: u64,
}

/// Drives frames without a window until cancelled, out of frames, or no
/// further refresh was requested
#[derive(Debug, Clone)]
pub struct RunLoop {
    cancel: CancelToken,
    max_frames: Option<u64>,
    frame_interval: Option<Duration>,
}

impl RunLoop {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            max_frames: None,
            frame_interval: None,
        }
    }

    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Pace frames to roughly this interval instead of running flat out
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    pub fn run<S: FrameSink + ?Sized>(&self, session: &mut Session, sink: &mut S) -> RunSummary {
        let refresh = RefreshFlag::new();
        let mut fps = FpsCounter::new(1.0);
        let mut summary = RunSummary::default();

        // The first frame needs no request
        refresh.request_refresh();

        while refresh.take() {
            if self.cancel.is_cancelled() {
                log::info!("Run cancelled after {} frames", summary.frames);
                break;
            }
            if self.max_frames.is_some_and(|max| summary.frames >= max) {
                break;
            }

            session.poll_assets();

            match advance_frame(session, sink, &refresh) {
                Ok(timing) => {
                    if let Some(rate) = fps.tick(timing.delta) {
                        log::info!("FPS: {:.1}", rate);
                    }
                }
                Err(e) => {
                    log::error!("{:#}", e);
                    summary.failed_frames += 1;
                }
            }
            summary.frames += 1;

            if let Some(interval) = self.frame_interval {
                std::thread::sleep(interval);
            }
        }

        summary
    }
}
