//! Nodes that feed a recorded log into the odometry topics and print what
//! comes out.

use serde::Deserialize;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tread_core::error::{TreadError, TreadResult};
use tread_core::{Hub, Node, NodeInfo, NodeInfoExt};
use tread_library::config::OdometryConfig;
use tread_library::{EncoderTicks, OdometryPose};

/// One line of a replay log
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReplayRecord {
    /// `{"reset": {"x": 0, "y": 0, "theta": 0}}`
    Reset { reset: OdometryPose },
    /// `{"left": 120, "right": 118}`, optionally with `stamp_nanos`
    Ticks(EncoderTicks),
}

impl ReplayRecord {
    /// Parse a log line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Option<serde_json::Result<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(serde_json::from_str(line))
    }
}

/// Publishes at most one record per tick, so a reset and the samples around
/// it reach the odometry node in log order.
pub struct TickSourceNode<R: BufRead + Send + 'static> {
    reader: R,
    encoder_pub: Hub<EncoderTicks>,
    reset_pub: Option<Hub<OdometryPose>>,
    finished: Arc<AtomicBool>,
    line_number: usize,
}

impl<R: BufRead + Send + 'static> TickSourceNode<R> {
    pub fn new(reader: R, config: &OdometryConfig) -> TreadResult<Self> {
        let reset_pub = if config.reset_channel {
            Some(Hub::new(&config.topics.reset)?)
        } else {
            None
        };

        Ok(Self {
            reader,
            encoder_pub: Hub::new(&config.topics.encoder)?,
            reset_pub,
            finished: Arc::new(AtomicBool::new(false)),
            line_number: 0,
        })
    }

    /// Set once the input is exhausted or unreadable
    pub fn finished_handle(&self) -> Arc<AtomicBool> {
        self.finished.clone()
    }

    fn next_record(&mut self, ctx: &mut Option<&mut NodeInfo>) -> Option<ReplayRecord> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => self.line_number += 1,
                Err(e) => {
                    ctx.log_error(&format!("Failed to read replay input: {}", e));
                    return None;
                }
            }

            match ReplayRecord::parse(&line) {
                None => continue,
                Some(Ok(record)) => return Some(record),
                Some(Err(e)) => ctx.log_warning(&format!(
                    "Skipping line {}: {}",
                    self.line_number, e
                )),
            }
        }
    }
}

impl<R: BufRead + Send + 'static> Node for TickSourceNode<R> {
    fn name(&self) -> &'static str {
        "tick_source"
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        if self.finished.load(Ordering::SeqCst) {
            return;
        }

        let Some(record) = self.next_record(&mut ctx) else {
            ctx.log_info(&format!("Replay input exhausted after {} lines", self.line_number));
            self.finished.store(true, Ordering::SeqCst);
            return;
        };

        let delivered = match record {
            ReplayRecord::Ticks(ticks) => self.encoder_pub.send(ticks, ctx.as_deref_mut()).is_ok(),
            ReplayRecord::Reset { reset } => match &self.reset_pub {
                Some(reset_pub) => reset_pub.send(reset, ctx.as_deref_mut()).is_ok(),
                None => {
                    ctx.log_warning(&format!(
                        "Line {}: reset command dropped, reset channel disabled",
                        self.line_number
                    ));
                    true
                }
            },
        };
        if !delivered {
            ctx.log_warning(&format!("Line {}: topic full, record dropped", self.line_number));
        }
    }
}

/// Writes every received pose as one JSON line
pub struct PoseSinkNode<W: Write + Send + 'static> {
    odometry_sub: Hub<OdometryPose>,
    out: W,
    running: Arc<AtomicBool>,
    written: u64,
}

impl<W: Write + Send + 'static> PoseSinkNode<W> {
    /// `running` is cleared when the output can no longer be written
    pub fn new(out: W, config: &OdometryConfig, running: Arc<AtomicBool>) -> TreadResult<Self> {
        Ok(Self {
            odometry_sub: Hub::new(&config.topics.odometry)?,
            out,
            running,
            written: 0,
        })
    }

    fn write_pose(&mut self, pose: &OdometryPose) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, pose)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write + Send + 'static> Node for PoseSinkNode<W> {
    fn name(&self) -> &'static str {
        "pose_sink"
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        while let Some(pose) = self.odometry_sub.recv(ctx.as_deref_mut()) {
            if let Err(e) = self.write_pose(&pose) {
                ctx.log_error(&format!("Failed to write pose: {}", e));
                self.running.store(false, Ordering::SeqCst);
                return;
            }
            self.written += 1;
        }
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> TreadResult<()> {
        self.out
            .flush()
            .map_err(|e| TreadError::node(self.name(), format!("flushing poses: {}", e)))?;
        ctx.log_info(&format!("Wrote {} poses", self.written));
        Ok(())
    }
}
