use crate::algorithms::odometry::{
    OdometryEstimator, Pose, PoseUpdate, ResetDecision, TickCount,
};
use crate::config::OdometryConfig;
use crate::{EncoderTicks, OdometryPose};
use tread_core::error::TreadResult;

type Result<T> = TreadResult<T>;
use tread_core::{Hub, Node, NodeInfo, NodeInfoExt};

/// Registered node name
pub const ODOMETRY_NODE_NAME: &str = "rss/odometry";

/// Wheel Odometry Node
///
/// Dead-reckons the robot pose from cumulative wheel encoder ticks and
/// publishes one `OdometryPose` per received `EncoderTicks` sample.
///
/// # Channels
/// - **Input** `rss/encoder` (`EncoderTicks`)
/// - **Output** `rss/odometry` (`OdometryPose`)
/// - **Reset** `rss/odometry_update` (`OdometryPose`, optional): only an exact
///   `(0, 0, 0)` command is honored; the next sample then reseeds the tick
///   baseline and the pose restarts at the origin
///
/// Within one tick, queued reset commands are handled before queued samples.
///
/// # Example
/// ```rust,ignore
/// use tread_library::config::{ConfigPreset, OdometryConfig};
/// use tread_library::nodes::OdometryNode;
///
/// let odom = OdometryNode::from_config(&OdometryConfig::preset(ConfigPreset::Streaming))?;
/// scheduler.add(Box::new(odom), 10, Some(true));
/// ```
pub struct OdometryNode {
    // Input subscribers
    encoder_sub: Hub<EncoderTicks>,
    reset_sub: Option<Hub<OdometryPose>>,

    // Output publisher
    odom_publisher: Hub<OdometryPose>,

    estimator: OdometryEstimator,
    last_published: Option<OdometryPose>,

    // Counters
    samples_processed: u64,
    resets_accepted: u64,
    dropped_poses: u64,
}

impl OdometryNode {
    /// Create with the default (`Resettable`) configuration
    pub fn new() -> Result<Self> {
        Self::from_config(&OdometryConfig::default())
    }

    /// Create from a configuration; fails on invalid constants or topics
    pub fn from_config(config: &OdometryConfig) -> Result<Self> {
        config.validate()?;

        let reset_sub = if config.reset_channel {
            Some(Hub::new(&config.topics.reset)?)
        } else {
            None
        };

        Ok(Self {
            encoder_sub: Hub::new(&config.topics.encoder)?,
            reset_sub,
            odom_publisher: Hub::new(&config.topics.odometry)?,
            estimator: OdometryEstimator::from_config(config)?,
            last_published: None,
            samples_processed: 0,
            resets_accepted: 0,
            dropped_poses: 0,
        })
    }

    /// Process one tick sample and publish the resulting pose.
    ///
    /// Returns the message handed to the output topic. Only a message the
    /// topic accepted becomes the republish candidate.
    pub fn handle_ticks(
        &mut self,
        ticks: EncoderTicks,
        mut ctx: Option<&mut NodeInfo>,
    ) -> OdometryPose {
        let update = self.estimator.update(TickCount::from(ticks));
        self.samples_processed += 1;

        if update.reseeded {
            ctx.log_debug_with(|| format!("Baseline seeded at L:{} R:{}", ticks.left, ticks.right));
        }

        let msg = self.outgoing_message(&update);
        match self.odom_publisher.send(msg, ctx.as_deref_mut()) {
            Ok(()) => self.last_published = Some(msg),
            Err(_) => {
                // Not recorded: a later zero delta must not repeat an unsent stamp
                self.dropped_poses += 1;
                ctx.log_warning(&format!(
                    "Odometry topic '{}' full, pose dropped",
                    self.odom_publisher.get_topic_name()
                ));
            }
        }
        msg
    }

    /// Process one reset command
    pub fn handle_reset(
        &mut self,
        command: OdometryPose,
        mut ctx: Option<&mut NodeInfo>,
    ) -> ResetDecision {
        ctx.log_info(&format!(
            "Got odometry reset command: {},{},{}",
            command.x, command.y, command.theta
        ));

        let decision = self.estimator.request_reset(Pose::from(command));
        match decision {
            ResetDecision::Accepted => {
                self.resets_accepted += 1;
                ctx.log_info("Odometry reset armed; next sample reseeds the baseline");
            }
            ResetDecision::AlreadyPending => {
                ctx.log_debug("Odometry reset already pending");
            }
            ResetDecision::Ignored => {
                ctx.log_debug("Ignoring reset command: only (0, 0, 0) is accepted");
            }
        }
        decision
    }

    // Republish the previous message verbatim while the pose has not moved
    fn outgoing_message(&self, update: &PoseUpdate) -> OdometryPose {
        if !update.integrated {
            if let Some(last) = self.last_published {
                if Pose::from(last) == update.pose {
                    return last;
                }
            }
        }
        update.pose.to_message(tread_core::timestamp_now())
    }

    /// Current pose estimate
    pub fn pose(&self) -> Pose {
        self.estimator.pose()
    }

    pub fn estimator(&self) -> &OdometryEstimator {
        &self.estimator
    }

    pub fn last_published(&self) -> Option<OdometryPose> {
        self.last_published
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    pub fn resets_accepted(&self) -> u64 {
        self.resets_accepted
    }

    pub fn dropped_poses(&self) -> u64 {
        self.dropped_poses
    }
}

impl Node for OdometryNode {
    fn name(&self) -> &'static str {
        ODOMETRY_NODE_NAME
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> Result<()> {
        let geometry = self.estimator.kinematics().geometry();
        ctx.log_info(&format!(
            "Odometry ready: wheelbase={}m, {:.3e} m/tick, zero delta: {:?}, reset channel: {}",
            geometry.wheelbase,
            self.estimator.kinematics().meters_per_tick(),
            self.estimator.zero_delta_policy(),
            self.reset_sub.is_some()
        ));
        Ok(())
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        if let Some(reset_sub) = &self.reset_sub {
            let commands: Vec<OdometryPose> =
                std::iter::from_fn(|| reset_sub.recv(ctx.as_deref_mut())).collect();
            for command in commands {
                self.handle_reset(command, ctx.as_deref_mut());
            }
        }

        while let Some(ticks) = self.encoder_sub.recv(ctx.as_deref_mut()) {
            self.handle_ticks(ticks, ctx.as_deref_mut());
        }
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> Result<()> {
        let pose = self.estimator.pose();
        ctx.log_info(&format!(
            "Odometry stopped after {} samples ({} resets, {} dropped): pose=({:.3}, {:.3}) θ={:.3}",
            self.samples_processed,
            self.resets_accepted,
            self.dropped_poses,
            pose.x,
            pose.y,
            pose.theta
        ));
        Ok(())
    }
}
