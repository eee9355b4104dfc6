use crate::core::{LogLevel, Node, NodeConfig, NodeInfo, NodeState};
use crate::error::TreadResult;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default cycle period (50 Hz)
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(20);

/// Node registration info with lifecycle tracking
struct RegisteredNode {
    node: Box<dyn Node>,
    priority: u32,
    initialized: bool,
    context: NodeInfo,
}

/// Central orchestrator: holds nodes, drives the tick loop.
///
/// Everything runs on the calling thread. One cycle ticks every node once,
/// lowest priority number first, so a producer registered ahead of a consumer
/// has its messages seen in the same cycle.
pub struct Scheduler {
    nodes: Vec<RegisteredNode>,
    running: Arc<AtomicBool>,
    scheduler_name: String,
    tick_period: Duration,
    log_level: LogLevel,
    cycles: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
            scheduler_name: "DefaultScheduler".to_string(),
            tick_period: DEFAULT_TICK_PERIOD,
            log_level: LogLevel::Info,
            cycles: 0,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.scheduler_name = name.to_string();
        self
    }

    /// Pause between cycles. `Duration::ZERO` runs cycles back to back.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Log level given to nodes registered through `add` from now on
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Register a node.
    ///
    /// `priority`: 0 is ticked first. Nodes of equal priority keep
    /// registration order. `logging_enabled` defaults to false; the node logs
    /// at the scheduler's level.
    pub fn add(
        &mut self,
        node: Box<dyn Node>,
        priority: u32,
        logging_enabled: Option<bool>,
    ) -> &mut Self {
        let config = NodeConfig {
            enable_logging: logging_enabled.unwrap_or(false),
            log_level: self.log_level,
        };
        self.add_with_config(node, priority, config)
    }

    /// Register a node with an explicit logging config
    pub fn add_with_config(
        &mut self,
        node: Box<dyn Node>,
        priority: u32,
        config: NodeConfig,
    ) -> &mut Self {
        let node_name = node.name().to_string();
        let logging_enabled = config.enable_logging;
        let log_level = config.log_level;
        let context = NodeInfo::new_with_config(node_name.clone(), config);

        self.nodes.push(RegisteredNode {
            node,
            priority,
            initialized: false,
            context,
        });
        self.nodes.sort_by_key(|registered| registered.priority);

        log::info!(
            "[{}] added node '{}' with priority {} (logging: {}, level: {:?})",
            self.scheduler_name,
            node_name,
            priority,
            logging_enabled,
            log_level
        );
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Flag other code can clear to stop `run*` loops
    pub fn running_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Call `init` on every node not yet initialized. A node whose init fails
    /// is moved to the error state and never ticked.
    pub fn init_nodes(&mut self) {
        for registered in self.nodes.iter_mut() {
            if registered.initialized
                || matches!(registered.context.state(), NodeState::Error(_))
            {
                continue;
            }

            let node_name = registered.node.name();
            registered.context.set_state(NodeState::Initializing);
            match registered.node.init(&mut registered.context) {
                Ok(()) => {
                    registered.initialized = true;
                    registered.context.set_state(NodeState::Running);
                    log::info!("[{}] initialized node '{}'", self.scheduler_name, node_name);
                }
                Err(e) => {
                    registered
                        .context
                        .transition_to_error(format!("Initialization failed: {}", e));
                }
            }
        }
    }

    /// Run one cycle: every running node ticks once
    pub fn tick_once(&mut self) {
        self.init_nodes();

        for registered in self.nodes.iter_mut().filter(|r| r.initialized) {
            let ctx = &mut registered.context;
            ctx.start_tick();
            registered.node.tick(Some(&mut *ctx));
            ctx.record_tick();
        }
        self.cycles += 1;
    }

    /// Run until `done` returns true or the scheduler is stopped, then shut
    /// every node down
    pub fn run_until<F: FnMut() -> bool>(&mut self, mut done: F) -> TreadResult<()> {
        while self.is_running() && !done() {
            self.tick_once();
            if !self.tick_period.is_zero() {
                std::thread::sleep(self.tick_period);
            }
        }
        self.shutdown_nodes();
        Ok(())
    }

    /// Run all nodes for a specified duration, then shutdown gracefully
    pub fn run_for(&mut self, duration: Duration) -> TreadResult<()> {
        let start_time = Instant::now();
        self.run_until(|| start_time.elapsed() >= duration)
    }

    /// Main loop; stops on Ctrl+C
    pub fn run(&mut self) -> TreadResult<()> {
        let running = self.running.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            eprintln!("{}", "\nCtrl+C received! Shutting down scheduler...".red());
            running.store(false, Ordering::SeqCst);
        }) {
            log::warn!("Failed to set signal handler: {}", e);
        }

        self.run_until(|| false)
    }

    fn shutdown_nodes(&mut self) {
        for registered in self.nodes.iter_mut().filter(|r| r.initialized) {
            let node_name = registered.node.name();
            registered.context.set_state(NodeState::Stopping);
            match registered.node.shutdown(&mut registered.context) {
                Ok(()) => {
                    registered.context.set_state(NodeState::Stopped);
                    log::info!("[{}] shut down node '{}'", self.scheduler_name, node_name);
                }
                Err(e) => registered
                    .context
                    .transition_to_error(format!("Shutdown failed: {}", e)),
            }
            registered.initialized = false;
        }
        log::info!(
            "[{}] shutdown complete after {} cycles",
            self.scheduler_name,
            self.cycles
        );
    }

    /// Names of all registered nodes, in tick order
    pub fn get_node_list(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|registered| registered.node.name().to_string())
            .collect()
    }

    /// Runtime context of a registered node
    pub fn node_info(&self, name: &str) -> Option<&NodeInfo> {
        self.nodes
            .iter()
            .find(|registered| registered.node.name() == name)
            .map(|registered| &registered.context)
    }
}
