use colored::Colorize;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Trait for providing lightweight logging summaries of message types
///
/// Messages crossing a `Hub` are rendered through this trait when the node
/// has logging enabled, so the summary should stay short.
pub trait LogSummary {
    /// Return a compact string representation suitable for logging
    fn log_summary(&self) -> String;
}

/// Node states for monitoring and lifecycle management
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
    Error(String),
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Uninitialized => write!(f, "Uninitialized"),
            NodeState::Initializing => write!(f, "Initializing"),
            NodeState::Running => write!(f, "Running"),
            NodeState::Stopping => write!(f, "Stopping"),
            NodeState::Stopped => write!(f, "Stopped"),
            NodeState::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Log verbosity for a node's own messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Quiet,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse the level names used in parameter files ("DEBUG", "info", ...)
    pub fn parse(level: &str) -> Option<Self> {
        match level.to_ascii_uppercase().as_str() {
            "QUIET" => Some(LogLevel::Quiet),
            "WARN" | "WARNING" => Some(LogLevel::Warning),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

/// Performance metrics for node execution
#[derive(Debug, Clone, Default)]
pub struct NodeMetrics {
    pub total_ticks: u64,
    pub avg_tick_duration_ms: f64,
    pub max_tick_duration_ms: f64,
    pub last_tick_duration_ms: f64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub errors_count: u64,
    pub warnings_count: u64,
}

/// Configuration parameters for node behavior
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub enable_logging: bool,
    pub log_level: LogLevel,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            enable_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

/// Runtime context handed to a node on every callback
pub struct NodeInfo {
    name: String,

    state: NodeState,

    config: NodeConfig,
    metrics: NodeMetrics,

    tick_start_time: Option<Instant>,

    // topic -> message count
    published_topics: HashMap<String, u64>,
    subscribed_topics: HashMap<String, u64>,
}

impl NodeInfo {
    pub fn new(node_name: String, logging_enabled: bool) -> Self {
        let config = NodeConfig {
            enable_logging: logging_enabled,
            ..Default::default()
        };
        Self::new_with_config(node_name, config)
    }

    pub fn new_with_config(node_name: String, config: NodeConfig) -> Self {
        Self {
            name: node_name,
            state: NodeState::Uninitialized,
            config,
            metrics: NodeMetrics::default(),
            tick_start_time: None,
            published_topics: HashMap::new(),
            subscribed_topics: HashMap::new(),
        }
    }

    // State Management Methods
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn set_state(&mut self, new_state: NodeState) {
        if self.state != new_state {
            log::debug!(target: "tread::node", "[{}] {} -> {}", self.name, self.state, new_state);
            self.state = new_state;
        }
    }

    pub fn transition_to_error(&mut self, error_msg: String) {
        self.log_error(&error_msg);
        self.set_state(NodeState::Error(error_msg));
    }

    // Tick Management
    pub fn start_tick(&mut self) {
        self.tick_start_time = Some(Instant::now());
    }

    pub fn record_tick(&mut self) {
        if let Some(start_time) = self.tick_start_time.take() {
            let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

            self.metrics.total_ticks += 1;
            self.metrics.last_tick_duration_ms = duration_ms;
            if duration_ms > self.metrics.max_tick_duration_ms {
                self.metrics.max_tick_duration_ms = duration_ms;
            }

            let total_duration =
                self.metrics.avg_tick_duration_ms * (self.metrics.total_ticks - 1) as f64;
            self.metrics.avg_tick_duration_ms =
                (total_duration + duration_ms) / self.metrics.total_ticks as f64;
        }
    }

    /// Record a publish on `topic`. Used by `Hub::send` with a summary taken
    /// before the message was moved into the queue.
    pub fn log_pub_summary(&mut self, topic: &str, summary: &str) {
        if self.config.enable_logging && self.config.log_level >= LogLevel::Debug {
            eprintln!(
                "{} {} {} {} = {}",
                format!("[{}]", chrono::Local::now().format("%H:%M:%S%.3f")).cyan(),
                self.name.yellow(),
                "--PUB-->".bold().green(),
                format!("'{}'", topic).magenta(),
                summary
            );
        }

        *self.published_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_sent += 1;
    }

    /// Record a receive on `topic`
    pub fn log_sub_summary(&mut self, topic: &str, summary: &str) {
        if self.config.enable_logging && self.config.log_level >= LogLevel::Debug {
            eprintln!(
                "{} {} {} {} = {}",
                format!("[{}]", chrono::Local::now().format("%H:%M:%S%.3f")).cyan(),
                self.name.yellow(),
                "<--SUB--".bold().blue(),
                format!("'{}'", topic).magenta(),
                summary
            );
        }

        *self.subscribed_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_received += 1;
    }

    pub fn log_info(&mut self, message: &str) {
        if self.config.enable_logging && self.config.log_level >= LogLevel::Info {
            log::info!(target: "tread::node", "[{}] {}", self.name, message);
        }
    }

    pub fn log_warning(&mut self, message: &str) {
        if self.config.enable_logging && self.config.log_level >= LogLevel::Warning {
            log::warn!(target: "tread::node", "[{}] {}", self.name, message);
        }
        self.metrics.warnings_count += 1;
    }

    pub fn log_error(&mut self, message: &str) {
        if self.config.enable_logging {
            log::error!(target: "tread::node", "[{}] {}", self.name, message);
        }
        self.metrics.errors_count += 1;
    }

    pub fn log_debug(&mut self, message: &str) {
        if self.config.enable_logging && self.config.log_level >= LogLevel::Debug {
            log::debug!(target: "tread::node", "[{}] {}", self.name, message);
        }
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }
    pub fn published_topics(&self) -> &HashMap<String, u64> {
        &self.published_topics
    }
    pub fn subscribed_topics(&self) -> &HashMap<String, u64> {
        &self.subscribed_topics
    }
}

/// Trait implemented by every unit the scheduler drives
pub trait Node: Send {
    /// Get the node's name (must be unique)
    fn name(&self) -> &'static str;

    /// Initialize the node (called once at startup)
    fn init(&mut self, ctx: &mut NodeInfo) -> crate::error::TreadResult<()> {
        ctx.log_info("Node initialized successfully");
        Ok(())
    }

    /// Main execution step (called repeatedly)
    fn tick(&mut self, ctx: Option<&mut NodeInfo>);

    /// Shutdown the node (called once at cleanup)
    fn shutdown(&mut self, ctx: &mut NodeInfo) -> crate::error::TreadResult<()> {
        ctx.log_info("Node shutdown successfully");
        Ok(())
    }
}

// LogSummary implementations for primitive types
impl LogSummary for f64 {
    fn log_summary(&self) -> String {
        format!("{:.3}", self)
    }
}

impl LogSummary for i64 {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for u64 {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for bool {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for String {
    fn log_summary(&self) -> String {
        self.clone()
    }
}
