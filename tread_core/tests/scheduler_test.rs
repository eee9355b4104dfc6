// Scheduler lifecycle and ordering
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tread_core::core::{LogLevel, Node, NodeConfig, NodeInfo, NodeState};
use tread_core::error::{TreadError, TreadResult as Result};
use tread_core::{Hub, NodeInfoExt, Scheduler};

/// Records the order in which it was ticked into a shared journal
struct TestNode {
    name: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
    tick_count: usize,
    fail_init: bool,
}

impl TestNode {
    fn new(name: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            journal,
            tick_count: 0,
            fail_init: false,
        }
    }
}

impl Node for TestNode {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> Result<()> {
        if self.fail_init {
            return Err(TreadError::node(self.name, "refusing to start"));
        }
        ctx.log_info(&format!("{} initialized", self.name));
        self.journal.lock().unwrap().push(format!("init:{}", self.name));
        Ok(())
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        self.tick_count += 1;
        ctx.log_debug(&format!("{} tick #{}", self.name, self.tick_count));
        self.journal.lock().unwrap().push(format!("tick:{}", self.name));
    }

    fn shutdown(&mut self, _ctx: &mut NodeInfo) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("shutdown:{}", self.name));
        Ok(())
    }
}

/// Forwards counter values from one topic to another
struct Relay {
    input: Hub<u64>,
    output: Hub<u64>,
}

impl Node for Relay {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        while let Some(value) = self.input.recv(ctx.as_deref_mut()) {
            let _ = self.output.send(value * 2, ctx.as_deref_mut());
        }
    }
}

#[test]
fn test_nodes_tick_in_priority_order() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut scheduler = Scheduler::new().with_tick_period(Duration::ZERO);

    scheduler
        .add(Box::new(TestNode::new("estimator", journal.clone())), 10, None)
        .add(Box::new(TestNode::new("encoder", journal.clone())), 0, None);

    assert_eq!(scheduler.get_node_list(), vec!["encoder", "estimator"]);

    scheduler.tick_once();
    let entries = journal.lock().unwrap().clone();
    assert_eq!(
        entries,
        vec![
            "init:encoder",
            "init:estimator",
            "tick:encoder",
            "tick:estimator"
        ]
    );
}

#[test]
fn test_run_until_shuts_down_nodes() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut scheduler = Scheduler::new()
        .with_name("lifecycle")
        .with_tick_period(Duration::ZERO);
    scheduler.add(Box::new(TestNode::new("only", journal.clone())), 0, Some(false));

    let mut remaining = 3;
    scheduler
        .run_until(|| {
            if remaining == 0 {
                return true;
            }
            remaining -= 1;
            false
        })
        .unwrap();

    assert_eq!(scheduler.cycles(), 3);
    let info = scheduler.node_info("only").unwrap();
    assert_eq!(info.metrics().total_ticks, 3);
    assert_eq!(info.state(), &NodeState::Stopped);
    assert_eq!(journal.lock().unwrap().last().unwrap(), "shutdown:only");
}

#[test]
fn test_failed_init_is_never_ticked() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut broken = TestNode::new("broken", journal.clone());
    broken.fail_init = true;

    let mut scheduler = Scheduler::new().with_tick_period(Duration::ZERO);
    scheduler.add(Box::new(broken), 0, None);
    scheduler.tick_once();
    scheduler.tick_once();

    assert!(journal.lock().unwrap().is_empty());
    assert!(matches!(
        scheduler.node_info("broken").unwrap().state(),
        NodeState::Error(_)
    ));
}

#[test]
fn test_stop_ends_run_loop() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut scheduler = Scheduler::new();
    scheduler.add(Box::new(TestNode::new("idle", journal)), 0, None);

    scheduler.stop();
    scheduler.run_for(Duration::from_secs(5)).unwrap();
    assert_eq!(scheduler.cycles(), 0);
}

#[test]
fn test_messages_flow_between_nodes_in_one_cycle() {
    let source: Hub<u64> = Hub::new("test/scheduler/relay_in").unwrap();
    let sink: Hub<u64> = Hub::new("test/scheduler/relay_out").unwrap();

    let mut scheduler = Scheduler::new().with_tick_period(Duration::ZERO);
    scheduler.add(
        Box::new(Relay {
            input: Hub::new("test/scheduler/relay_in").unwrap(),
            output: Hub::new("test/scheduler/relay_out").unwrap(),
        }),
        0,
        Some(true),
    );

    source.send(21, None).unwrap();
    scheduler.tick_once();

    assert_eq!(sink.recv(None), Some(42));
    let info = scheduler.node_info("relay").unwrap();
    assert_eq!(info.metrics().messages_received, 1);
    assert_eq!(info.metrics().messages_sent, 1);
}

#[test]
fn test_verbose_scheduler_registers_nodes_at_debug() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut scheduler = Scheduler::new()
        .with_tick_period(Duration::ZERO)
        .with_log_level(LogLevel::Debug);
    scheduler.add(Box::new(TestNode::new("chatty", journal.clone())), 0, Some(true));

    let config = scheduler.node_info("chatty").unwrap().config();
    assert!(config.enable_logging);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_default_level_is_info_and_explicit_config_wins() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut scheduler = Scheduler::new().with_tick_period(Duration::ZERO);
    scheduler
        .add(Box::new(TestNode::new("plain", journal.clone())), 0, Some(true))
        .add_with_config(
            Box::new(TestNode::new("quiet", journal.clone())),
            1,
            NodeConfig {
                enable_logging: true,
                log_level: LogLevel::Warning,
            },
        );

    assert_eq!(
        scheduler.node_info("plain").unwrap().config().log_level,
        LogLevel::Info
    );
    assert_eq!(
        scheduler.node_info("quiet").unwrap().config().log_level,
        LogLevel::Warning
    );
}
