//! Logging helpers on `Option<&mut NodeInfo>`
//!
//! Nodes receive their context as an option (tests and benchmarks pass
//! `None`), so these let them write `ctx.log_info("...")` directly.

use super::NodeInfo;

pub trait NodeInfoExt {
    fn log_debug(&mut self, message: &str);

    /// Like `log_debug`, but the message is only built when a context exists
    fn log_debug_with<F: FnOnce() -> String>(&mut self, message: F);

    fn log_info(&mut self, message: &str);

    fn log_warning(&mut self, message: &str);

    fn log_error(&mut self, message: &str);
}

impl NodeInfoExt for Option<&mut NodeInfo> {
    #[inline]
    fn log_debug(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_debug(message);
        }
    }

    #[inline]
    fn log_debug_with<F: FnOnce() -> String>(&mut self, message: F) {
        if let Some(ctx) = self {
            ctx.log_debug(&message());
        }
    }

    #[inline]
    fn log_info(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_info(message);
        }
    }

    #[inline]
    fn log_warning(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_warning(message);
        }
    }

    #[inline]
    fn log_error(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_error(message);
        }
    }
}
