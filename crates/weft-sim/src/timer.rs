//! Per-module cumulative wall-clock timers.
//!
//! Each simulation module (integration, collision, strain analysis,
//! export) owns one cumulative timer in the context. Totals are
//! monotonically non-decreasing; the driver logs per-save deltas.

use std::time::Instant;

use weft_types::Module;

/// A cumulative wall-clock timer.
#[derive(Debug, Default)]
pub struct Timer {
    total: f64,
    started: Option<Instant>,
}

impl Timer {
    /// Starts (or restarts) the current measurement window.
    pub fn tick(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Ends the current window and accumulates its duration.
    ///
    /// A `tock` without a matching `tick` is a no-op.
    pub fn tock(&mut self) {
        if let Some(started) = self.started.take() {
            self.total += started.elapsed().as_secs_f64();
        }
    }

    /// Cumulative seconds measured so far.
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// The set of per-module timers, indexed by [`Module`].
#[derive(Debug, Default)]
pub struct ModuleTimers {
    timers: [Timer; Module::COUNT],
}

impl ModuleTimers {
    /// Starts timing `module`.
    pub fn tick(&mut self, module: Module) {
        self.timers[module.index()].tick();
    }

    /// Stops timing `module`, accumulating the elapsed window.
    pub fn tock(&mut self, module: Module) {
        self.timers[module.index()].tock();
    }

    /// Cumulative total for `module`.
    pub fn total(&self, module: Module) -> f64 {
        self.timers[module.index()].total()
    }

    /// Cumulative totals in [`Module::ALL`] order.
    pub fn totals(&self) -> [f64; Module::COUNT] {
        let mut out = [0.0; Module::COUNT];
        for module in Module::ALL {
            out[module.index()] = self.total(module);
        }
        out
    }
}
