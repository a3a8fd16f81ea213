//! 625 microsecond tick source
//!
//! DTM timing runs off a free-running hardware counter that raises a tick
//! every 625 microseconds, the BLE baseband timing unit. The interpreter
//! uses it both to pace test sequences and to hand the caller a monotonic
//! elapsed-tick counter.

/// Length of one timing tick in microseconds.
pub const TICK_INTERVAL_US: u32 = 625;

/// Number of selectable hardware timers (indices 0..=2).
pub const TIMER_COUNT: u8 = 3;

/// A hardware timer producing the 625 us DTM tick.
pub trait TickSource {
    /// Start the tick counter.
    fn start(&mut self);

    /// Stop the tick counter. Must tolerate being called while stopped.
    fn stop(&mut self);

    /// Current value of the free-running tick counter.
    fn elapsed_ticks(&self) -> u32;

    /// Suspend the calling context until the next tick boundary or an
    /// asynchronous radio event, then return the tick counter. On target
    /// this is the low-power wait; it never terminates by itself and the
    /// caller invokes it in a loop.
    fn wait_for_event(&mut self) -> u32;

    /// Switch to hardware timer `index`. Called only while no test is
    /// running, with `index` already validated against [`TIMER_COUNT`].
    fn select_timer(&mut self, index: u8);
}
