//! Optional progress reporting for the long per-node stages.
//!
//! Progress is an observer: it never changes what the converter produces,
//! it only emits `info` events through `tracing`.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct Progress
{
    enabled: bool,
    interval: usize,
}

impl Progress
{
    pub fn new(enabled: bool, interval: usize) -> Self
    {
        Self {
            enabled,
            interval: std::cmp::max(interval, 1),
        }
    }

    pub fn disabled() -> Self
    {
        Self::new(false, DEFAULT_PROGRESS_INTERVAL)
    }

    pub fn is_enabled(&self) -> bool
    {
        self.enabled
    }

    /// Starts tracking a stage of `total` items.
    pub fn stage(&self, name: &'static str, total: usize) -> Stage
    {
        Stage {
            name,
            total,
            interval: self.interval,
            enabled: self.enabled,
            done: AtomicUsize::new(0),
        }
    }
}

impl Default for Progress
{
    fn default() -> Self
    {
        Self::disabled()
    }
}

/// Counter for one stage. Shared by reference between rayon workers.
#[derive(Debug)]
pub struct Stage
{
    name: &'static str,
    total: usize,
    interval: usize,
    enabled: bool,
    done: AtomicUsize,
}

impl Stage
{
    pub fn advance(&self, n: usize)
    {
        if !self.enabled || n == 0 {
            return;
        }
        let before = self.done.fetch_add(n, Ordering::Relaxed);
        let after = before + n;
        if before / self.interval != after / self.interval && after < self.total {
            self.report(after);
        }
    }

    pub fn done(&self) -> usize
    {
        self.done.load(Ordering::Relaxed)
    }

    pub fn finish(self)
    {
        if self.enabled {
            self.report(self.total);
        }
    }

    fn report(&self, done: usize)
    {
        let percent = if self.total == 0 {
            100.0
        }
        else {
            done as f64 / self.total as f64 * 100.0
        };
        info!(
            "{} progress: {}/{} ({:.1}%)",
            self.name, done, self.total, percent
        );
    }
}
