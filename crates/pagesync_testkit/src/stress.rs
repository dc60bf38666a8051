//! Stress helpers for the mutation queue.
//!
//! These run many writers against one queue while a flusher thread drains
//! it, then report how the queue folded the load.

use pagesync_core::{Action, MutationQueue, QueueClass};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Actions submitted by all writers.
    pub submitted: usize,
    /// Actions the queue accepted.
    pub accepted: usize,
    /// Flushes performed.
    pub flushes: usize,
    /// Total duration.
    pub duration: Duration,
}

impl StressTestResult {
    /// Prints a summary of the run.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Submitted: {}", self.submitted);
        println!("Accepted: {}", self.accepted);
        println!("Flushes: {}", self.flushes);
        println!("Duration: {:?}", self.duration);
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Actions per writer thread.
    pub operations: usize,
    /// Number of writer threads.
    pub threads: usize,
    /// Writers pick ids from `1..=id_range`.
    pub id_range: u64,
    /// Pause between flushes.
    pub flush_every: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            id_range: 1_000,
            flush_every: Duration::from_millis(1),
        }
    }
}

/// Writers select and deselect concurrently while a flusher drains the fast
/// queue. Ends with a final flush so nothing stays pending.
pub fn stress_concurrent_toggles(queue: Arc<MutationQueue>, config: &StressConfig) -> StressTestResult {
    let accepted = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));
    let start = Instant::now();

    let flusher = {
        let queue = Arc::clone(&queue);
        let done = Arc::clone(&done);
        let pause = config.flush_every;
        thread::spawn(move || {
            let mut flushes = 0usize;
            while !done.load(Ordering::Acquire) {
                queue.flush(QueueClass::Fast);
                flushes += 1;
                thread::sleep(pause);
            }
            flushes
        })
    };

    let writers: Vec<_> = (0..config.threads)
        .map(|t| {
            let queue = Arc::clone(&queue);
            let accepted = Arc::clone(&accepted);
            let operations = config.operations;
            let id_range = config.id_range.max(1);
            thread::spawn(move || {
                for i in 0..operations {
                    let id = ((t * operations + i) as u64 % id_range) + 1;
                    let action = if i % 2 == 0 {
                        Action::select(id)
                    } else {
                        Action::deselect(id)
                    };
                    if queue.enqueue(action).is_accepted() {
                        accepted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("Writer thread panicked");
    }
    done.store(true, Ordering::Release);
    let flushes = flusher.join().expect("Flusher thread panicked");
    queue.flush(QueueClass::Fast);

    StressTestResult {
        submitted: config.operations * config.threads,
        accepted: accepted.load(Ordering::Relaxed),
        flushes,
        duration: start.elapsed(),
    }
}
