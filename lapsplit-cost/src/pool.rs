//! Worker Pool
//!
//! Fixed-size fork-join pool: `run_and_join` starts one named thread per
//! worker, hands each its worker index, and blocks until every worker has
//! returned. There is no queue, priority or cancellation; workers coordinate
//! among themselves (the cost builder uses a shared atomic row counter).

use crate::error::{Error, Result};
use lapsplit_common::SplittingSettings;
use std::any::Any;
use std::thread;
use tracing::debug;

/// Fixed-size fork-join worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Pool with `size` workers (at least one)
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// Single-worker pool
    pub fn single() -> Self {
        Self::new(1)
    }

    /// Pool sized to the available CPUs
    pub fn available() -> Self {
        Self::new(num_cpus::get())
    }

    /// Pool sized from splitting settings
    ///
    /// One worker when multithreading is disabled, otherwise the explicit
    /// `worker_threads` count or the number of available CPUs.
    pub fn from_settings(settings: &SplittingSettings) -> Self {
        if !settings.use_multithreading {
            return Self::single();
        }
        match settings.worker_threads {
            Some(n) => Self::new(n),
            None => Self::available(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `job` once per worker concurrently and wait for all of them
    ///
    /// Threads are named `"<name> <k>/<n>"`. Results come back in worker
    /// order. The first worker error (in worker order) is returned after all
    /// workers have been joined; a panicking worker becomes
    /// [`Error::WorkerPanicked`].
    pub fn run_and_join<T, F>(&self, name: &str, job: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync,
    {
        let size = self.size;
        debug!("Starting {} worker(s) for {}", size, name);

        thread::scope(|scope| -> Result<Vec<T>> {
            let job = &job;
            let mut handles = Vec::with_capacity(size);
            for worker_id in 0..size {
                let handle = thread::Builder::new()
                    .name(format!("{} {}/{}", name, worker_id + 1, size))
                    .spawn_scoped(scope, move || job(worker_id))?;
                handles.push(handle);
            }

            let mut results = Vec::with_capacity(size);
            let mut first_error = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(value)) => results.push(value),
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(payload) => {
                        first_error.get_or_insert(Error::WorkerPanicked(panic_message(&*payload)));
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(results),
            }
        })
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::available()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
