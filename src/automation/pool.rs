//! Fixed-size worker pool.
//!
//! Jobs go through one shared mpsc queue drained by `size` threads. Each
//! submission gets its own result channel (`Task`); `map_completed` funnels a
//! batch of jobs into a single channel so results arrive in the order the jobs
//! finish, not the order they were submitted.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

/// Handle to one submitted job.
pub struct Task<T> {
    receiver: Receiver<Result<T>>,
}

impl<T> Task<T> {
    /// Blocks until the job has finished.
    pub fn wait(self) -> Result<T> {
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(Error::Worker("worker dropped the task".into())))
    }
}

/// Results of a batch, yielded as each job completes.
pub struct Completed<T> {
    receiver: Receiver<Result<T>>,
    remaining: usize,
}

impl<T> Iterator for Completed<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(
            self.receiver
                .recv()
                .unwrap_or_else(|_| Err(Error::Worker("worker dropped the task".into()))),
        )
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Runs `f`, turning a panic into `Error::Worker`.
fn run_caught<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(Error::Worker(panic_message(payload))))
}

impl WorkerPool {
    /// Spawns `size` worker threads (at least one).
    pub fn new(name: &str, size: usize) -> Self {
        let (sender, receiver) = channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size.max(1))
            .map(|i| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("{}-{}", name, i))
                    .spawn(move || {
                        loop {
                            let job = match receiver.lock() {
                                Ok(rx) => rx.recv(),
                                Err(_) => break,
                            };
                            match job {
                                Ok(job) => job(),
                                // Channel closed, pool was dropped
                                Err(_) => break,
                            }
                        }
                    })
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    crate::log(&format!("Failed to spawn worker thread: {}", e));
                    None
                }
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    fn enqueue(&self, job: Job) -> Result<()> {
        if self.workers.is_empty() {
            return Err(Error::Worker("pool has no worker threads".into()));
        }
        self.sender
            .as_ref()
            .ok_or_else(|| Error::Worker("pool is shut down".into()))?
            .send(job)
            .map_err(|_| Error::Worker("pool queue closed".into()))
    }

    /// Queues `f` and returns a handle to its result.
    pub fn submit<T, F>(&self, f: F) -> Result<Task<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = channel();
        self.enqueue(Box::new(move || {
            let _ = tx.send(run_caught(f));
        }))?;
        Ok(Task { receiver: rx })
    }

    /// Runs `f` over every item and yields results in completion order.
    pub fn map_completed<I, T, F>(&self, items: I, f: F) -> Result<Completed<T>>
    where
        I: IntoIterator,
        I::Item: Send + 'static,
        T: Send + 'static,
        F: Fn(I::Item) -> Result<T> + Send + Sync + 'static,
    {
        let (tx, rx) = channel();
        let f = Arc::new(f);
        let mut remaining = 0;

        for item in items {
            let tx = tx.clone();
            let f = Arc::clone(&f);
            self.enqueue(Box::new(move || {
                let _ = tx.send(run_caught(|| f(item)));
            }))?;
            remaining += 1;
        }

        Ok(Completed {
            receiver: rx,
            remaining,
        })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets every worker fall out of its loop
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.join() {
                crate::log(&format!("Worker thread panicked: {}", panic_message(e)));
            }
        }
    }
}
