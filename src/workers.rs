//! Fixed-size pool of OS threads that hash images and post-process box sets.
//!
//! Jobs go in through [`WorkerPool::submit`] and come back, tagged with the caller's
//! id, through [`WorkerPool::recv`]. Completion order is not submission order.

use std::thread::{self, JoinHandle};
use std::time::Duration;
use anyhow::anyhow;
use crossbeam_channel::{Receiver, Sender};
use crate::common::PostProcessConfig;
use crate::detection_processing::PostProcessor;
use crate::error::BvrError;
use crate::hashing::PerceptualHasher;
use crate::send_channels::{job_channels, Job, JobKind, JobOutput, JobResult, WorkerState};

pub struct WorkerPool {
    job_tx: Option<Sender<Box<Job>>>,
    result_rx: Receiver<Box<JobResult>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `workers` threads (at least one) sharing `config` for post-processing jobs.
    pub fn new(workers: usize, config: PostProcessConfig) -> anyhow::Result<Self> {
        let (send_state, worker_state) = job_channels();
        let workers = workers.max(1);

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let state = worker_state.clone();
            let processor = PostProcessor::new(config.clone());
            let handle = thread::Builder::new()
                .name(format!("bvr-worker-{i}"))
                .spawn(move || worker_loop(i, state, processor))?;
            handles.push(handle);
        }
        log::info!("Started {} bvr workers", workers);

        Ok(Self {
            job_tx: Some(send_state.job_tx),
            result_rx: send_state.result_rx,
            handles,
        })
    }

    pub fn workers(&self) -> usize {
        self.handles.len()
    }

    pub fn submit(&self, job: Job) -> anyhow::Result<()> {
        let tx = self.job_tx.as_ref().ok_or_else(|| anyhow!("Worker pool is shut down"))?;
        tx.send(Box::new(job)).map_err(|e| anyhow!("Job {} rejected: workers are gone", e.0.id))
    }

    /// Blocks until a result arrives. `None` once every worker has exited.
    pub fn recv(&self) -> Option<JobResult> {
        self.result_rx.recv().ok().map(|r| *r)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<JobResult> {
        self.result_rx.recv_timeout(timeout).ok().map(|r| *r)
    }

    pub fn try_recv(&self) -> Option<JobResult> {
        self.result_rx.try_recv().ok().map(|r| *r)
    }

    /// Closes the queue, lets the workers finish what was already submitted, and
    /// returns every result not yet received.
    pub fn shutdown(mut self) -> Vec<JobResult> {
        self.close();
        self.result_rx.try_iter().map(|r| *r).collect()
    }

    fn close(&mut self) {
        if self.job_tx.take().is_some() {
            log::debug!("Closing job queue, joining {} workers", self.handles.len());
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                log::warn!("A bvr worker panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop(worker: usize, state: WorkerState, processor: PostProcessor) {
    let hasher = PerceptualHasher::new();

    for job in state.job_rx.iter() {
        let Job { id, kind } = *job;
        let output: Result<JobOutput, BvrError> = match kind {
            JobKind::Hash(image) => hasher
                .hash_bvr_image(&image)
                .map(JobOutput::Fingerprint)
                .map_err(Into::into),
            JobKind::PostProcess(boxes) => Ok(JobOutput::Boxes(processor.process(&boxes))),
        };
        if let Err(err) = &output {
            log::warn!("Worker {worker}: job {id} failed: {err}");
        }
        if state.result_tx.send(Box::new(JobResult { id, output })).is_err() {
            log::debug!("Worker {worker}: result receiver dropped, exiting");
            break;
        }
    }
    log::trace!("Worker {worker} exited");
}
