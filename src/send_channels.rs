use crossbeam_channel::{Receiver, Sender};
use crate::common::{BvrBox, BvrImage, Fingerprint};
use crate::error::BvrError;

/// Work accepted by a [`crate::workers::WorkerPool`].
#[derive(Debug)]
pub enum JobKind {
    Hash(BvrImage),
    PostProcess(Vec<BvrBox>),
}

#[derive(Debug)]
pub struct Job {
    pub id: u64,
    pub kind: JobKind,
}

impl Job {
    pub fn hash(id: u64, image: impl Into<BvrImage>) -> Self {
        Self { id, kind: JobKind::Hash(image.into()) }
    }

    pub fn postprocess(id: u64, boxes: Vec<BvrBox>) -> Self {
        Self { id, kind: JobKind::PostProcess(boxes) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Fingerprint(Fingerprint),
    Boxes(Vec<BvrBox>),
}

#[derive(Debug)]
pub struct JobResult {
    pub id: u64,
    pub output: Result<JobOutput, BvrError>,
}

/// Worker side of the queue.
#[derive(Debug, Clone)]
pub struct WorkerState {
    pub job_rx: Receiver<Box<Job>>,
    pub result_tx: Sender<Box<JobResult>>,
}

/// Caller side of the queue.
#[derive(Debug)]
pub struct SendState {
    pub job_tx: Sender<Box<Job>>,
    pub result_rx: Receiver<Box<JobResult>>,
}

/// Unbounded job and result channels, wired up.
pub fn job_channels() -> (SendState, WorkerState) {
    let (job_tx, job_rx) = crossbeam_channel::unbounded();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    (SendState { job_tx, result_rx }, WorkerState { job_rx, result_tx })
}
