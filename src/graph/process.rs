//! Process-pooled graph inversion
//!
//! Workers are child processes that share no memory with the coordinator.
//! The coordinator splits the link map into at most `max_workers` batches,
//! sends each batch to a worker as JSON on stdin, and reads back one partial
//! map per entry from the worker's stdout. All merging happens here, in the
//! coordinating process.
//!
//! The worker side is [`run_worker`], wired to the hidden `invert-worker`
//! subcommand of the `wiki-ranker` binary.

use crate::graph::merge::{into_inverted, invert_entry, merge_partial, PartialMap};
use crate::graph::{InvertError, InvertedMap, Inverter, LinkMap};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Subcommand that turns the binary into an inversion worker
pub const WORKER_SUBCOMMAND: &str = "invert-worker";

/// A batch of link-map entries sent to one worker
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub entries: Vec<(String, Vec<String>)>,
}

/// A worker's answer: one partial map per request entry, in request order
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub partials: Vec<PartialMap>,
}

/// Inverts the link map on a pool of worker processes
#[derive(Debug, Clone)]
pub struct ProcessInverter {
    program: PathBuf,
    args: Vec<OsString>,
    max_workers: usize,
}

impl ProcessInverter {
    /// Creates an inverter that launches `program` for every batch
    pub fn new(program: impl Into<PathBuf>, max_workers: usize) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            max_workers: max_workers.max(1),
        }
    }

    /// Creates an inverter whose workers are the running executable
    pub fn from_current_exe(max_workers: usize) -> Result<Self, InvertError> {
        let program = std::env::current_exe()?;
        Ok(Self::new(program, max_workers).arg(WORKER_SUBCOMMAND))
    }

    /// Adds an argument passed to every worker
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Runs one worker process over one batch
    fn run_batch(&self, index: usize, request: &WorkerRequest) -> Result<WorkerResponse, InvertError> {
        let payload = serde_json::to_vec(request)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        tracing::debug!(
            "Worker {} (pid {}) inverting {} entries",
            index,
            child.id(),
            request.entries.len()
        );

        // Dropping stdin closes the pipe so the worker sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };

        // Reap the child before reporting a broken pipe
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(InvertError::Worker(format!(
                "worker {} exited with {}",
                index, output.status
            )));
        }
        written?;

        let response: WorkerResponse = serde_json::from_slice(&output.stdout)?;
        if response.partials.len() != request.entries.len() {
            return Err(InvertError::Worker(format!(
                "worker {} returned {} partials for {} entries",
                index,
                response.partials.len(),
                request.entries.len()
            )));
        }

        Ok(response)
    }
}

impl Inverter for ProcessInverter {
    fn name(&self) -> &'static str {
        "process"
    }

    fn invert(&self, links: &LinkMap) -> Result<InvertedMap, InvertError> {
        if links.is_empty() {
            return Ok(InvertedMap::new());
        }

        let entries: Vec<(String, Vec<String>)> = links
            .iter()
            .map(|(source, targets)| (source.clone(), targets.clone()))
            .collect();
        let batch_size = entries.len().div_ceil(self.max_workers);
        let requests: Vec<WorkerRequest> = entries
            .chunks(batch_size)
            .map(|chunk| WorkerRequest {
                entries: chunk.to_vec(),
            })
            .collect();

        tracing::debug!(
            "Dispatching {} entries to {} worker processes",
            entries.len(),
            requests.len()
        );

        let responses: Vec<Result<WorkerResponse, InvertError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .enumerate()
                .map(|(index, request)| scope.spawn(move || self.run_batch(index, request)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(InvertError::Worker(
                            "worker supervisor thread panicked".to_string(),
                        ))
                    })
                })
                .collect()
        });

        let mut merged = PartialMap::new();
        for response in responses {
            for partial in response?.partials {
                merge_partial(&mut merged, partial)?;
            }
        }

        Ok(into_inverted(merged)?)
    }
}

/// Worker entry point: reads a [`WorkerRequest`], writes a [`WorkerResponse`]
///
/// Nothing but the response may be written to `writer`.
pub fn run_worker<R: Read, W: Write>(reader: R, mut writer: W) -> Result<(), InvertError> {
    let request: WorkerRequest = serde_json::from_reader(reader)?;

    let partials = request
        .entries
        .iter()
        .map(|(source, targets)| invert_entry(source, targets))
        .collect();

    serde_json::to_writer(&mut writer, &WorkerResponse { partials })?;
    writer.flush()?;
    Ok(())
}
