//! Accelerator capability of the kernels.
//!
//! A kernel can execute on a device only when it was built with a
//! `DeviceBackend`. Work is submitted to a `Stream`, a FIFO queue owned by
//! the caller: asynchronous entry points return as soon as the job is queued,
//! and `Stream::synchronize` waits for everything queued before it.
//!
//! `HostDevice` is the reference backend: device memory is host memory and
//! each stream is served by one worker thread.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use crate::error::{Result, XCError};

/// A unit of device work.
pub type DeviceJob = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Execution backend of the device entry points.
pub trait DeviceBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn create_stream(&self) -> Result<Stream> {
        Stream::new()
    }

    /// Queues `job` on `stream` without waiting for it.
    fn launch(&self, stream: &Stream, job: DeviceJob) -> Result<()>;
}

/// Reference backend running device jobs on the stream's worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDevice;

impl DeviceBackend for HostDevice {
    fn name(&self) -> &str {
        "host"
    }

    fn launch(&self, stream: &Stream, job: DeviceJob) -> Result<()> {
        trace!(stream = stream.id(), "launch device job");

        stream.enqueue(job)
    }
}

/// Device-resident `f64` buffer. Clones share the same memory.
#[derive(Debug, Clone, Default)]
pub struct DeviceBuffer {
    data: Arc<RwLock<Vec<f64>>>,
}

impl DeviceBuffer {
    pub fn zeros(n: usize) -> Self {
        DeviceBuffer {
            data: Arc::new(RwLock::new(vec![0.0; n])),
        }
    }

    pub fn from_host(src: &[f64]) -> Self {
        DeviceBuffer {
            data: Arc::new(RwLock::new(src.to_vec())),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the buffer back to the host.
    pub fn to_host(&self) -> Vec<f64> {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replaces the buffer contents with `src`.
    pub fn copy_from_host(&self, src: &[f64]) {
        self.store(src.to_vec());
    }

    pub fn ptr_eq(&self, other: &DeviceBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn store(&self, v: Vec<f64>) {
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = v;
    }
}

enum Command {
    Run(DeviceJob),
    Fence(Sender<Option<XCError>>),
}

static NEXT_STREAM_ID: AtomicUsize = AtomicUsize::new(0);

/// In-order execution queue.
///
/// Jobs run one at a time in submission order. The first error raised by a
/// job is kept and reported by the next `synchronize`; later jobs still run.
/// There is no cancellation: dropping the stream waits for queued jobs.
pub struct Stream {
    id: usize,
    sender: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").field("id", &self.id).finish()
    }
}

impl Stream {
    pub fn new() -> Result<Stream> {
        let id = NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed);

        let (sender, receiver) = mpsc::channel();

        let worker = thread::Builder::new()
            .name(format!("xc-stream-{}", id))
            .spawn(move || run_stream(receiver))
            .map_err(|e| XCError::Device(format!("cannot start stream {}: {}", id, e)))?;

        debug!(stream = id, "created device stream");

        Ok(Stream {
            id,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Appends `job` to the queue and returns immediately.
    pub fn enqueue(&self, job: DeviceJob) -> Result<()> {
        self.send(Command::Run(job))
    }

    /// Blocks until every job queued so far has finished.
    pub fn synchronize(&self) -> Result<()> {
        let (tx, rx) = mpsc::channel();

        self.send(Command::Fence(tx))?;

        match rx.recv() {
            Ok(None) => Ok(()),
            Ok(Some(err)) => Err(err),
            Err(_) => Err(self.terminated()),
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or_else(|| self.terminated())?
            .send(command)
            .map_err(|_| self.terminated())
    }

    fn terminated(&self) -> XCError {
        XCError::Device(format!("stream {} is no longer running", self.id))
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        drop(self.sender.take());

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_stream(receiver: Receiver<Command>) {
    let mut first_error: Option<XCError> = None;

    for command in receiver {
        match command {
            Command::Run(job) => {
                let result = catch_unwind(AssertUnwindSafe(job))
                    .unwrap_or_else(|_| Err(XCError::Device("device job panicked".to_string())));

                if let Err(err) = result {
                    first_error.get_or_insert(err);
                }
            }

            Command::Fence(reply) => {
                let _ = reply.send(first_error.take());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_stream_runs_jobs_in_order() {
        let stream = Stream::new().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..32 {
            let log = Arc::clone(&log);
            stream
                .enqueue(Box::new(move || {
                    log.lock().unwrap().push(i);
                    Ok(())
                }))
                .unwrap();
        }

        stream.synchronize().unwrap();

        assert_eq!(*log.lock().unwrap(), (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_stream_reports_first_error_once() {
        let stream = Stream::new().unwrap();

        stream
            .enqueue(Box::new(|| Err(XCError::Device("first".to_string()))))
            .unwrap();
        stream
            .enqueue(Box::new(|| Err(XCError::Device("second".to_string()))))
            .unwrap();

        assert_eq!(
            stream.synchronize(),
            Err(XCError::Device("first".to_string()))
        );
        assert_eq!(stream.synchronize(), Ok(()));
    }

    #[test]
    fn test_stream_survives_panicking_job() {
        let stream = Stream::new().unwrap();

        stream.enqueue(Box::new(|| panic!("boom"))).unwrap();

        assert!(matches!(stream.synchronize(), Err(XCError::Device(_))));

        stream.enqueue(Box::new(|| Ok(()))).unwrap();
        assert_eq!(stream.synchronize(), Ok(()));
    }

    #[test]
    fn test_device_buffer_shares_memory() {
        let a = DeviceBuffer::zeros(3);
        let b = a.clone();

        b.copy_from_host(&[1.0, 2.0, 3.0]);

        assert!(a.ptr_eq(&b));
        assert_eq!(a.to_host(), vec![1.0, 2.0, 3.0]);
        assert!(!a.ptr_eq(&DeviceBuffer::from_host(&[1.0, 2.0, 3.0])));
    }
}
