//! Async front end that serializes every call onto one worker thread.
//!
//! The worker owns the [`GeoPdfCore`]. Jobs arrive over a bounded channel and
//! answer through a oneshot. A panic inside an operation is caught on the
//! worker and answered as an `ERROR` envelope; the worker keeps serving.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread::JoinHandle;

use geopdf_common::{
    DriverInfo, DriverList, ErrorCode, GeoPdfError, GeoPdfInfo, GeoPdfResult, RenderResult,
    ResponseEnvelope, VersionInfo,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use crate::backend::{default_library, default_rasterizer};
use crate::config::ServiceConfig;
use crate::operations::GeoPdfCore;

type Job = Box<dyn FnOnce(&GeoPdfCore) + Send>;

const WORKER_THREAD_NAME: &str = "geopdf-core";

pub struct GeoPdfService {
    jobs: mpsc::Sender<Job>,
    _worker: JoinHandle<()>,
}

impl GeoPdfService {
    /// Start a service over the backends this build was compiled with.
    pub fn start(config: ServiceConfig) -> GeoPdfResult<Self> {
        config
            .validate()
            .map_err(|e| GeoPdfError::InternalError(e.to_string()))?;
        let queue_depth = config.queue_depth;
        Self::spawn(queue_depth, move || {
            let library = default_library();
            let rasterizer = default_rasterizer(&config);
            GeoPdfCore::new(library, rasterizer, config)
        })
    }

    /// Start a service whose core is built on the worker thread by `factory`.
    pub fn spawn<F>(queue_depth: usize, factory: F) -> GeoPdfResult<Self>
    where
        F: FnOnce() -> GeoPdfCore + Send + 'static,
    {
        let (jobs, mut rx) = mpsc::channel::<Job>(queue_depth.max(1));

        let worker = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let core = factory();
                info!("GeoPDF worker started");
                while let Some(job) = rx.blocking_recv() {
                    job(&core);
                }
                info!("GeoPDF worker stopped");
            })?;

        Ok(Self {
            jobs,
            _worker: worker,
        })
    }

    /// Run `op` on the worker and wait for its envelope.
    async fn call<T, F>(&self, op: F) -> ResponseEnvelope<T>
    where
        T: Send + 'static,
        F: FnOnce(&GeoPdfCore) -> ResponseEnvelope<T> + Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |core| {
            let envelope = catch_unwind(AssertUnwindSafe(|| op(core))).unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(panic = %message, "GeoPDF operation panicked");
                ResponseEnvelope::failure(ErrorCode::Error, format!("Operation panicked: {}", message))
            });
            // The caller may have gone away; nothing to report then.
            let _ = reply.send(envelope);
        });

        if self.jobs.send(job).await.is_err() {
            return ResponseEnvelope::failure(ErrorCode::Error, "GeoPDF worker is not running");
        }

        response.await.unwrap_or_else(|_| {
            ResponseEnvelope::failure(ErrorCode::Error, "GeoPDF worker dropped the request")
        })
    }

    pub async fn get_version_info(&self) -> ResponseEnvelope<VersionInfo> {
        self.call(|core| core.version_info()).await
    }

    pub async fn list_drivers(&self) -> ResponseEnvelope<DriverList> {
        self.call(|core| core.list_drivers()).await
    }

    pub async fn find_driver(&self, short_name: impl Into<String>) -> ResponseEnvelope<DriverInfo> {
        let short_name = short_name.into();
        self.call(move |core| core.find_driver(&short_name)).await
    }

    pub async fn read_geopdf(&self, path: impl Into<PathBuf>) -> ResponseEnvelope<GeoPdfInfo> {
        let path = path.into();
        self.call(move |core| core.read_geopdf(&path)).await
    }

    pub async fn render_geopdf_to_png(
        &self,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> ResponseEnvelope<RenderResult> {
        let (input, output) = (input.into(), output.into());
        self.call(move |core| core.render(&input, &output)).await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
