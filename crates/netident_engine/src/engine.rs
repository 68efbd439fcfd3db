use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::mpsc as async_mpsc;

use crate::{
    identify, resolve_address, resolve_location, resolve_provider, DeviceSource, EngineConfig,
    EngineEvent, FetchError, Fetcher, IpFamily, ReqwestFetcher,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupJob {
    Ipv4,
    Ipv6,
    Geolocation,
    Provider,
    Device,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("engine stopped; lookup {0:?} not launched")]
    Stopped(LookupJob),
}

struct JobContext {
    fetcher: Arc<dyn Fetcher>,
    config: EngineConfig,
    sources: Vec<Box<dyn DeviceSource>>,
}

/// Runs lookup jobs on a background thread with one cooperative executor.
///
/// Every enqueued job becomes its own task; tasks are not ordered relative to
/// each other and each reports exactly one [`EngineEvent`].
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<LookupJob>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone())?);
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, EngineError> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel::<LookupJob>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let sources = config.device.build_sources();
        let context = Arc::new(JobContext {
            fetcher,
            config,
            sources,
        });

        thread::spawn(move || {
            runtime.block_on(async move {
                while let Some(job) = cmd_rx.recv().await {
                    let context = context.clone();
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        let event = run_job(&context, job).await;
                        engine_debug!("Job {:?} settled", job);
                        let _ = event_tx.send(event);
                    });
                }
            });
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Fails when the runtime thread is gone; the job will never report.
    pub fn enqueue(&self, job: LookupJob) -> Result<(), EngineError> {
        engine_info!("Launching lookup {:?}", job);
        self.cmd_tx.send(job).map_err(|_| {
            engine_warn!("Engine runtime stopped; dropping lookup {:?}", job);
            EngineError::Stopped(job)
        })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_job(context: &JobContext, job: LookupJob) -> EngineEvent {
    let fetcher = context.fetcher.as_ref();
    let endpoints = &context.config.endpoints;
    match job {
        LookupJob::Ipv4 => EngineEvent::AddressResolved {
            family: IpFamily::V4,
            result: resolve_address(fetcher, &endpoints.ipv4, IpFamily::V4).await,
        },
        LookupJob::Ipv6 => EngineEvent::AddressResolved {
            family: IpFamily::V6,
            result: resolve_address(fetcher, &endpoints.ipv6, IpFamily::V6).await,
        },
        LookupJob::Geolocation => {
            EngineEvent::LocationResolved(resolve_location(fetcher, &endpoints.geolocation).await)
        }
        LookupJob::Provider => EngineEvent::ProviderResolved(
            resolve_provider(fetcher, &endpoints.hostname, &context.config.provider_rules).await,
        ),
        LookupJob::Device => EngineEvent::DeviceIdentified(identify(&context.sources).await),
    }
}
