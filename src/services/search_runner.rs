use crate::data::{AssetCatalog, SearchRequest};
use crate::engines::generation::evolution_engine::{EvolutionConfig, EvolutionEngine, SearchOutcome};
use crate::engines::generation::progress::{ChannelProgressCallback, ProgressMessage};
use crate::error::{RebalanceError, Result};
use log::{error, info};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "sharebalance-search";

/// Runs one search on a dedicated thread and streams its progress back.
pub struct SearchRunner {
    handle: Option<JoinHandle<Result<SearchOutcome>>>,
    progress_rx: Receiver<ProgressMessage>,
    cancel_flag: Arc<Mutex<bool>>,
    catalog: AssetCatalog,
}

impl SearchRunner {
    /// Validate `request` and start the search in a background thread.
    ///
    /// Invalid requests are rejected here, before any thread is spawned.
    pub fn start(request: SearchRequest) -> Result<Self> {
        request.validate()?;
        let catalog = request.catalog()?;

        let (progress_tx, progress_rx) = channel();
        let cancel_flag = Arc::new(Mutex::new(false));
        let callback = ChannelProgressCallback::with_cancel_flag(progress_tx, Arc::clone(&cancel_flag));

        let engine_config = EvolutionConfig {
            population_size: request.population_size,
            stop_after_generations_without_improvement: request
                .stop_after_generations_without_improvement,
            seed: request.seed,
        };
        let mut engine = EvolutionEngine::new(engine_config, catalog.clone(), request.investment_limit)?;

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                info!(
                    "Search thread started: population {}, investment limit {}",
                    request.population_size, request.investment_limit
                );
                let result = engine.run(callback);
                if let Err(e) = &result {
                    error!("Search ended without a result: {}", e);
                }
                result
            })?;

        Ok(Self {
            handle: Some(handle),
            progress_rx,
            cancel_flag,
            catalog,
        })
    }

    /// Catalog the search runs against, for rendering its messages.
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Next progress message if one is waiting (non-blocking).
    pub fn poll_progress(&self) -> Option<ProgressMessage> {
        self.progress_rx.try_recv().ok()
    }

    /// Block until the next progress message; `None` once the search has ended
    /// and every message was received.
    pub fn wait_progress(&self) -> Option<ProgressMessage> {
        self.progress_rx.recv().ok()
    }

    /// Result of the search if the thread has finished, without blocking.
    pub fn try_get_result(&mut self) -> Option<Result<SearchOutcome>> {
        match self.handle.take() {
            Some(handle) if handle.is_finished() => Some(Self::join_handle(handle)),
            Some(handle) => {
                self.handle = Some(handle);
                None
            }
            None => None,
        }
    }

    /// Block until the search thread finishes.
    pub fn join(mut self) -> Result<SearchOutcome> {
        match self.handle.take() {
            Some(handle) => Self::join_handle(handle),
            None => Err(RebalanceError::Worker(
                "Search result was already taken".to_string(),
            )),
        }
    }

    /// Ask the search to stop at the next generation boundary.
    pub fn cancel(&self) {
        if let Ok(mut flag) = self.cancel_flag.lock() {
            *flag = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn join_handle(handle: JoinHandle<Result<SearchOutcome>>) -> Result<SearchOutcome> {
        handle
            .join()
            .unwrap_or_else(|_| Err(RebalanceError::Worker("Search thread panicked".to_string())))
    }
}

impl Drop for SearchRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
