use super::evolution_engine::{ProgressCallback, SearchOutcome};
use crate::types::Individual;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// One event of a running search. Generation events arrive in increasing
/// generation order and `Finished` is always the last message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    Generation { generation: usize, best: Individual },
    Finished(SearchOutcome),
}

impl ProgressMessage {
    pub fn generation(&self) -> usize {
        match self {
            ProgressMessage::Generation { generation, .. } => *generation,
            ProgressMessage::Finished(outcome) => outcome.generation,
        }
    }

    pub fn best(&self) -> &Individual {
        match self {
            ProgressMessage::Generation { best, .. } => best,
            ProgressMessage::Finished(outcome) => &outcome.best,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ProgressMessage::Finished(_))
    }
}

// For communication with the thread that started the search
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
    cancel_flag: Option<Arc<Mutex<bool>>>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self {
            sender,
            cancel_flag: None,
        }
    }

    pub fn with_cancel_flag(sender: Sender<ProgressMessage>, cancel_flag: Arc<Mutex<bool>>) -> Self {
        Self {
            sender,
            cancel_flag: Some(cancel_flag),
        }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_complete(&mut self, generation: usize, best: &Individual) {
        let _ = self.sender.send(ProgressMessage::Generation {
            generation,
            best: best.clone(),
        });
    }

    fn on_search_complete(&mut self, outcome: &SearchOutcome) {
        let _ = self.sender.send(ProgressMessage::Finished(outcome.clone()));
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .map(|flag| flag.lock().map(|f| *f).unwrap_or(false))
            .unwrap_or(false)
    }
}
