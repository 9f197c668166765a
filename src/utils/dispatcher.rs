//! Fan-out of one prompt to every selected model.
//!
//! The user message is appended before any request goes out. Each model call
//! then runs on its own and appends its answer (or an error message) to the
//! thread's current contents under the store lock, so concurrent completions
//! never overwrite one another. `send` returns once every call has settled.

use super::catalog::Model;
use super::error::SendError;
use super::provider::{ProviderOutcome, ProviderRouter};
use super::selection::Selection;
use super::settings::ApiKeys;
use super::threads::SharedThreads;
use super::types::{ImageAttachment, Message};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    ThreadUpdated(String),
    PendingChanged(Vec<String>),
}

/// Summary of one settled turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnReport {
    pub thread_id: String,
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Answers discarded because their thread was deleted meanwhile
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settled {
    Succeeded,
    Failed,
    Dropped,
}

#[derive(Clone)]
pub struct Dispatcher {
    router: ProviderRouter,
    threads: SharedThreads,
    // One entry per in-flight call; a model may appear twice across turns
    pending: Arc<Mutex<Vec<String>>>,
    events: Option<mpsc::UnboundedSender<DispatchEvent>>,
}

impl Dispatcher {
    pub fn new(router: ProviderRouter, threads: SharedThreads) -> Self {
        Self {
            router,
            threads,
            pending: Arc::new(Mutex::new(Vec::new())),
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<DispatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn threads(&self) -> SharedThreads {
        self.threads.clone()
    }

    /// Model ids with a call still outstanding
    pub async fn pending(&self) -> Vec<String> {
        dedup(&self.pending.lock().await)
    }

    pub async fn send(
        &self,
        prompt: &str,
        image: Option<ImageAttachment>,
        selection: &Selection,
        keys: &ApiKeys,
    ) -> Result<Option<TurnReport>, SendError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        let models = selection.resolve();
        if models.is_empty() {
            return Err(SendError::NoModelSelected);
        }

        let (thread_id, history) = {
            let mut store = self.threads.lock().await;
            let thread_id = store.ensure_active();
            store.append(&thread_id, Message::user(prompt));
            let history = store
                .get(&thread_id)
                .map(|t| t.messages.clone())
                .unwrap_or_default();
            (thread_id, history)
        };
        self.emit(DispatchEvent::ThreadUpdated(thread_id.clone()));

        tracing::info!(
            thread = %thread_id,
            models = models.len(),
            prompt_len = prompt.len(),
            "Dispatching prompt"
        );

        {
            let mut pending = self.pending.lock().await;
            pending.extend(models.iter().map(|m| m.id.to_string()));
            self.emit(DispatchEvent::PendingChanged(dedup(&pending)));
        }

        let calls = models.iter().map(|model| {
            self.dispatch_one(model, &thread_id, history.clone(), image.clone(), keys)
        });
        let settled = join_all(calls).await;

        let report = TurnReport {
            thread_id,
            dispatched: settled.len(),
            succeeded: settled.iter().filter(|s| **s == Settled::Succeeded).count(),
            failed: settled.iter().filter(|s| **s == Settled::Failed).count(),
            dropped: settled.iter().filter(|s| **s == Settled::Dropped).count(),
        };
        tracing::info!(
            thread = %report.thread_id,
            succeeded = report.succeeded,
            failed = report.failed,
            dropped = report.dropped,
            "Turn settled"
        );
        Ok(Some(report))
    }

    async fn dispatch_one(
        &self,
        model: &Model,
        thread_id: &str,
        history: Vec<Message>,
        image: Option<ImageAttachment>,
        keys: &ApiKeys,
    ) -> Settled {
        let started = Instant::now();
        let result = self.router.invoke(model, keys, history, image).await;

        let (content, ok) = match result {
            Ok(ProviderOutcome::Success { text }) => (text, true),
            Ok(ProviderOutcome::Failure { message }) => (error_content(model, &message), false),
            Err(e) => (error_content(model, &e.to_string()), false),
        };
        tracing::debug!(
            model = model.id,
            ok,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model settled"
        );

        let appended = {
            let mut store = self.threads.lock().await;
            store.append(thread_id, Message::assistant(model.id, content))
        };
        if appended {
            self.emit(DispatchEvent::ThreadUpdated(thread_id.to_string()));
        } else {
            tracing::warn!(model = model.id, thread = %thread_id, "Thread gone, dropping answer");
        }

        {
            let mut pending = self.pending.lock().await;
            if let Some(pos) = pending.iter().position(|id| id == model.id) {
                pending.remove(pos);
            }
            self.emit(DispatchEvent::PendingChanged(dedup(&pending)));
        }

        match (appended, ok) {
            (false, _) => Settled::Dropped,
            (true, true) => Settled::Succeeded,
            (true, false) => Settled::Failed,
        }
    }

    fn emit(&self, event: DispatchEvent) {
        if let Some(events) = &self.events {
            // nobody listening is fine
            let _ = events.send(event);
        }
    }
}

fn error_content(model: &Model, message: &str) -> String {
    format!("[{}] Error: {}", model.label, message)
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }
    unique
}
