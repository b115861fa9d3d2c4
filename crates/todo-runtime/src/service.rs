//! Async front end to a [`TodoStore`].
//!
//! The store is moved into a tokio task that owns it exclusively. Callers talk
//! to it through [`TodoHandle`]s: every mutation is a request on an `mpsc`
//! channel answered on a `oneshot`, and the latest list is published on a
//! `watch` channel so readers never need a round trip.

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use todo_core::list::EditOutcome;
use todo_core::models::{Filter, SortOrder, Todo, TodoId, TodoStats};
use todo_core::{Result, TodoError};
use todo_data::transfer::MergeMode;
use tracing::debug;

use crate::store::TodoStore;

// ── Public types ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    /// The service task has stopped.
    #[error("todo service is not running")]
    Closed,
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Partial update of a single todo; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

enum Request {
    Add {
        text: String,
        reply: oneshot::Sender<Result<Todo>>,
    },
    Toggle {
        id: TodoId,
        reply: oneshot::Sender<Result<Todo>>,
    },
    Edit {
        id: TodoId,
        text: String,
        reply: oneshot::Sender<Result<EditOutcome>>,
    },
    Update {
        id: TodoId,
        patch: TodoPatch,
        reply: oneshot::Sender<Result<Todo>>,
    },
    Delete {
        id: TodoId,
        reply: oneshot::Sender<Result<Option<Todo>>>,
    },
    ClearCompleted {
        reply: oneshot::Sender<Result<usize>>,
    },
    ToggleAll {
        reply: oneshot::Sender<Result<usize>>,
    },
    Import {
        todos: Vec<Todo>,
        mode: MergeMode,
        reply: oneshot::Sender<Result<usize>>,
    },
    Reload {
        reply: oneshot::Sender<Result<()>>,
    },
}

// ── TodoService ───────────────────────────────────────────────────────────────

/// The task that owns the store. Construct it with [`TodoService::spawn`].
pub struct TodoService {
    store: TodoStore,
    requests: mpsc::Receiver<Request>,
    state: watch::Sender<Vec<Todo>>,
}

impl TodoService {
    /// Move `store` into a new tokio task and return a handle to it.
    ///
    /// Must be called from within a tokio runtime. The task exits once every
    /// handle has been dropped.
    pub fn spawn(store: TodoStore) -> TodoHandle {
        // Requests are tiny and answered immediately; a small buffer is plenty.
        let (tx, rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(store.list().todos().to_vec());
        let source = store.describe();

        let service = Self {
            store,
            requests: rx,
            state: state_tx,
        };
        tokio::spawn(service.run());

        TodoHandle {
            requests: tx,
            state: state_rx,
            source,
        }
    }

    async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.handle(request);
        }
        debug!("all todo handles dropped; service exiting");
    }

    fn handle(&mut self, request: Request) {
        // A dropped reply receiver just means the caller stopped waiting.
        match request {
            Request::Add { text, reply } => {
                let result = self.store.add(&text);
                self.publish();
                let _ = reply.send(result);
            }
            Request::Toggle { id, reply } => {
                let result = self.store.toggle(id);
                self.publish();
                let _ = reply.send(result);
            }
            Request::Edit { id, text, reply } => {
                let result = self.store.edit(id, &text);
                self.publish();
                let _ = reply.send(result);
            }
            Request::Update { id, patch, reply } => {
                let result = self
                    .store
                    .update(id, patch.text.as_deref(), patch.completed);
                self.publish();
                let _ = reply.send(result);
            }
            Request::Delete { id, reply } => {
                let result = self.store.delete(id);
                self.publish();
                let _ = reply.send(result);
            }
            Request::ClearCompleted { reply } => {
                let result = self.store.clear_completed();
                self.publish();
                let _ = reply.send(result);
            }
            Request::ToggleAll { reply } => {
                let result = self.store.toggle_all();
                self.publish();
                let _ = reply.send(result);
            }
            Request::Import { todos, mode, reply } => {
                let result = self.store.import(todos, mode);
                self.publish();
                let _ = reply.send(result);
            }
            Request::Reload { reply } => {
                let result = self.store.reload();
                self.publish();
                let _ = reply.send(result);
            }
        }
    }

    /// Push the current list to subscribers if it differs from the last one.
    fn publish(&self) {
        let todos = self.store.list().todos();
        self.state.send_if_modified(|current| {
            if current.as_slice() == todos {
                false
            } else {
                *current = todos.to_vec();
                true
            }
        });
    }
}

// ── TodoHandle ────────────────────────────────────────────────────────────────

/// Cloneable client of a running [`TodoService`].
#[derive(Clone)]
pub struct TodoHandle {
    requests: mpsc::Sender<Request>,
    state: watch::Receiver<Vec<Todo>>,
    source: String,
}

impl TodoHandle {
    pub async fn add(&self, text: impl Into<String>) -> ServiceResult<Todo> {
        let text = text.into();
        self.call(|reply| Request::Add { text, reply }).await
    }

    pub async fn toggle(&self, id: TodoId) -> ServiceResult<Todo> {
        self.call(|reply| Request::Toggle { id, reply }).await
    }

    pub async fn edit(&self, id: TodoId, text: impl Into<String>) -> ServiceResult<EditOutcome> {
        let text = text.into();
        self.call(|reply| Request::Edit { id, text, reply }).await
    }

    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> ServiceResult<Todo> {
        self.call(|reply| Request::Update { id, patch, reply })
            .await
    }

    pub async fn delete(&self, id: TodoId) -> ServiceResult<Option<Todo>> {
        self.call(|reply| Request::Delete { id, reply }).await
    }

    pub async fn clear_completed(&self) -> ServiceResult<usize> {
        self.call(|reply| Request::ClearCompleted { reply }).await
    }

    pub async fn toggle_all(&self) -> ServiceResult<usize> {
        self.call(|reply| Request::ToggleAll { reply }).await
    }

    pub async fn import(&self, todos: Vec<Todo>, mode: MergeMode) -> ServiceResult<usize> {
        self.call(|reply| Request::Import { todos, mode, reply })
            .await
    }

    pub async fn reload(&self) -> ServiceResult<()> {
        self.call(|reply| Request::Reload { reply }).await
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// The whole list as of the last completed mutation.
    pub fn snapshot(&self) -> Vec<Todo> {
        self.state.borrow().clone()
    }

    /// Todos visible under `filter`, in insertion order.
    pub fn list(&self, filter: Filter) -> Vec<Todo> {
        self.view(filter, None, SortOrder::CreatedAsc)
    }

    /// Filtered, searched and sorted copy of the list.
    pub fn view(&self, filter: Filter, query: Option<&str>, order: SortOrder) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self
            .state
            .borrow()
            .iter()
            .filter(|t| filter.matches(t))
            .filter(|t| query.map_or(true, |q| t.matches_query(q)))
            .cloned()
            .collect();
        todos.sort_by(|a, b| order.compare(a, b));
        todos
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(self.state.borrow().iter())
    }

    /// A receiver that sees every change to the list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Todo>> {
        self.state.clone()
    }

    /// Description of the underlying storage, e.g. the data file path.
    pub fn source(&self) -> &str {
        &self.source
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> Request,
    ) -> ServiceResult<T> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(make(reply))
            .await
            .map_err(|_| ServiceError::Closed)?;
        let result = response.await.map_err(|_| ServiceError::Closed)?;
        Ok(result?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
