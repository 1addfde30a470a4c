use crate::config::NavigationDelays;
use crate::navigation::ExpansionPath;
use crate::node_key::{NodeKey, NodeType};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub type NavigationId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriverState {
    #[default]
    Idle,
    Expanding(usize),
    Done,
}

/// Step-through state machine for one expansion path.
///
/// Knows nothing about time; the caller expands `current()`, waits
/// `step_delay()`, then calls `advance()`.
#[derive(Debug, Default)]
pub struct ExpansionDriver {
    path: Vec<NodeKey>,
    state: DriverState,
}

impl ExpansionDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new path. An empty path leaves the driver idle.
    pub fn start(&mut self, path: Vec<NodeKey>) -> DriverState {
        self.state = if path.is_empty() {
            DriverState::Idle
        } else {
            DriverState::Expanding(0)
        };
        self.path = path;
        self.state
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn current(&self) -> Option<&NodeKey> {
        match self.state {
            DriverState::Expanding(index) => self.path.get(index),
            _ => None,
        }
    }

    pub fn advance(&mut self) -> DriverState {
        if let DriverState::Expanding(index) = self.state {
            self.state = if index + 1 < self.path.len() {
                DriverState::Expanding(index + 1)
            } else {
                DriverState::Done
            };
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.path.clear();
        self.state = DriverState::Idle;
    }
}

/// How long to wait after expanding `key` before moving to the next step.
///
/// Loaded nodes and UI-only nodes (groups, placeholders) only need a render
/// to settle; anything else waits for its lazy fetch.
pub fn step_delay(key: &NodeKey, loaded: &HashSet<NodeKey>, delays: &NavigationDelays) -> Duration {
    if key.is_group() || key.is_placeholder() || loaded.contains(key) {
        delays.settle()
    } else {
        delays.load()
    }
}

/// The tree widget the navigator drives.
#[async_trait]
pub trait TreeController: Send + Sync + 'static {
    /// Expands `key`, starting its lazy load if it has never been loaded.
    async fn expand(&self, key: &NodeKey);

    async fn scroll_into_view(&self, key: &NodeKey, node_type: NodeType);
}

#[derive(Debug, Default)]
struct Progress {
    owner: Option<NavigationId>,
    state: DriverState,
}

struct PendingNavigation {
    id: NavigationId,
    handle: JoinHandle<()>,
}

/// Reveals expansion paths step by step, one navigation at a time.
///
/// Starting a navigation aborts the previous one, so at most one step timer
/// is ever outstanding. Must be used from within a tokio runtime.
pub struct Navigator<C: TreeController> {
    controller: Arc<C>,
    delays: NavigationDelays,
    progress: Arc<Mutex<Progress>>,
    pending: Mutex<Option<PendingNavigation>>,
}

impl<C: TreeController> Navigator<C> {
    pub fn new(controller: Arc<C>, delays: NavigationDelays) -> Self {
        Self {
            controller,
            delays,
            progress: Arc::new(Mutex::new(Progress::default())),
            pending: Mutex::new(None),
        }
    }

    /// Starts revealing `resolved`, cancelling any navigation in flight.
    ///
    /// `loaded` is the set of keys whose children are already present.
    /// Returns `None` and stays idle when the path is empty.
    pub fn navigate(
        &self,
        resolved: ExpansionPath,
        loaded: HashSet<NodeKey>,
    ) -> Option<NavigationId> {
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.handle.abort();
            log::debug!("Cancelled navigation {}", previous.id);
        }

        if resolved.is_empty() {
            *lock(&self.progress) = Progress::default();
            return None;
        }

        let id = NavigationId::new_v4();
        *lock(&self.progress) = Progress {
            owner: Some(id),
            state: DriverState::Expanding(0),
        };

        log::info!(
            "Navigation {} started: {} steps to {}",
            id,
            resolved.path.len(),
            resolved
                .terminal_key
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        );

        let handle = tokio::spawn(run_navigation(
            id,
            Arc::clone(&self.controller),
            self.delays,
            resolved,
            loaded,
            Arc::clone(&self.progress),
        ));
        *pending = Some(PendingNavigation { id, handle });

        Some(id)
    }

    /// Aborts the navigation in flight. Returns `true` if one was running.
    pub fn cancel(&self) -> bool {
        let Some(previous) = lock(&self.pending).take() else {
            return false;
        };

        let was_running = !previous.handle.is_finished();
        previous.handle.abort();
        *lock(&self.progress) = Progress::default();
        was_running
    }

    pub fn state(&self) -> DriverState {
        lock(&self.progress).state
    }

    pub fn current_navigation(&self) -> Option<NavigationId> {
        lock(&self.pending).as_ref().map(|p| p.id)
    }

    /// Number of step timers still outstanding: zero or one.
    pub fn active_timers(&self) -> usize {
        lock(&self.pending)
            .as_ref()
            .filter(|p| !p.handle.is_finished())
            .map_or(0, |_| 1)
    }

    pub fn has_pending(&self) -> bool {
        self.active_timers() > 0
    }
}

async fn run_navigation<C: TreeController>(
    id: NavigationId,
    controller: Arc<C>,
    delays: NavigationDelays,
    resolved: ExpansionPath,
    loaded: HashSet<NodeKey>,
    progress: Arc<Mutex<Progress>>,
) {
    let mut driver = ExpansionDriver::new();
    driver.start(resolved.path);

    while let Some(key) = driver.current().cloned() {
        if !key.is_placeholder() {
            controller.expand(&key).await;
        }

        let delay = step_delay(&key, &loaded, &delays);
        log::debug!("Navigation {}: expanded {}, waiting {:?}", id, key, delay);
        tokio::time::sleep(delay).await;

        let state = driver.advance();
        if !publish(&progress, id, state) {
            return;
        }
    }

    if let (Some(key), Some(node_type)) = (resolved.terminal_key, resolved.terminal_node_type) {
        controller.scroll_into_view(&key, node_type).await;
    }

    log::info!("Navigation {} finished", id);
}

/// Records the new state if `id` still owns the progress cell.
fn publish(progress: &Mutex<Progress>, id: NavigationId, state: DriverState) -> bool {
    let mut progress = lock(progress);
    if progress.owner != Some(id) {
        return false;
    }
    progress.state = state;
    true
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
