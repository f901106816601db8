use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use crate::domain::models::HierarchyLevelUpdate;
use crate::domain::ports::role_repository::RoleRepository;
use crate::domain::ports::time_service::TimeService;
use crate::domain::services::role_service::RoleDomainService;

/// Derives dense, strictly decreasing hierarchy levels from a display
/// order: the first role gets the highest level, the last gets 0.
pub fn derive_hierarchy_levels(order: &[String]) -> Vec<HierarchyLevelUpdate> {
    let count = order.len() as i64;
    order
        .iter()
        .enumerate()
        .map(|(index, role_id)| HierarchyLevelUpdate {
            role_id: role_id.clone(),
            hierarchy_level: count - 1 - index as i64,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReorderState {
    Idle,
    PendingCommit,
    Committing,
}

/// Outcome of a committed reorder batch, published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderSignal {
    Committed {
        role_count: usize,
    },
    /// Some per-role writes failed. `confirmed_order` is the store's actual
    /// order after the batch; the caller reverts its display to it.
    PartialFailure {
        failed_role_ids: Vec<String>,
        confirmed_order: Vec<String>,
    },
}

/// Non-blocking front of the coordinator. Cheap to clone; each call records
/// the new display order and (re)starts the debounce window.
#[derive(Clone)]
pub struct ReorderHandle {
    tx: mpsc::UnboundedSender<Vec<String>>,
}

impl ReorderHandle {
    /// `new_order` is the complete role-id list, most privileged first.
    /// Returns false once the coordinator task has shut down.
    pub fn reorder(&self, new_order: Vec<String>) -> bool {
        self.tx.send(new_order).is_ok()
    }
}

/// Debounces drag-and-drop reorder events into batched hierarchy writes.
///
/// State machine per session: `Idle` until a reorder event arrives, then
/// `PendingCommit` while the debounce window is open (every new event
/// restarts it), then `Committing` for the batch write. Events that arrive
/// while a batch is in flight queue up for the next batch; they never
/// mutate or cancel the one already dispatched.
pub struct ReorderCoordinator {
    service: RoleDomainService,
    repository: Arc<dyn RoleRepository>,
    time: Arc<dyn TimeService>,
    debounce: Duration,
    rx: mpsc::UnboundedReceiver<Vec<String>>,
    signals: broadcast::Sender<ReorderSignal>,
    display_order: Vec<String>,
    confirmed_order: Vec<String>,
    pending: HashMap<String, i64>,
    state: ReorderState,
}

impl ReorderCoordinator {
    pub fn spawn(
        repository: Arc<dyn RoleRepository>,
        time: Arc<dyn TimeService>,
        debounce: Duration,
    ) -> (ReorderHandle, broadcast::Receiver<ReorderSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (signals, signal_rx) = broadcast::channel(16);

        let coordinator = ReorderCoordinator {
            service: RoleDomainService::new(repository.clone()),
            repository,
            time,
            debounce,
            rx,
            signals,
            display_order: Vec::new(),
            confirmed_order: Vec::new(),
            pending: HashMap::new(),
            state: ReorderState::Idle,
        };
        tokio::spawn(coordinator.run());

        (ReorderHandle { tx }, signal_rx)
    }

    fn set_state(&mut self, next: ReorderState) {
        if self.state != next {
            tracing::trace!("Reorder state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    async fn run(mut self) {
        loop {
            if self.pending.is_empty() {
                self.set_state(ReorderState::Idle);
                match self.rx.recv().await {
                    Some(order) => self.apply_reorder(order),
                    None => break,
                }
            } else {
                self.set_state(ReorderState::PendingCommit);
                let time = self.time.clone();
                let debounce = self.debounce;
                tokio::select! {
                    // Drain queued events before letting an expired timer
                    // commit a stale ordering.
                    biased;
                    maybe = self.rx.recv() => match maybe {
                        // Restarting the loop restarts the debounce window.
                        Some(order) => self.apply_reorder(order),
                        None => {
                            // Session ended with changes pending: flush them.
                            self.commit().await;
                            break;
                        }
                    },
                    _ = time.sleep(debounce) => {
                        self.commit().await;
                    }
                }
            }
        }
        tracing::debug!("Reorder coordinator shut down");
    }

    /// Optimistic local update: later events overwrite earlier pending
    /// levels for the same role, so the next batch carries only the final
    /// ordering.
    fn apply_reorder(&mut self, new_order: Vec<String>) {
        for update in derive_hierarchy_levels(&new_order) {
            self.pending.insert(update.role_id, update.hierarchy_level);
        }
        self.display_order = new_order;
    }

    async fn commit(&mut self) {
        self.set_state(ReorderState::Committing);

        let mut updates: Vec<HierarchyLevelUpdate> = self
            .pending
            .drain()
            .map(|(role_id, hierarchy_level)| HierarchyLevelUpdate {
                role_id,
                hierarchy_level,
            })
            .collect();
        updates.sort_by(|a, b| b.hierarchy_level.cmp(&a.hierarchy_level));

        let report = self.service.apply_hierarchy_levels(&updates).await;

        if report.is_full_success() {
            self.confirmed_order = self.display_order.clone();
            tracing::info!("Committed hierarchy reorder of {} roles", report.attempted);
            let _ = self.signals.send(ReorderSignal::Committed {
                role_count: report.attempted,
            });
        } else {
            // Roles that did persist keep their new levels; the failed ones
            // fall back to whatever the store still holds. Refetching gives
            // exactly that consistent order.
            let confirmed_order = self.refetch_order().await;
            self.display_order = confirmed_order.clone();
            self.confirmed_order = confirmed_order.clone();
            tracing::warn!(
                "Hierarchy reorder partially failed for {} of {} roles",
                report.failed_role_ids.len(),
                report.attempted
            );
            let _ = self.signals.send(ReorderSignal::PartialFailure {
                failed_role_ids: report.failed_role_ids,
                confirmed_order,
            });
        }
    }

    async fn refetch_order(&self) -> Vec<String> {
        match self.repository.list_roles(false).await {
            Ok(mut roles) => {
                roles.sort_by(|a, b| b.hierarchy_level.cmp(&a.hierarchy_level));
                roles.into_iter().map(|role| role.id).collect()
            }
            Err(e) => {
                tracing::error!("Failed to refetch role order after reorder failure: {}", e);
                self.confirmed_order.clone()
            }
        }
    }
}
