//! The save lifecycle orchestrator.
//!
//! [`SaveOrchestrator`] is the single owner of the live [`GameState`]. It
//! creates saves and loads them through the [`BackendBridge`], hydrating
//! every document into a staging aggregate before anything becomes
//! visible. Observers read immutable [`SaveStatus`] snapshots from a
//! `tokio::sync::watch` channel; only [`SaveOrchestrator::create_and_load`]
//! and [`SaveOrchestrator::load`] publish new ones.
//!
//! # Concurrency
//!
//! One lifecycle operation runs at a time. A second call arriving while
//! one is in flight is rejected with [`LifecycleError::Busy`] or waits its
//! turn, per [`BusyPolicy`]. A successful load publishes its status in a
//! single `send_replace`, so readers never observe a half-loaded save.

use std::sync::Arc;

use galaxies_types::{GameState, SaveId, SaveMeta};
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, info, warn};

use crate::bridge::{BackendBridge, BridgeError};
use crate::config::{BusyPolicy, LifecycleConfig};
use crate::hydrator::{HydrationError, hydrate_bundle};

/// A published view of the lifecycle state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveStatus {
    /// The save most recently created or loaded, if any.
    pub active_save_id: Option<SaveId>,
    /// Whether a complete aggregate is loaded.
    pub ready: bool,
    /// The live aggregate. Present exactly when `ready` is set.
    pub game: Option<Arc<GameState>>,
}

/// Why loading a save failed.
#[derive(Debug, thiserror::Error)]
pub enum LoadFailure {
    /// The bridge could not deliver the bundle.
    #[error("bridge failed to deliver bundle: {source}")]
    Transport {
        /// The underlying bridge error.
        source: BridgeError,
    },

    /// The bundle was delivered but did not hydrate.
    #[error(transparent)]
    Hydration(#[from] HydrationError),
}

/// Errors raised by lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The bridge did not produce a usable save id.
    #[error("could not create save for captain {captain_name:?} of {ship_name:?}: {reason}")]
    CreationFailure {
        /// Captain name that was requested.
        captain_name: String,
        /// Ship name that was requested.
        ship_name: String,
        /// What went wrong.
        reason: String,
    },

    /// A bridge call outside of loading failed.
    #[error("backend bridge error: {source}")]
    Transport {
        /// The underlying bridge error.
        #[from]
        source: BridgeError,
    },

    /// A save could not be loaded. The previous aggregate is still live.
    #[error("failed to load save {save_id}: {source}")]
    AggregateLoad {
        /// The save that was requested.
        save_id: SaveId,
        /// The first failure encountered.
        source: LoadFailure,
    },

    /// Another lifecycle operation is in flight.
    #[error("another save operation is already in progress")]
    Busy,
}

/// Owner of the live save and its lifecycle.
pub struct SaveOrchestrator {
    bridge: Arc<dyn BackendBridge>,
    policy: BusyPolicy,
    lifecycle: Mutex<()>,
    status: watch::Sender<SaveStatus>,
}

impl core::fmt::Debug for SaveOrchestrator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SaveOrchestrator")
            .field("policy", &self.policy)
            .field("active_save_id", &self.status.borrow().active_save_id)
            .finish_non_exhaustive()
    }
}

impl SaveOrchestrator {
    /// Create an orchestrator with nothing loaded.
    pub fn new(bridge: Arc<dyn BackendBridge>, config: &LifecycleConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::default());
        Self {
            bridge,
            policy: config.busy_policy,
            lifecycle: Mutex::new(()),
            status,
        }
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    /// The current status snapshot.
    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Whether a complete aggregate is loaded.
    pub fn is_ready(&self) -> bool {
        self.status.borrow().ready
    }

    /// The save most recently created or loaded.
    pub fn active_save_id(&self) -> Option<SaveId> {
        self.status.borrow().active_save_id.clone()
    }

    /// The live aggregate, if one is loaded.
    pub fn game(&self) -> Option<Arc<GameState>> {
        self.status.borrow().game.clone()
    }

    /// Saves available for loading, sorted by id.
    ///
    /// Read-only; does not take the lifecycle guard.
    pub async fn available_saves(&self) -> Result<Vec<SaveMeta>, LifecycleError> {
        let mut saves = self.bridge.available_saves().await?;
        saves.sort_by(|a, b| a.save_id.cmp(&b.save_id));
        Ok(saves)
    }

    // -----------------------------------------------------------------------
    // Lifecycle operations
    // -----------------------------------------------------------------------

    /// Create a new save and load it.
    ///
    /// A bridge that returns an empty or malformed id, or rejects the
    /// names, yields [`LifecycleError::CreationFailure`].
    ///
    /// The new id becomes the active save id as soon as the bridge returns
    /// it; the aggregate and the ready flag change only if the load that
    /// follows succeeds.
    pub async fn create_and_load(
        &self,
        captain_name: &str,
        ship_name: &str,
    ) -> Result<SaveId, LifecycleError> {
        let _guard = self.acquire().await?;

        let creation_failure = |reason: String| {
            warn!(captain_name, ship_name, %reason, "Save creation failed");
            LifecycleError::CreationFailure {
                captain_name: captain_name.to_owned(),
                ship_name: ship_name.to_owned(),
                reason,
            }
        };

        let raw_id = match self.bridge.create_new_game(captain_name, ship_name).await {
            Ok(raw_id) => raw_id,
            Err(BridgeError::InvalidInput { message }) => {
                return Err(creation_failure(message));
            }
            Err(source) => {
                warn!(captain_name, ship_name, error = %source, "Bridge failed to create save");
                return Err(LifecycleError::Transport { source });
            }
        };
        if raw_id.is_empty() {
            return Err(creation_failure(String::from("backend returned an empty save id")));
        }
        let save_id = SaveId::parse(raw_id).map_err(|err| {
            creation_failure(format!("backend returned an invalid save id: {err}"))
        })?;

        info!(save_id = %save_id, captain_name, ship_name, "Save created");
        self.status.send_modify(|status| {
            status.active_save_id = Some(save_id.clone());
        });

        self.load_locked(&save_id).await?;
        Ok(save_id)
    }

    /// Load an existing save, replacing the live aggregate.
    ///
    /// On failure the previous aggregate, ready flag and active id are left
    /// exactly as they were.
    pub async fn load(&self, save_id: &SaveId) -> Result<(), LifecycleError> {
        let _guard = self.acquire().await?;
        self.load_locked(save_id).await
    }

    /// Take the lifecycle guard according to the busy policy.
    async fn acquire(&self) -> Result<MutexGuard<'_, ()>, LifecycleError> {
        match self.policy {
            BusyPolicy::Reject => self.lifecycle.try_lock().map_err(|err| {
                debug!(error = %err, "Lifecycle operation rejected");
                LifecycleError::Busy
            }),
            BusyPolicy::Queue => Ok(self.lifecycle.lock().await),
        }
    }

    /// Fetch, hydrate into staging, then publish. Caller holds the guard.
    async fn load_locked(&self, save_id: &SaveId) -> Result<(), LifecycleError> {
        let bundle = self
            .bridge
            .load_game_data(save_id)
            .await
            .map_err(|source| load_failed(save_id, LoadFailure::Transport { source }))?;

        let staged = hydrate_bundle(save_id.clone(), &bundle)
            .map_err(|err| load_failed(save_id, LoadFailure::Hydration(err)))?;

        info!(
            save_id = %save_id,
            captain = %staged.save_state.captain_name,
            day = staged.save_state.current_day,
            "Save loaded"
        );
        self.status.send_replace(SaveStatus {
            active_save_id: Some(save_id.clone()),
            ready: true,
            game: Some(Arc::new(staged)),
        });
        Ok(())
    }
}

fn load_failed(save_id: &SaveId, source: LoadFailure) -> LifecycleError {
    warn!(save_id = %save_id, error = %source, "Save load failed");
    LifecycleError::AggregateLoad {
        save_id: save_id.clone(),
        source,
    }
}
