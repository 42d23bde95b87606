use crate::models::{ClickStatistics, Session, UserProfile};
use crate::storage::Store;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

/// Handles for the scheduled side effects. Arming a concern always aborts
/// its predecessor first, so at most one task per concern is ever live.
#[derive(Default)]
pub struct Timers {
    combo_reset: Option<AbortHandle>,
    auto_tap: Option<AbortHandle>,
}

impl Timers {
    pub fn arm_combo_reset(&mut self, handle: AbortHandle) {
        if let Some(previous) = self.combo_reset.replace(handle) {
            previous.abort();
        }
    }

    pub fn arm_auto_tap(&mut self, handle: AbortHandle) {
        if let Some(previous) = self.auto_tap.replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel_auto_tap(&mut self) {
        if let Some(previous) = self.auto_tap.take() {
            previous.abort();
        }
    }

    pub fn clear_auto_tap(&mut self) {
        self.auto_tap = None;
    }
}

/// All mutable application data behind one lock: the single logical writer.
/// Every mutation derives the next state from the state read under this
/// lock, never from an earlier snapshot.
pub struct AppData {
    pub store: Store,
    pub session: Session,
    pub stats: ClickStatistics,
    pub profile: Option<UserProfile>,
    pub timers: Timers,
}

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(store: Store, session: Session, stats: ClickStatistics, profile: Option<UserProfile>) -> Self {
        Self {
            data: Arc::new(Mutex::new(AppData {
                store,
                session,
                stats,
                profile,
                timers: Timers::default(),
            })),
        }
    }
}
