//! Deferred visual effects.
//!
//! Each effect is a tokio task that sleeps, then edits the dashboard through a
//! weak handle. Tasks are aborted on shutdown, and an effect whose dashboard has
//! been dropped does nothing.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use super::Dashboard;

pub struct EffectScheduler {
    target: Weak<Mutex<Dashboard>>,
    redraw: mpsc::UnboundedSender<()>,
    tasks: JoinSet<()>,
}

impl EffectScheduler {
    pub fn new(target: &Arc<Mutex<Dashboard>>, redraw: mpsc::UnboundedSender<()>) -> Self {
        Self {
            target: Arc::downgrade(target),
            redraw,
            tasks: JoinSet::new(),
        }
    }

    /// Run `effect` against the dashboard after `delay`, then request a redraw.
    pub fn schedule<F>(&mut self, delay: Duration, effect: F)
    where
        F: FnOnce(&mut Dashboard) + Send + 'static,
    {
        // Reap finished effects so the set does not grow without bound
        while self.tasks.try_join_next().is_some() {}

        let target = self.target.clone();
        let redraw = self.redraw.clone();
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(dashboard) = target.upgrade() else {
                return;
            };
            effect(&mut *dashboard.lock().await);
            // Receiver gone means the UI is shutting down
            let _ = redraw.send(());
        });
    }

    /// Cancel every pending effect.
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!("Cancelling {} pending effects", self.tasks.len());
        }
        self.tasks.abort_all();
    }
}

impl Drop for EffectScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
