use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use indexmap::IndexMap;
use seodeck_api::{ApiClient, TransportError};
use seodeck_registry::{CatalogRegistry, agents_catalog};
use seodeck_types::{AgentListing, PanelId};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{DashboardController, PanelController, PanelEvent};

const EVENT_CAPACITY: usize = 64;

/// The site URL shared by every panel. Blank means "none".
#[derive(Debug, Clone, Default)]
pub struct GlobalTarget(Arc<RwLock<Option<String>>>);

impl GlobalTarget {
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Store `url` trimmed; a blank value clears the target.
    pub fn set(&self, url: &str) {
        let trimmed = url.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Everything one dashboard session shares: the client, the global target,
/// one controller per panel and the event stream they publish on.
pub struct Session {
    client: ApiClient,
    registry: Arc<CatalogRegistry>,
    target: GlobalTarget,
    refresh_generation: Arc<AtomicU64>,
    events: broadcast::Sender<PanelEvent>,
    root: CancellationToken,
    panels: IndexMap<PanelId, PanelController>,
    dashboard: DashboardController,
}

impl Session {
    pub fn new(client: ApiClient, registry: Arc<CatalogRegistry>) -> Self {
        let target = GlobalTarget::default();
        let refresh_generation = Arc::new(AtomicU64::new(0));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let root = CancellationToken::new();

        let panels = PanelId::ALL
            .iter()
            .filter_map(|panel| {
                let catalog = match panel {
                    PanelId::Agents => Arc::new(agents_catalog(&AgentListing::default())),
                    _ => registry.get(*panel)?,
                };
                let controller = PanelController::new(
                    catalog,
                    client.clone(),
                    target.clone(),
                    root.child_token(),
                    refresh_generation.clone(),
                    events.clone(),
                );
                Some((*panel, controller))
            })
            .collect();

        Self {
            dashboard: DashboardController::new(client.clone()),
            client,
            registry,
            target,
            refresh_generation,
            events,
            root,
            panels,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    pub fn dashboard(&self) -> &DashboardController {
        &self.dashboard
    }

    pub fn panel(&self, panel: PanelId) -> Option<&PanelController> {
        self.panels.get(&panel)
    }

    pub fn panels(&self) -> impl Iterator<Item = &PanelController> {
        self.panels.values()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    pub fn target(&self) -> &GlobalTarget {
        &self.target
    }

    pub fn target_url(&self) -> Option<String> {
        self.target.get()
    }

    pub fn set_target_url(&self, url: &str) {
        self.target.set(url);
        debug!(target_url = ?self.target.get(), "global target updated");
    }

    pub fn clear_target_url(&self) {
        self.target.clear();
    }

    /// Incremented after every successful execution on any panel.
    pub fn refresh_generation(&self) -> u64 {
        self.refresh_generation.load(Ordering::Acquire)
    }

    /// Re-fetch `/agents` and rebuild the agents panel catalog from it.
    pub async fn refresh_agents(&self) -> Result<AgentListing, TransportError> {
        let listing = self.dashboard.agents().await?;
        if let Some(panel) = self.panels.get(&PanelId::Agents) {
            panel.replace_catalog(agents_catalog(&listing));
        }
        debug!(agents = listing.agents.len(), "agents catalog rebuilt");
        Ok(listing)
    }

    /// Cancel in-flight work on every panel.
    pub fn teardown(&self) {
        info!("session teardown");
        self.root.cancel();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("panels", &self.panels.keys().collect::<Vec<_>>())
            .field("target", &self.target.get())
            .field("refresh_generation", &self.refresh_generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_trims_and_treats_blank_as_none() {
        let target = GlobalTarget::default();
        target.set("  https://example.com  ");
        assert_eq!(target.get().as_deref(), Some("https://example.com"));
        target.set("   ");
        assert_eq!(target.get(), None);
    }

    #[test]
    fn clones_share_the_same_target() {
        let target = GlobalTarget::default();
        let other = target.clone();
        target.set("https://example.com");
        assert_eq!(other.get().as_deref(), Some("https://example.com"));
        other.clear();
        assert_eq!(target.get(), None);
    }
}
