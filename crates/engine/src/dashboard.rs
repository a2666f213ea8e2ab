use seodeck_api::{ApiClient, TransportError};
use seodeck_types::{AgentListing, DependencyGraph, ExecutionLog, HealthSnapshot};
use tracing::debug;

/// Entries requested per page of the execution log.
pub const LOG_PAGE_SIZE: usize = 50;

/// Read-only projections of backend state. Nothing here is cached; every
/// call re-fetches.
#[derive(Debug, Clone)]
pub struct DashboardController {
    client: ApiClient,
}

impl DashboardController {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn health(&self) -> Result<HealthSnapshot, TransportError> {
        self.client.health().await
    }

    pub async fn agents(&self) -> Result<AgentListing, TransportError> {
        self.client.agents().await
    }

    pub async fn dependencies(&self) -> Result<DependencyGraph, TransportError> {
        self.client.agent_dependencies().await
    }

    /// Fetch one page of the execution log and fold the reported total into `pager`.
    ///
    /// When the log shrank below the requested page, the pager is pulled back
    /// to the last page and that page is fetched instead.
    pub async fn logs(&self, pager: &mut LogPager) -> Result<ExecutionLog, TransportError> {
        let mut log = self.client.execution_log(pager.page_size, pager.offset()).await?;
        pager.total_entries = log.total_entries;
        if pager.clamp() {
            debug!(page = pager.page, "execution log shrank; loading last page");
            log = self.client.execution_log(pager.page_size, pager.offset()).await?;
            pager.total_entries = log.total_entries;
            pager.clamp();
        }
        debug!(page = pager.page, total_pages = pager.total_pages(), "execution log page loaded");
        Ok(log)
    }
}

/// Zero-based page cursor over the execution log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPager {
    pub page: usize,
    pub page_size: usize,
    pub total_entries: usize,
}

impl Default for LogPager {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: LOG_PAGE_SIZE,
            total_entries: 0,
        }
    }
}

impl LogPager {
    pub fn offset(&self) -> usize {
        self.page * self.page_size
    }

    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_entries.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Advance one page. Returns false at the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Returns true when the page moved.
    fn clamp(&mut self) -> bool {
        let last = self.total_pages().saturating_sub(1);
        let clamped = self.page.min(last);
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }
}
