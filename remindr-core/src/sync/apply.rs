use tracing::{info, warn};

use super::plan::SyncPlan;
use super::store::CalendarStore;
use crate::generate::SourceKey;

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct ApplyStats {
    pub created: usize,
    /// Keys that could not be created, with the store's error message.
    pub failed: Vec<(SourceKey, String)>,
}

impl ApplyStats {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create every reminder in `plan.to_create`.
///
/// A failed creation is recorded and the rest still go ahead; nothing is
/// lost because the next run plans the missing key again.
pub async fn apply<S: CalendarStore>(store: &S, plan: &SyncPlan) -> ApplyStats {
    let mut stats = ApplyStats::default();

    for instance in &plan.to_create {
        match store.create_event(instance).await {
            Ok(id) => {
                info!(key = %instance.source_key, id = %id, "created reminder");
                stats.created += 1;
            }
            Err(e) => {
                warn!(key = %instance.source_key, error = %e, "failed to create reminder");
                stats.failed.push((instance.source_key.clone(), e.to_string()));
            }
        }
    }

    stats
}
