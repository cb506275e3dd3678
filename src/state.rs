use crate::models::{DailyRecordSet, TargetSet};
use crate::registry::CategoryRegistry;
use crate::records::invalid_date_keys;
use crate::storage::{FileStore, KeyValueStore, SalesRepository, load_or_default};
use crate::targets::seed_targets;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The two persisted documents. Writers replace them whole.
#[derive(Debug, Clone, Default)]
pub struct Documents {
    pub records: DailyRecordSet,
    pub targets: TargetSet,
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CategoryRegistry>,
    pub repository: Arc<SalesRepository<FileStore>>,
    pub data: Arc<Mutex<Documents>>,
}

impl AppState {
    pub fn new(
        registry: CategoryRegistry,
        repository: SalesRepository<FileStore>,
        documents: Documents,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            repository: Arc::new(repository),
            data: Arc::new(Mutex::new(documents)),
        }
    }
}

/// Reads both documents, treating unreadable ones as empty, and seeds default
/// targets for roster members that have none.
pub async fn load_documents<S: KeyValueStore>(
    repository: &SalesRepository<S>,
    registry: &CategoryRegistry,
) -> Documents {
    let records = load_or_default("daily sales", || repository.load_records()).await;
    let stored_targets = load_or_default("staff targets", || repository.load_targets()).await;
    let targets = seed_targets(&stored_targets, registry);
    let invalid = invalid_date_keys(&records);
    if !invalid.is_empty() {
        warn!(keys = ?invalid, "daily sales keys that are not dates will be ignored");
    }
    info!(
        days = records.days.len(),
        staff_with_targets = targets.staff.len(),
        "loaded sales documents"
    );
    Documents { records, targets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DAILY_SALES_KEY, MemoryStore};
    use serde_json::json;

    #[tokio::test]
    async fn load_keeps_undated_keys_and_seeds_targets() {
        let repository = SalesRepository::new(MemoryStore::new());
        repository
            .store()
            .set(
                DAILY_SALES_KEY,
                json!({
                    "2024-01-01T10:00:00": {"staff1": {"device": 3.0}},
                    "someday": {"staff1": {"device": 9.0}}
                }),
            )
            .await
            .unwrap();

        let registry = CategoryRegistry::standard();
        let documents = load_documents(&repository, &registry).await;
        assert_eq!(invalid_date_keys(&documents.records), vec!["someday"]);
        assert_eq!(documents.records.days.len(), 2);
        assert_eq!(documents.targets.staff.len(), registry.staff.len());
    }
}
