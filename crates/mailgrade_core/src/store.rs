//! Process-local persistence for batches and results
//!
//! `SavedList` rows hold only aggregate counters; the individual results live
//! in `ValidationResult` rows with an optional foreign key back to the list.
//! Recording a batch result and bumping its list's counters happens under one
//! lock so concurrent workers never lose updates.

use crate::{ListStatus, SavedList, Status, ValidationError, ValidationResult};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    lists: HashMap<Uuid, SavedList>,
    results: HashMap<Uuid, ValidationResult>,
}

/// In-memory store shared by the orchestrator and the query surface
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_list(&self, list: SavedList) {
        self.tables.lock().unwrap().lists.insert(list.id, list);
    }

    pub fn get_list(&self, id: Uuid) -> Result<SavedList, ValidationError> {
        self.tables
            .lock()
            .unwrap()
            .lists
            .get(&id)
            .cloned()
            .ok_or(ValidationError::ListNotFound(id))
    }

    pub fn set_list_status(&self, id: Uuid, status: ListStatus) {
        if let Some(list) = self.tables.lock().unwrap().lists.get_mut(&id) {
            list.status = status;
        }
    }

    /// Persist a single lookup's result (no list attached)
    pub fn insert_result(&self, result: ValidationResult) {
        self.tables.lock().unwrap().results.insert(result.id, result);
    }

    /// Persist one batch result and atomically bump the owning list's
    /// counter for its status
    pub fn record_batch_result(&self, result: ValidationResult) {
        let mut tables = self.tables.lock().unwrap();

        if let Some(list_id) = result.list_id {
            if let Some(list) = tables.lists.get_mut(&list_id) {
                match result.status {
                    Status::Valid => list.valid_emails += 1,
                    Status::Risky => list.risky_emails += 1,
                    Status::Invalid => list.invalid_emails += 1,
                }
            }
        }

        tables.results.insert(result.id, result);
    }

    /// All results belonging to a batch, oldest first
    pub fn results_for_list(&self, list_id: Uuid) -> Vec<ValidationResult> {
        let tables = self.tables.lock().unwrap();
        let mut results: Vec<ValidationResult> = tables
            .results
            .values()
            .filter(|r| r.list_id == Some(list_id))
            .cloned()
            .collect();
        results.sort_by_key(|r| r.created_at);
        results
    }

    pub fn list_count(&self) -> usize {
        self.tables.lock().unwrap().lists.len()
    }

    pub fn result_count(&self) -> usize {
        self.tables.lock().unwrap().results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CheckReport;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn result_for(list_id: Uuid, status: Status) -> ValidationResult {
        ValidationResult {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            is_valid: status == Status::Valid,
            score: 85,
            checks: CheckReport::all_failed(),
            status,
            suggestion: None,
            list_id: Some(list_id),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unknown_list_is_an_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_list(Uuid::new_v4()),
            Err(ValidationError::ListNotFound(_))
        ));
    }

    #[test]
    fn batch_results_bump_the_matching_counter() {
        let store = MemoryStore::new();
        let list = SavedList::new("batch", "", 3);
        let id = list.id;
        store.insert_list(list);

        store.record_batch_result(result_for(id, Status::Valid));
        store.record_batch_result(result_for(id, Status::Risky));
        store.record_batch_result(result_for(id, Status::Invalid));

        let list = store.get_list(id).unwrap();
        assert_eq!(list.valid_emails, 1);
        assert_eq!(list.risky_emails, 1);
        assert_eq!(list.invalid_emails, 1);
        assert_eq!(list.processed(), 3);
        assert_eq!(store.results_for_list(id).len(), 3);
    }

    #[test]
    fn results_keep_their_list_scope() {
        let store = MemoryStore::new();
        let a = SavedList::new("a", "", 1);
        let b = SavedList::new("b", "", 1);
        let (a_id, b_id) = (a.id, b.id);
        store.insert_list(a);
        store.insert_list(b);

        store.record_batch_result(result_for(a_id, Status::Valid));
        store.record_batch_result(result_for(b_id, Status::Valid));

        assert_eq!(store.results_for_list(a_id).len(), 1);
        assert_eq!(store.results_for_list(b_id).len(), 1);
        assert_eq!(store.result_count(), 2);
    }
}
