//! Entity reconciliation: match an incoming draft against the registry
//! and decide insert vs. partial update.

use log::debug;

use super::model::{Fund, FundDraft};
use super::store::FundStore;
use crate::errors::Result;

/// Outcome of one upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Picks the registry entry an incoming record refers to.
///
/// With one candidate the answer is that candidate. With several:
/// exact manager match first, then an entry whose manager is unset or
/// unknown, then the first candidate as last resort. This is a
/// heuristic, not a key - two funds sharing a name with neither
/// manager set are indistinguishable.
pub fn resolve_match<'a>(candidates: &'a [Fund], manager: Option<&str>) -> Option<&'a Fund> {
    match candidates {
        [] => None,
        [only] => Some(only),
        several => {
            if let Some(manager) = manager {
                if let Some(exact) = several
                    .iter()
                    .find(|f| f.manager.as_deref() == Some(manager))
                {
                    return Some(exact);
                }
            }
            if let Some(unset) = several.iter().find(|f| f.manager_is_unset()) {
                return Some(unset);
            }
            several.first()
        }
    }
}

/// Reconciles normalized drafts against a fund store.
pub struct Reconciler<'a> {
    store: &'a dyn FundStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn FundStore) -> Self {
        Self { store }
    }

    /// Inserts the draft as a new entry, or partially updates the
    /// matched existing entry. Insert allocates fresh identity; update
    /// never changes it.
    pub async fn upsert(&self, draft: FundDraft) -> Result<UpsertOutcome> {
        let candidates = self.store.find_by_name(&draft.name)?;
        let manager = if draft.manager_is_unset() {
            None
        } else {
            draft.manager.as_deref()
        };

        match resolve_match(&candidates, manager) {
            Some(existing) => {
                debug!("Updating fund '{}' (id {})", draft.name, existing.id);
                let id = existing.id.clone();
                self.store.update(&id, &draft).await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                debug!("Inserting new fund '{}'", draft.name);
                let fund = draft.into_new_fund();
                self.store.insert(&fund).await?;
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funds::FundDraft;

    fn fund(id: &str, name: &str, manager: Option<&str>) -> Fund {
        FundDraft {
            record_id: format!("rec-{}", id),
            name: name.to_string(),
            manager: manager.map(|m| m.to_string()),
            source_table: "main".to_string(),
            ..Default::default()
        }
        .into_new_fund()
    }

    #[test]
    fn single_candidate_always_wins() {
        let candidates = vec![fund("1", "甲基金", Some("张鹏"))];
        let matched = resolve_match(&candidates, Some("彭思宇")).unwrap();
        assert_eq!(matched.manager.as_deref(), Some("张鹏"));
    }

    #[test]
    fn prefers_exact_manager_match() {
        let candidates = vec![
            fund("1", "甲基金", Some("张鹏")),
            fund("2", "甲基金", Some("彭思宇")),
        ];
        let matched = resolve_match(&candidates, Some("彭思宇")).unwrap();
        assert_eq!(matched.manager.as_deref(), Some("彭思宇"));
    }

    #[test]
    fn falls_back_to_unset_manager() {
        let candidates = vec![
            fund("1", "甲基金", Some("张鹏")),
            fund("2", "甲基金", Some("未知")),
        ];
        let matched = resolve_match(&candidates, Some("彭思宇")).unwrap();
        assert!(matched.manager_is_unset());
    }

    #[test]
    fn last_resort_is_first_candidate() {
        let candidates = vec![
            fund("1", "甲基金", Some("张鹏")),
            fund("2", "甲基金", Some("李雷")),
        ];
        let matched = resolve_match(&candidates, Some("彭思宇")).unwrap();
        assert_eq!(matched.manager.as_deref(), Some("张鹏"));
    }

    #[test]
    fn no_candidates_means_insert() {
        assert!(resolve_match(&[], Some("张鹏")).is_none());
    }
}
