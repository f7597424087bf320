//! One-to-one pairing state for an editing session.
//!
//! The session owns the claims `registry_id -> unique_key` and the reverse
//! index of claimed targets. Every mutation goes through [`PairingSession::propose`]
//! or [`PairingSession::restore`]; both keep the mapping injective.

use std::collections::{BTreeMap, HashMap, HashSet};

use recon_model::{PairingStatus, SurveyRecord};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{PairingError, Result};
use crate::mapper::{RegistryTable, SurveyTable};

/// Effect of a successful [`PairingSession::propose`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposeOutcome {
    /// A new target was claimed; `previous` is the released target, if any.
    Claimed { previous: Option<String> },
    /// The claim was removed.
    Cleared { previous: String },
    /// The call matched the current state.
    Unchanged,
}

/// Summary counts for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairingSummary {
    pub registry_total: usize,
    pub paired: usize,
    pub pending: usize,
    pub survey_total: usize,
    pub claimed: usize,
    pub unclaimed: usize,
}

/// What happened while rebuilding claims from history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Claims applied to the session.
    pub restored: usize,
    /// Registry ids whose latest record cleared the claim.
    pub cleared: usize,
    /// Latest records naming a registry id that is not loaded.
    pub unknown_registry: Vec<String>,
    /// Latest records naming a survey key that is not loaded.
    pub unknown_survey: Vec<String>,
    /// Older claims released because a newer record claimed the same target.
    pub superseded: usize,
}

/// Pairing state between the loaded registry and survey tables.
#[derive(Debug, Clone, Default)]
pub struct PairingSession {
    registry_ids: HashSet<String>,
    survey_keys: HashSet<String>,
    /// registry_id -> unique_key
    claims: BTreeMap<String, String>,
    /// unique_key -> registry_id
    claimed: HashMap<String, String>,
}

impl PairingSession {
    /// Create an empty session over the given identifiers.
    pub fn new<R, S>(registry_ids: R, survey_keys: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            registry_ids: registry_ids.into_iter().map(Into::into).collect(),
            survey_keys: survey_keys.into_iter().map(Into::into).collect(),
            claims: BTreeMap::new(),
            claimed: HashMap::new(),
        }
    }

    /// Create an empty session over two mapped tables.
    pub fn for_tables(registry: &RegistryTable, survey: &SurveyTable) -> Self {
        Self::new(registry.ids(), survey.keys())
    }

    /// Set or clear the claim of one registry row.
    ///
    /// Claiming a target held by a different registry row fails with
    /// [`PairingError::TargetClaimed`] and leaves the session untouched.
    /// Re-proposing the current claim is a no-op.
    pub fn propose(&mut self, registry_id: &str, unique_key: Option<&str>) -> Result<ProposeOutcome> {
        if !self.registry_ids.contains(registry_id) {
            return Err(PairingError::UnknownRegistryId(registry_id.to_string()));
        }

        let Some(key) = unique_key else {
            return Ok(match self.release(registry_id) {
                Some(previous) => {
                    debug!(registry_id, "claim cleared");
                    ProposeOutcome::Cleared { previous }
                }
                None => ProposeOutcome::Unchanged,
            });
        };

        if !self.survey_keys.contains(key) {
            return Err(PairingError::UnknownSurveyKey(key.to_string()));
        }
        match self.claimed.get(key) {
            Some(holder) if holder == registry_id => return Ok(ProposeOutcome::Unchanged),
            Some(holder) => {
                return Err(PairingError::TargetClaimed {
                    key: key.to_string(),
                    holder: holder.clone(),
                });
            }
            None => {}
        }

        let previous = self.release(registry_id);
        self.claims.insert(registry_id.to_string(), key.to_string());
        self.claimed.insert(key.to_string(), registry_id.to_string());
        debug!(registry_id, "claim set");
        Ok(ProposeOutcome::Claimed { previous })
    }

    fn release(&mut self, registry_id: &str) -> Option<String> {
        let previous = self.claims.remove(registry_id)?;
        self.claimed.remove(&previous);
        Some(previous)
    }

    /// Survey rows the operator may pick for `registry_id`.
    ///
    /// The row currently claimed by `registry_id` comes first and is returned
    /// even when the filters exclude it. The rest are unclaimed rows, in
    /// table order, whose rendered text contains both filters
    /// (case-insensitive; empty filters match everything).
    pub fn available_targets<'a>(
        &self,
        survey: &'a SurveyTable,
        registry_id: &str,
        text_filter: &str,
        global_filter: &str,
    ) -> Vec<&'a SurveyRecord> {
        let text_filter = text_filter.trim().to_lowercase();
        let global_filter = global_filter.trim().to_lowercase();
        let current = self.claim_of(registry_id);

        let mut targets = Vec::new();
        if let Some(record) = current.and_then(|key| survey.record(key)) {
            targets.push(record);
        }
        targets.extend(survey.records.iter().filter(|record| {
            if Some(record.unique_key.as_str()) == current {
                return false;
            }
            if self.claimed.contains_key(&record.unique_key) {
                return false;
            }
            let text = survey.search_text(record.row);
            (text_filter.is_empty() || text.contains(&text_filter))
                && (global_filter.is_empty() || text.contains(&global_filter))
        }));
        targets
    }

    /// Survey rows not claimed by anyone, in table order.
    pub fn unclaimed<'a>(&'a self, survey: &'a SurveyTable) -> impl Iterator<Item = &'a SurveyRecord> {
        survey
            .records
            .iter()
            .filter(|record| !self.claimed.contains_key(&record.unique_key))
    }

    pub fn status(&self, registry_id: &str) -> PairingStatus {
        if self.claims.contains_key(registry_id) {
            PairingStatus::Paired
        } else {
            PairingStatus::Pending
        }
    }

    pub fn claim_of(&self, registry_id: &str) -> Option<&str> {
        self.claims.get(registry_id).map(String::as_str)
    }

    pub fn holder_of(&self, unique_key: &str) -> Option<&str> {
        self.claimed.get(unique_key).map(String::as_str)
    }

    pub fn is_claimed(&self, unique_key: &str) -> bool {
        self.claimed.contains_key(unique_key)
    }

    /// Current claims ordered by registry id.
    pub fn claims(&self) -> impl Iterator<Item = (&str, &str)> {
        self.claims
            .iter()
            .map(|(registry_id, key)| (registry_id.as_str(), key.as_str()))
    }

    pub fn paired_count(&self) -> usize {
        self.claims.len()
    }

    pub fn summary(&self) -> PairingSummary {
        let paired = self.claims.len();
        PairingSummary {
            registry_total: self.registry_ids.len(),
            paired,
            pending: self.registry_ids.len().saturating_sub(paired),
            survey_total: self.survey_keys.len(),
            claimed: self.claimed.len(),
            unclaimed: self.survey_keys.len().saturating_sub(self.claimed.len()),
        }
    }

    /// Replace the claims with those rebuilt from saved history.
    ///
    /// `history` is `(registry_id, unique_key)` in save order, oldest first.
    /// The latest record per registry id wins; an empty key means the claim
    /// was cleared. When two surviving records name the same target, the
    /// more recent one keeps it. Records naming ids or keys that are not
    /// loaded are skipped.
    pub fn restore<'h, I>(&mut self, history: I) -> RestoreReport
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        let mut latest: HashMap<&str, (usize, &str)> = HashMap::new();
        for (seq, (registry_id, key)) in history.into_iter().enumerate() {
            latest.insert(registry_id, (seq, key.trim()));
        }
        let mut ordered: Vec<(usize, &str, &str)> = latest
            .into_iter()
            .map(|(registry_id, (seq, key))| (seq, registry_id, key))
            .collect();
        ordered.sort_by_key(|(seq, _, _)| *seq);

        self.claims.clear();
        self.claimed.clear();
        let mut report = RestoreReport::default();

        for (_, registry_id, key) in ordered {
            if !self.registry_ids.contains(registry_id) {
                warn!(registry_id, "saved claim names an unknown registry id, skipping");
                report.unknown_registry.push(registry_id.to_string());
                continue;
            }
            if key.is_empty() {
                report.cleared += 1;
                continue;
            }
            if !self.survey_keys.contains(key) {
                warn!(registry_id, "saved claim names an unknown survey key, skipping");
                report.unknown_survey.push(key.to_string());
                continue;
            }
            if let Some(holder) = self.claimed.get(key).cloned() {
                self.release(&holder);
                report.superseded += 1;
                report.restored -= 1;
            }
            self.claims.insert(registry_id.to_string(), key.to_string());
            self.claimed.insert(key.to_string(), registry_id.to_string());
            report.restored += 1;
        }

        debug!(
            restored = report.restored,
            cleared = report.cleared,
            superseded = report.superseded,
            "session restored"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PairingSession {
        PairingSession::new(["A-1", "A-2", "A-3"], ["X-01", "X-02", "Y"])
    }

    #[test]
    fn test_propose_and_clear() {
        let mut session = session();
        assert_eq!(
            session.propose("A-1", Some("X-01")).unwrap(),
            ProposeOutcome::Claimed { previous: None }
        );
        assert_eq!(session.status("A-1"), PairingStatus::Paired);
        assert_eq!(session.holder_of("X-01"), Some("A-1"));

        assert_eq!(
            session.propose("A-1", None).unwrap(),
            ProposeOutcome::Cleared {
                previous: "X-01".to_string()
            }
        );
        assert_eq!(session.status("A-1"), PairingStatus::Pending);
        assert!(!session.is_claimed("X-01"));
        assert_eq!(session.propose("A-1", None).unwrap(), ProposeOutcome::Unchanged);
    }

    #[test]
    fn test_change_claim_releases_old_target() {
        let mut session = session();
        session.propose("A-1", Some("X-01")).unwrap();
        let outcome = session.propose("A-1", Some("Y")).unwrap();
        assert_eq!(
            outcome,
            ProposeOutcome::Claimed {
                previous: Some("X-01".to_string())
            }
        );
        assert!(!session.is_claimed("X-01"));
        assert_eq!(session.claim_of("A-1"), Some("Y"));
    }

    #[test]
    fn test_conflicting_claim_is_rejected() {
        let mut session = session();
        session.propose("A-1", Some("X-01")).unwrap();
        let err = session.propose("A-2", Some("X-01")).unwrap_err();
        assert_eq!(
            err,
            PairingError::TargetClaimed {
                key: "X-01".to_string(),
                holder: "A-1".to_string()
            }
        );
        assert_eq!(session.holder_of("X-01"), Some("A-1"));
        assert_eq!(session.status("A-2"), PairingStatus::Pending);
    }

    #[test]
    fn test_re_proposal_is_idempotent() {
        let mut session = session();
        session.propose("A-1", Some("Y")).unwrap();
        assert_eq!(
            session.propose("A-1", Some("Y")).unwrap(),
            ProposeOutcome::Unchanged
        );
        assert_eq!(session.paired_count(), 1);
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut session = session();
        assert!(matches!(
            session.propose("Z", Some("Y")),
            Err(PairingError::UnknownRegistryId(_))
        ));
        assert!(matches!(
            session.propose("A-1", Some("nope")),
            Err(PairingError::UnknownSurveyKey(_))
        ));
    }

    #[test]
    fn test_summary_counts() {
        let mut session = session();
        session.propose("A-1", Some("Y")).unwrap();
        let summary = session.summary();
        assert_eq!(summary.registry_total, 3);
        assert_eq!(summary.paired, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.claimed, 1);
        assert_eq!(summary.unclaimed, 2);
    }

    #[test]
    fn test_restore_latest_record_wins() {
        let mut session = session();
        let report = session.restore([
            ("A-1", "X-01"),
            ("A-2", "Y"),
            ("A-1", "X-02"),
            ("A-2", ""),
        ]);
        assert_eq!(session.claim_of("A-1"), Some("X-02"));
        assert_eq!(session.status("A-2"), PairingStatus::Pending);
        assert_eq!(report.restored, 1);
        assert_eq!(report.cleared, 1);
    }

    #[test]
    fn test_restore_newer_claim_takes_target() {
        let mut session = session();
        let report = session.restore([("A-1", "Y"), ("A-2", "Y")]);
        assert_eq!(session.holder_of("Y"), Some("A-2"));
        assert_eq!(session.status("A-1"), PairingStatus::Pending);
        assert_eq!(report.superseded, 1);
        assert_eq!(report.restored, 1);
    }

    #[test]
    fn test_restore_skips_unknown_rows() {
        let mut session = session();
        let report = session.restore([("A-1", "GONE"), ("OLD", "Y"), ("A-3", "Y")]);
        assert_eq!(report.unknown_survey, vec!["GONE".to_string()]);
        assert_eq!(report.unknown_registry, vec!["OLD".to_string()]);
        assert_eq!(session.claim_of("A-3"), Some("Y"));
        assert_eq!(session.claim_of("A-1"), None);
    }

    #[test]
    fn test_restore_replaces_current_claims() {
        let mut session = session();
        session.propose("A-3", Some("X-02")).unwrap();
        session.restore([("A-1", "Y")]);
        assert_eq!(session.claim_of("A-3"), None);
        assert!(!session.is_claimed("X-02"));
    }
}
