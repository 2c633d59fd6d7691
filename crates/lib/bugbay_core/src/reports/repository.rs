//! In-memory report repository.
//!
//! Owns all report state plus the global audit log behind one `RwLock`.
//! Every mutation takes the write lock for its full check-then-commit
//! unit, so id allocation, title-uniqueness checks, and the
//! diff/apply/audit sequence are each atomic. Reads clone under the read
//! lock; callers only ever see defensive copies.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use super::{ReportError, audit, pagination::EntryPage, pagination::SortOrder, rules};
use crate::models::auth::Identity;
use crate::models::report::{Attachment, AuditRecord, Entry, NewReport, Report, ReportPatch};

/// One page of entries plus the total count before slicing.
#[derive(Debug, Clone)]
pub struct EntrySlice {
    pub entries: Vec<Entry>,
    pub total: usize,
}

#[derive(Debug)]
struct StoreState {
    reports: BTreeMap<u64, Report>,
    /// Strictly increasing, never reused after delete.
    next_id: u64,
    /// Global append-only audit log.
    audit: Vec<AuditRecord>,
}

/// Lock-guarded report store.
#[derive(Debug)]
pub struct ReportRepository {
    inner: RwLock<StoreState>,
}

impl Default for ReportRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState {
                reports: BTreeMap::new(),
                next_id: 1,
                audit: Vec::new(),
            }),
        }
    }

    /// Create a report. Id allocation and the title-uniqueness check
    /// commit as one atomic step under the write lock.
    pub fn create(&self, new: NewReport) -> Result<Report, ReportError> {
        let title = non_empty(&new.title, "title")?;
        let description = non_empty(&new.description, "description")?;

        let mut state = self.inner.write().expect("repository lock poisoned");
        if title_taken(&state, &title, None) {
            return Err(ReportError::Conflict(format!(
                "a report titled '{title}' already exists"
            )));
        }
        let id = state.next_id;
        state.next_id += 1;
        let now = Utc::now();
        let report = Report {
            id,
            title,
            description,
            severity: new.severity.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            entries: Vec::new(),
            attachments: Vec::new(),
            next_entry_id: 1,
        };
        state.reports.insert(id, report.clone());
        Ok(report)
    }

    /// Fetch one report as a defensive clone.
    pub fn get(&self, id: u64) -> Option<Report> {
        let state = self.inner.read().expect("repository lock poisoned");
        state.reports.get(&id).cloned()
    }

    /// All reports, ordered by id.
    pub fn list(&self) -> Vec<Report> {
        let state = self.inner.read().expect("repository lock poisoned");
        state.reports.values().cloned().collect()
    }

    /// Case-insensitive title existence check, optionally excluding one
    /// report (the one being updated).
    pub fn title_exists(&self, title: &str, exclude_id: Option<u64>) -> bool {
        let state = self.inner.read().expect("repository lock poisoned");
        title_taken(&state, title, exclude_id)
    }

    /// Apply a partial update on behalf of `actor`.
    ///
    /// Runs the severity-escalation rule against the *currently stored*
    /// severity, computes the field diff, and either returns the report
    /// unchanged (empty diff — no audit record, `updated_at` untouched)
    /// or applies every change, bumps `updated_at`, and appends exactly
    /// one audit record. The whole sequence holds the write lock.
    pub fn update(
        &self,
        id: u64,
        patch: ReportPatch,
        actor: &Identity,
    ) -> Result<(Report, Option<AuditRecord>), ReportError> {
        let patch = validate_patch(patch)?;

        let mut state = self.inner.write().expect("repository lock poisoned");

        let current = state
            .reports
            .get(&id)
            .ok_or_else(|| ReportError::NotFound(format!("report {id}")))?
            .clone();

        if let Some(incoming) = patch.severity {
            rules::check_severity_escalation(current.severity, incoming, actor.role)?;
        }
        if let Some(title) = &patch.title
            && title_taken(&state, title, Some(id))
        {
            return Err(ReportError::Conflict(format!(
                "a report titled '{title}' already exists"
            )));
        }

        let changes = audit::diff_fields(&current, &patch);
        if changes.is_empty() {
            return Ok((current, None));
        }

        let record = AuditRecord {
            report_id: id,
            user_id: actor.id.clone(),
            changes,
            timestamp: Utc::now(),
        };

        let report = state
            .reports
            .get_mut(&id)
            .ok_or_else(|| ReportError::NotFound(format!("report {id}")))?;
        if let Some(title) = patch.title {
            report.title = title;
        }
        if let Some(description) = patch.description {
            report.description = description;
        }
        if let Some(severity) = patch.severity {
            report.severity = severity;
        }
        report.updated_at = record.timestamp;
        let report = report.clone();
        state.audit.push(record.clone());
        Ok((report, Some(record)))
    }

    /// Hard-delete a report, returning it so the caller can clean up
    /// stored attachment bytes. The id is never reused.
    pub fn delete(&self, id: u64) -> Result<Report, ReportError> {
        let mut state = self.inner.write().expect("repository lock poisoned");
        state
            .reports
            .remove(&id)
            .ok_or_else(|| ReportError::NotFound(format!("report {id}")))
    }

    /// Append a comment entry. Entry ids increase per report and are
    /// never reused.
    pub fn add_entry(
        &self,
        report_id: u64,
        author: &str,
        comment: &str,
    ) -> Result<Entry, ReportError> {
        let comment = non_empty(comment, "comment")?;
        let mut state = self.inner.write().expect("repository lock poisoned");
        let report = state
            .reports
            .get_mut(&report_id)
            .ok_or_else(|| ReportError::NotFound(format!("report {report_id}")))?;
        let entry = Entry {
            id: report.next_entry_id,
            author: author.to_string(),
            comment,
            created_at: Utc::now(),
        };
        report.next_entry_id += 1;
        report.entries.push(entry.clone());
        Ok(entry)
    }

    /// Append attachment metadata. Fails with `NotFound` if the report
    /// vanished, in which case the caller must roll back stored bytes.
    pub fn add_attachment(&self, report_id: u64, attachment: Attachment) -> Result<(), ReportError> {
        let mut state = self.inner.write().expect("repository lock poisoned");
        let report = state
            .reports
            .get_mut(&report_id)
            .ok_or_else(|| ReportError::NotFound(format!("report {report_id}")))?;
        report.attachments.push(attachment);
        Ok(())
    }

    /// One page of a report's entries, sorted by `created_at` in the
    /// requested order (ties broken by entry id) before slicing.
    pub fn entries_page(&self, report_id: u64, page: &EntryPage) -> Result<EntrySlice, ReportError> {
        let state = self.inner.read().expect("repository lock poisoned");
        let report = state
            .reports
            .get(&report_id)
            .ok_or_else(|| ReportError::NotFound(format!("report {report_id}")))?;

        let mut entries = report.entries.clone();
        entries.sort_by(|a, b| {
            let ord = a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id));
            match page.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        let total = entries.len();
        let start = (page.page - 1).saturating_mul(page.page_size);
        let entries = entries
            .into_iter()
            .skip(start as usize)
            .take(page.page_size as usize)
            .collect();
        Ok(EntrySlice { entries, total })
    }

    /// Audit records for one report, oldest first.
    pub fn audit_for_report(&self, report_id: u64) -> Vec<AuditRecord> {
        let state = self.inner.read().expect("repository lock poisoned");
        state
            .audit
            .iter()
            .filter(|r| r.report_id == report_id)
            .cloned()
            .collect()
    }
}

fn title_taken(state: &StoreState, title: &str, exclude_id: Option<u64>) -> bool {
    let needle = title.to_lowercase();
    state
        .reports
        .values()
        .any(|r| Some(r.id) != exclude_id && r.title.to_lowercase() == needle)
}

fn non_empty(value: &str, field: &str) -> Result<String, ReportError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReportError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_patch(patch: ReportPatch) -> Result<ReportPatch, ReportError> {
    Ok(ReportPatch {
        title: patch.title.as_deref().map(|t| non_empty(t, "title")).transpose()?,
        description: patch
            .description
            .as_deref()
            .map(|d| non_empty(d, "description"))
            .transpose()?,
        severity: patch.severity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use crate::models::report::Severity;
    use crate::reports::pagination::parse_entry_page;
    use std::sync::Arc;

    fn admin() -> Identity {
        Identity {
            id: "admin".into(),
            role: Role::Admin,
        }
    }

    fn developer() -> Identity {
        Identity {
            id: "dev".into(),
            role: Role::Developer,
        }
    }

    fn new_report(title: &str) -> NewReport {
        NewReport {
            title: title.into(),
            description: "something broke".into(),
            severity: None,
        }
    }

    #[test]
    fn ids_are_strictly_increasing_even_across_deletes() {
        let repo = ReportRepository::new();
        let a = repo.create(new_report("a")).expect("create");
        let b = repo.create(new_report("b")).expect("create");
        assert_eq!((a.id, b.id), (1, 2));

        repo.delete(b.id).expect("delete");
        let c = repo.create(new_report("c")).expect("create");
        assert_eq!(c.id, 3);
    }

    #[test]
    fn titles_are_unique_case_insensitively() {
        let repo = ReportRepository::new();
        repo.create(new_report("Login Broken")).expect("create");
        let err = repo.create(new_report("login broken")).unwrap_err();
        assert!(matches!(err, ReportError::Conflict(_)));
    }

    #[test]
    fn update_may_keep_own_title() {
        let repo = ReportRepository::new();
        let report = repo.create(new_report("Login Broken")).expect("create");
        let patch = ReportPatch {
            title: Some("Login Broken".into()),
            description: Some("now with details".into()),
            severity: None,
        };
        repo.update(report.id, patch, &admin()).expect("update");
    }

    #[test]
    fn empty_title_is_rejected() {
        let repo = ReportRepository::new();
        let err = repo.create(new_report("   ")).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
    }

    #[test]
    fn identical_update_is_a_no_op() {
        let repo = ReportRepository::new();
        let report = repo.create(new_report("a")).expect("create");
        let patch = ReportPatch {
            title: Some("a".into()),
            description: Some("something broke".into()),
            severity: Some(Severity::Low),
        };
        let (updated, record) = repo.update(report.id, patch, &admin()).expect("update");
        assert!(record.is_none());
        assert_eq!(updated.updated_at, report.updated_at);
        assert!(repo.audit_for_report(report.id).is_empty());
    }

    #[test]
    fn effective_update_appends_one_audit_record_and_bumps_updated_at() {
        let repo = ReportRepository::new();
        let report = repo.create(new_report("a")).expect("create");
        let patch = ReportPatch {
            severity: Some(Severity::High),
            ..Default::default()
        };
        let (updated, record) = repo.update(report.id, patch, &developer()).expect("update");
        assert_eq!(updated.severity, Severity::High);
        assert!(updated.updated_at >= report.updated_at);

        let record = record.expect("audit record");
        assert_eq!(record.user_id, "dev");
        assert_eq!(record.changes.keys().collect::<Vec<_>>(), vec!["severity"]);
        assert_eq!(repo.audit_for_report(report.id).len(), 1);
    }

    #[test]
    fn developer_cannot_escalate_but_admin_can() {
        let repo = ReportRepository::new();
        let report = repo.create(new_report("a")).expect("create");
        let patch = ReportPatch {
            severity: Some(Severity::Critical),
            ..Default::default()
        };

        let err = repo
            .update(report.id, patch.clone(), &developer())
            .unwrap_err();
        assert!(matches!(err, ReportError::Forbidden(_)));
        assert!(repo.audit_for_report(report.id).is_empty());

        let (updated, record) = repo.update(report.id, patch, &admin()).expect("update");
        assert_eq!(updated.severity, Severity::Critical);
        assert_eq!(record.expect("record").changes.len(), 1);
    }

    #[test]
    fn resubmitting_critical_passes_without_audit() {
        let repo = ReportRepository::new();
        let report = repo
            .create(NewReport {
                title: "a".into(),
                description: "d".into(),
                severity: Some(Severity::Critical),
            })
            .expect("create");
        let patch = ReportPatch {
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        let (_, record) = repo.update(report.id, patch, &developer()).expect("update");
        assert!(record.is_none());
        assert!(repo.audit_for_report(report.id).is_empty());
    }

    #[test]
    fn entry_ids_increase_within_a_report() {
        let repo = ReportRepository::new();
        let report = repo.create(new_report("a")).expect("create");
        let e1 = repo.add_entry(report.id, "dev", "first").expect("entry");
        let e2 = repo.add_entry(report.id, "dev", "second").expect("entry");
        assert_eq!((e1.id, e2.id), (1, 2));
    }

    #[test]
    fn entries_page_sorts_then_slices() {
        let repo = ReportRepository::new();
        let report = repo.create(new_report("a")).expect("create");
        for i in 0..5 {
            repo.add_entry(report.id, "dev", &format!("comment {i}"))
                .expect("entry");
        }

        let page = parse_entry_page(Some("1"), Some("2"), Some("desc")).expect("page");
        let slice = repo.entries_page(report.id, &page).expect("slice");
        assert_eq!(slice.total, 5);
        assert_eq!(slice.entries.len(), 2);
        // Newest first under desc; created_at ties broken by id.
        assert!(slice.entries[0].id > slice.entries[1].id);

        let page = parse_entry_page(Some("3"), Some("2"), Some("asc")).expect("page");
        let slice = repo.entries_page(report.id, &page).expect("slice");
        assert_eq!(slice.entries.len(), 1);
        assert_eq!(slice.entries[0].id, 5);
    }

    #[test]
    fn returned_reports_are_defensive_copies() {
        let repo = ReportRepository::new();
        let mut report = repo.create(new_report("a")).expect("create");
        report.title = "mutated".into();
        report.entries.push(Entry {
            id: 99,
            author: "x".into(),
            comment: "y".into(),
            created_at: Utc::now(),
        });
        let stored = repo.get(report.id).expect("get");
        assert_eq!(stored.title, "a");
        assert!(stored.entries.is_empty());
    }

    #[test]
    fn concurrent_same_title_creates_yield_one_conflict() {
        let repo = Arc::new(ReportRepository::new());
        let mut handles = Vec::new();
        for _ in 0..2 {
            let repo = Arc::clone(&repo);
            handles.push(std::thread::spawn(move || {
                repo.create(new_report("duplicate"))
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(ReportError::Conflict(_))))
            .count();
        assert_eq!((successes, conflicts), (1, 1));
    }

    #[test]
    fn concurrent_creates_never_share_an_id() {
        let repo = Arc::new(ReportRepository::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(std::thread::spawn(move || {
                repo.create(new_report(&format!("report {i}"))).map(|r| r.id)
            }));
        }
        let mut ids: Vec<u64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().expect("create"))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
