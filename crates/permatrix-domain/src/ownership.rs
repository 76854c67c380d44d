//! Record-level ownership checks, independent of the matrix.
//!
//! Some roles are self-scoped for a resource family: the matrix may grant them an
//! action, yet they may only exercise it on records they own. The guard runs after
//! the matrix check and both must pass.

use crate::roles::Role;
use std::collections::BTreeMap;

/// A record that carries the id of the subject that owns it.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

/// The record a capability query is being asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnershipContext<'a> {
    pub family: &'a str,
    pub subject_id: Option<&'a str>,
    pub owner_id: &'a str,
}

impl<'a> OwnershipContext<'a> {
    pub fn new(family: &'a str, subject_id: Option<&'a str>, owner_id: &'a str) -> Self {
        Self {
            family,
            subject_id,
            owner_id,
        }
    }
}

/// How a list operation must be scoped for a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListScope {
    All,
    OwnedBy(String),
    /// Self-scoped caller without a subject id: owns nothing.
    Nothing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnershipGuard {
    self_scoped: BTreeMap<String, Vec<Role>>,
}

impl OwnershipGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_self_scoped(mut self, family: &str, role: Role) -> Self {
        let roles = self.self_scoped.entry(family.to_string()).or_default();
        if !roles.iter().any(|r| r.matches_key(role.as_str())) {
            roles.push(role);
        }
        self
    }

    pub fn is_self_scoped(&self, family: &str, role: &Role) -> bool {
        self.self_scoped
            .get(family)
            .is_some_and(|roles| roles.iter().any(|r| r.matches_key(role.as_str())))
    }

    pub fn allows_record(
        &self,
        family: &str,
        role: &Role,
        subject_id: Option<&str>,
        record_owner_id: &str,
    ) -> bool {
        if !self.is_self_scoped(family, role) {
            return true;
        }
        subject_id == Some(record_owner_id)
    }

    pub fn list_scope(&self, family: &str, role: &Role, subject_id: Option<&str>) -> ListScope {
        if !self.is_self_scoped(family, role) {
            return ListScope::All;
        }
        match subject_id {
            Some(subject) => ListScope::OwnedBy(subject.to_string()),
            None => ListScope::Nothing,
        }
    }

    /// Apply [`OwnershipGuard::list_scope`] to records already loaded.
    pub fn retain_owned<T: Owned>(
        &self,
        family: &str,
        role: &Role,
        subject_id: Option<&str>,
        mut records: Vec<T>,
    ) -> Vec<T> {
        match self.list_scope(family, role, subject_id) {
            ListScope::All => records,
            ListScope::OwnedBy(subject) => {
                records.retain(|r| r.owner_id() == subject);
                records
            }
            ListScope::Nothing => Vec::new(),
        }
    }

    /// Families with at least one self-scoped role, with those roles.
    pub fn families(&self) -> impl Iterator<Item = (&str, &[Role])> {
        self.self_scoped
            .iter()
            .map(|(family, roles)| (family.as_str(), roles.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self_scoped_timesheets, staff, supervisor};

    struct Timesheet {
        owner: &'static str,
    }

    impl Owned for Timesheet {
        fn owner_id(&self) -> &str {
            self.owner
        }
    }

    #[test]
    fn non_self_scoped_roles_keep_matrix_decision() {
        let guard = self_scoped_timesheets();
        assert!(guard.allows_record("timesheets", &supervisor(), Some("a"), "b"));
        assert!(guard.allows_record("dockets", &staff(), Some("a"), "b"));
    }

    #[test]
    fn self_scoped_roles_only_touch_their_records() {
        let guard = self_scoped_timesheets();
        assert!(guard.allows_record("timesheets", &staff(), Some("a"), "a"));
        assert!(!guard.allows_record("timesheets", &staff(), Some("a"), "b"));
        assert!(!guard.allows_record("timesheets", &staff(), None, "a"));
    }

    #[test]
    fn role_matching_is_case_insensitive() {
        let guard = OwnershipGuard::new().with_self_scoped("timesheets", Role::new("staff"));
        assert!(guard.is_self_scoped("timesheets", &staff()));
    }

    #[test]
    fn list_scope_narrows_self_scoped_roles() {
        let guard = self_scoped_timesheets();
        assert_eq!(guard.list_scope("timesheets", &supervisor(), Some("a")), ListScope::All);
        assert_eq!(
            guard.list_scope("timesheets", &staff(), Some("a")),
            ListScope::OwnedBy("a".to_string())
        );
        assert_eq!(guard.list_scope("timesheets", &staff(), None), ListScope::Nothing);
    }

    #[test]
    fn retain_owned_filters_records() {
        let guard = self_scoped_timesheets();
        let records = vec![
            Timesheet { owner: "a" },
            Timesheet { owner: "b" },
            Timesheet { owner: "a" },
        ];
        let kept = guard.retain_owned("timesheets", &staff(), Some("a"), records);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|t| t.owner == "a"));
    }

    #[test]
    fn duplicate_registrations_collapse() {
        let guard = OwnershipGuard::new()
            .with_self_scoped("timesheets", Role::new("Staff"))
            .with_self_scoped("timesheets", Role::new("STAFF"));
        let (_, roles) = guard.families().next().expect("one family");
        assert_eq!(roles.len(), 1);
    }
}
