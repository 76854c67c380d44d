use crate::model::Matrix;
use crate::roles::Role;
use permatrix_types::{Requirement, Triple};

/// Evaluate `requirement` for `role` against a matrix snapshot.
///
/// Order of resolution:
/// 1) bypass role: allow, matrix never consulted
/// 2) role absent from the matrix: default policy
/// 3) page or tab absent under the role: default policy
/// 4) node present: the node decides, with `view` gating every other action
///
/// The default policy denies `Guest` and allows every other role. An OR-requirement
/// is satisfied when any alternative is; an empty OR-list is not.
pub fn evaluate(matrix: &Matrix, role: &Role, requirement: &Requirement) -> bool {
    if role.is_bypass() {
        return true;
    }
    requirement
        .triples()
        .iter()
        .any(|triple| evaluate_triple(matrix, role, triple))
}

pub fn evaluate_triple(matrix: &Matrix, role: &Role, triple: &Triple) -> bool {
    if role.is_bypass() {
        return true;
    }
    let Some(policy) = matrix.role_policy(role) else {
        return default_policy(role);
    };
    match policy.node(&triple.page, &triple.tab) {
        Some(node) => node.grants(&triple.action),
        None => default_policy(role),
    }
}

pub(crate) fn default_policy(role: &Role) -> bool {
    !role.is_guest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PermissionNode;
    use crate::test_support::{guest, staff, supervisor};
    use permatrix_test_util::fixtures;

    fn dockets(action: &str) -> Requirement {
        Requirement::single("dockets", "list", action)
    }

    #[test]
    fn node_present_but_action_missing_denies() {
        let m = Matrix::new().with_node(
            "Staff",
            "dockets",
            "list",
            PermissionNode::from_pairs(&[("view", true)]),
        );
        assert!(evaluate(&m, &staff(), &dockets("view")));
        assert!(!evaluate(&m, &staff(), &dockets("edit")));
    }

    #[test]
    fn unconfigured_non_guest_role_fails_open() {
        let m = Matrix::new();
        let role = Role::new("UnknownNewRole");
        assert!(evaluate(&m, &role, &Requirement::single("anything", "anything", "view")));
        assert!(evaluate(&m, &role, &Requirement::single("anything", "anything", "delete")));
    }

    #[test]
    fn guest_is_denied_without_configuration() {
        let m = Matrix::new();
        assert!(!evaluate(&m, &guest(), &Requirement::single("a", "b", "view")));

        let other_roles_only = Matrix::new().with_node(
            "Staff",
            "a",
            "b",
            PermissionNode::from_pairs(&[("view", true)]),
        );
        assert!(!evaluate(&other_roles_only, &guest(), &Requirement::single("a", "b", "view")));
    }

    #[test]
    fn guest_with_missing_tab_is_denied_other_roles_allowed() {
        let m = Matrix::new()
            .with_node("Guest", "dockets", "list", PermissionNode::from_pairs(&[("view", true)]))
            .with_node("Staff", "dockets", "list", PermissionNode::from_pairs(&[("view", true)]));
        let detail = Requirement::single("dockets", "detail", "view");
        assert!(!evaluate(&m, &guest(), &detail));
        assert!(evaluate(&m, &staff(), &detail));
    }

    #[test]
    fn dirty_node_cannot_grant_without_view() {
        let m = Matrix::from_json(&fixtures::dirty_view_matrix());
        let req = Requirement::single("jobForms", "designTool", "edit");
        assert!(!evaluate(&m, &staff(), &req));
    }

    #[test]
    fn administrator_bypasses_any_matrix() {
        let m = Matrix::new().with_node(
            "Administrator",
            "dockets",
            "list",
            PermissionNode::from_pairs(&[("view", false)]),
        );
        assert!(evaluate(&m, &Role::administrator(), &dockets("delete")));
        assert!(evaluate(&m, &Role::administrator(), &Requirement::any_of(Vec::new())));
    }

    #[test]
    fn or_requirement_allows_through_second_path() {
        let m = Matrix::from_json(&fixtures::platform_matrix());
        let req = Requirement::either(("submissions", "list"), ("jobForms", "forms"), "view");
        // Staff has no submissions page configured as viewable, but jobForms/forms is.
        assert!(!evaluate_triple(&m, &staff(), &req.triples()[0]));
        assert!(evaluate(&m, &staff(), &req));
    }

    #[test]
    fn empty_or_requirement_denies_non_bypass_roles() {
        let m = Matrix::new();
        assert!(!evaluate(&m, &staff(), &Requirement::any_of(Vec::new())));
    }

    #[test]
    fn matrix_role_keys_are_matched_case_insensitively() {
        let m = Matrix::new().with_node(
            "SUPERVISOR",
            "timesheets",
            "list",
            PermissionNode::from_pairs(&[("view", true), ("approve", false)]),
        );
        let req = Requirement::single("timesheets", "list", "approve");
        assert!(!evaluate(&m, &supervisor(), &req));
    }

    #[test]
    fn platform_fixture_scenarios() {
        let m = Matrix::from_json(&fixtures::platform_matrix());
        assert!(evaluate(&m, &staff(), &Requirement::single("timesheets", "list", "edit")));
        assert!(!evaluate(&m, &staff(), &Requirement::single("timesheets", "list", "approve")));
        assert!(evaluate(&m, &supervisor(), &Requirement::single("timesheets", "list", "approve")));
        assert!(!evaluate(&m, &guest(), &Requirement::single("dockets", "list", "view")));
    }
}
