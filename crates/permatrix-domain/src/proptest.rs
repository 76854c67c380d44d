//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Administrator supremacy and the default policy
//! - The view dependency on deliberately dirty data
//! - OR-requirements behaving as a disjunction
//! - Capability queries agreeing with the evaluator
//! - The ownership veto

use crate::capability::Capabilities;
use crate::engine::{evaluate, evaluate_triple};
use crate::invariants::{find_violations, validate};
use crate::model::{Grant, Matrix, PagePolicy, PermissionNode, RolePolicy};
use crate::ownership::{OwnershipContext, OwnershipGuard};
use crate::roles::{Role, RoleNormalizer};
use permatrix_types::{Requirement, Triple};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

const ROLE_KEYS: &[&str] = &["Guest", "Staff", "staff", "Supervisor", "Dispatcher"];
const PAGES: &[&str] = &["dockets", "customers", "timesheets", "jobForms"];
const TABS: &[&str] = &["list", "detail", "forms", "designTool"];
const ACTIONS: &[&str] = &["view", "create", "edit", "delete", "print", "approve", "submit"];

fn arb_grant() -> impl Strategy<Value = Grant> {
    prop_oneof![
        Just(Grant::Allowed),
        Just(Grant::Denied),
        Just(Grant::Unspecified),
    ]
}

fn arb_node() -> impl Strategy<Value = PermissionNode> {
    prop::collection::btree_map(prop::sample::select(ACTIONS), arb_grant(), 0..5).prop_map(
        |actions| PermissionNode {
            actions: actions
                .into_iter()
                .map(|(a, g)| (a.to_string(), g))
                .collect(),
        },
    )
}

fn arb_page_policy() -> impl Strategy<Value = PagePolicy> {
    prop::collection::btree_map(prop::sample::select(TABS), arb_node(), 0..3).prop_map(|tabs| {
        PagePolicy {
            tabs: tabs.into_iter().map(|(t, n)| (t.to_string(), n)).collect(),
        }
    })
}

fn arb_role_policy() -> impl Strategy<Value = RolePolicy> {
    prop::collection::btree_map(prop::sample::select(PAGES), arb_page_policy(), 0..3).prop_map(
        |pages| RolePolicy {
            pages: pages.into_iter().map(|(p, pp)| (p.to_string(), pp)).collect(),
        },
    )
}

fn arb_matrix() -> impl Strategy<Value = Matrix> {
    prop::collection::btree_map(prop::sample::select(ROLE_KEYS), arb_role_policy(), 0..4)
        .prop_map(|roles| Matrix {
            roles: roles
                .into_iter()
                .map(|(r, p)| (r.to_string(), p))
                .collect::<BTreeMap<_, _>>(),
        })
}

/// Canonical roles the evaluator may see, including an unconfigured one.
fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::guest()),
        Just(Role::new("Staff")),
        Just(Role::new("Supervisor")),
        Just(Role::new("Dispatcher")),
        Just(Role::new("UnknownNewRole")),
        Just(Role::administrator()),
    ]
}

fn arb_non_bypass_role() -> impl Strategy<Value = Role> {
    arb_role().prop_filter("bypass role", |r| !r.is_bypass())
}

fn arb_triple() -> impl Strategy<Value = Triple> {
    (
        prop::sample::select(PAGES),
        prop::sample::select(TABS),
        prop::sample::select(ACTIONS),
    )
        .prop_map(|(p, t, a)| Triple::new(p, t, a))
}

fn arb_requirement() -> impl Strategy<Value = Requirement> {
    prop_oneof![
        arb_triple().prop_map(Requirement::Single),
        prop::collection::vec(arb_triple(), 0..4).prop_map(Requirement::any_of),
    ]
}

/// Raw identity strings, including junk the normalizer must map to `Guest`.
fn arb_raw_role() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("user".to_string())),
        Just(Some("MANAGER".to_string())),
        Just(Some("guest".to_string())),
        prop::string::string_regex("[A-Za-z ]{0,12}")
            .unwrap()
            .prop_map(Some),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn bypass_role_always_allowed(matrix in arb_matrix(), req in arb_requirement()) {
        prop_assert!(evaluate(&matrix, &Role::administrator(), &req));
    }

    #[test]
    fn hidden_tab_grants_nothing_even_when_dirty(
        matrix in arb_matrix(),
        role in arb_non_bypass_role(),
        triple in arb_triple(),
        view in prop_oneof![Just(Grant::Denied), Just(Grant::Unspecified)],
    ) {
        prop_assume!(triple.action != "view");
        let mut matrix = matrix;
        let mut node = PermissionNode::new();
        node.actions.insert("view".to_string(), view);
        node.actions.insert(triple.action.clone(), Grant::Allowed);
        // Write under the role's exact spelling so the lookup cannot pick another key.
        matrix.roles.retain(|key, _| !role.matches_key(key));
        matrix.set_node(role.as_str(), &triple.page, &triple.tab, node);

        prop_assert!(!evaluate(&matrix, &role, &Requirement::Single(triple)));
    }

    #[test]
    fn empty_matrix_allows_everyone_but_guest(
        raw in arb_raw_role(),
        page in "[a-z]{1,8}",
        tab in "[a-z]{1,8}",
    ) {
        let role = RoleNormalizer::standard().normalize(raw.as_deref());
        let req = Requirement::single(page, tab, "view");
        prop_assert_eq!(evaluate(&Matrix::new(), &role, &req), !role.is_guest());
    }

    #[test]
    fn or_requirement_is_disjunction(
        matrix in arb_matrix(),
        role in arb_role(),
        t1 in arb_triple(),
        t2 in arb_triple(),
    ) {
        let either = Requirement::any_of(vec![t1.clone(), t2.clone()]);
        let expected = evaluate(&matrix, &role, &Requirement::Single(t1))
            || evaluate(&matrix, &role, &Requirement::Single(t2));
        prop_assert_eq!(evaluate(&matrix, &role, &either), expected);
    }

    #[test]
    fn capability_mirror_matches_evaluator(
        matrix in arb_matrix(),
        role in arb_role(),
        triple in arb_triple(),
    ) {
        let guard = OwnershipGuard::default();
        let caps = Capabilities::new(&matrix, &guard);
        let gate = evaluate(&matrix, &role, &Requirement::Single(triple.clone()));
        prop_assert_eq!(
            caps.action_allowed(&role, &triple.page, &triple.tab, &triple.action, None),
            gate
        );
        prop_assert_eq!(
            caps.tab_visible(&role, &triple.page, &triple.tab),
            evaluate_triple(&matrix, &role, &Triple::new(&triple.page, &triple.tab, "view"))
        );
    }

    #[test]
    fn visible_page_has_a_visible_tab_when_configured(matrix in arb_matrix(), role in arb_role()) {
        let guard = OwnershipGuard::default();
        let caps = Capabilities::new(&matrix, &guard);
        for listed in caps.visible_pages(&role) {
            prop_assert!(caps.page_visible(&role, &listed.page));
        }
    }

    #[test]
    fn ownership_veto_for_self_scoped_role(
        subject in "[a-c]",
        owner in "[a-c]",
    ) {
        let matrix = Matrix::new().with_node(
            "Staff",
            "timesheets",
            "list",
            PermissionNode::from_pairs(&[("view", true), ("edit", true)]),
        );
        let guard = OwnershipGuard::new().with_self_scoped("timesheets", Role::new("Staff"));
        let caps = Capabilities::new(&matrix, &guard);
        let ctx = OwnershipContext::new("timesheets", Some(subject.as_str()), &owner);
        prop_assert_eq!(
            caps.action_allowed(&Role::new("Staff"), "timesheets", "list", "edit", Some(&ctx)),
            subject == owner
        );
    }

    #[test]
    fn clean_matrices_evaluate_as_stored(matrix in arb_matrix(), triple in arb_triple()) {
        prop_assume!(validate(&matrix).is_ok());
        for (key, policy) in &matrix.roles {
            // Skip keys shadowed by another spelling of the same role.
            let role = Role::new(key);
            if matrix.role_policy(&role) != Some(policy) {
                continue;
            }
            if let Some(node) = policy.node(&triple.page, &triple.tab) {
                let req = Requirement::Single(triple.clone());
                prop_assert_eq!(
                    evaluate(&matrix, &role, &req),
                    node.stored(&triple.action).is_allowed()
                );
            }
        }
    }

    #[test]
    fn serialized_matrix_reads_back_equal(matrix in arb_matrix()) {
        prop_assert_eq!(Matrix::from_json(&matrix.to_json()), matrix);
    }

    #[test]
    fn violations_are_exactly_the_dirty_grants(matrix in arb_matrix()) {
        let expected = matrix
            .roles
            .values()
            .flat_map(|r| r.pages.values())
            .flat_map(|p| p.tabs.values())
            .map(|n| {
                if n.view().is_allowed() {
                    0
                } else {
                    n.actions
                        .iter()
                        .filter(|(a, g)| a.as_str() != "view" && g.is_allowed())
                        .count()
                }
            })
            .sum::<usize>();
        prop_assert_eq!(find_violations(&matrix).len(), expected);
    }
}
