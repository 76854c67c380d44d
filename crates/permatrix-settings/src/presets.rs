use permatrix_domain::{Matrix, PermissionNode, Role, RoleNormalizer};
use permatrix_types::ids::*;
use std::collections::BTreeMap;

/// Role table and self-scoped families a preset starts from.
pub(crate) struct Preset {
    pub name: &'static str,
    pub normalizer: RoleNormalizer,
    pub ownership: BTreeMap<String, Vec<Role>>,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything site-specific goes into repo config.
pub(crate) fn preset(name: &str) -> Option<Preset> {
    match name {
        "default" => Some(default_preset()),
        "minimal" => Some(minimal_preset()),
        _ => None,
    }
}

fn default_preset() -> Preset {
    let mut ownership = BTreeMap::new();
    ownership.insert(FAMILY_TIMESHEETS.to_string(), vec![Role::new(ROLE_STAFF)]);
    ownership.insert(FAMILY_SUBMISSIONS.to_string(), vec![Role::new(ROLE_STAFF)]);
    Preset {
        name: "default",
        normalizer: RoleNormalizer::standard(),
        ownership,
    }
}

fn minimal_preset() -> Preset {
    // Only Guest and the bypass role are known; every other raw role is Guest.
    Preset {
        name: "minimal",
        normalizer: RoleNormalizer::new(),
        ownership: BTreeMap::new(),
    }
}

/// Matrix written by seeding when the store holds nothing.
///
/// Guest is configured with hidden tabs so absence of other entries cannot be read
/// as an intentional grant.
pub fn seed_matrix() -> Matrix {
    let hidden = || PermissionNode::from_pairs(&[(ACTION_VIEW, false)]);
    let view = || PermissionNode::from_pairs(&[(ACTION_VIEW, true)]);

    Matrix::new()
        .with_node(ROLE_GUEST, PAGE_DOCKETS, TAB_LIST, hidden())
        .with_node(ROLE_GUEST, PAGE_TIMESHEETS, TAB_LIST, hidden())
        .with_node(ROLE_GUEST, PAGE_SUBMISSIONS, TAB_LIST, hidden())
        .with_node(ROLE_STAFF, PAGE_DOCKETS, TAB_LIST, view().with(ACTION_PRINT, true))
        .with_node(ROLE_STAFF, PAGE_DOCKETS, TAB_DETAIL, view().with(ACTION_EDIT, false))
        .with_node(
            ROLE_STAFF,
            PAGE_TIMESHEETS,
            TAB_LIST,
            view()
                .with(ACTION_CREATE, true)
                .with(ACTION_EDIT, true)
                .with(ACTION_APPROVE, false),
        )
        .with_node(
            ROLE_STAFF,
            PAGE_SUBMISSIONS,
            TAB_LIST,
            view().with(ACTION_SUBMIT, true),
        )
        .with_node(ROLE_STAFF, PAGE_JOB_FORMS, TAB_DESIGN_TOOL, hidden())
        .with_node(
            ROLE_SUPERVISOR,
            PAGE_DOCKETS,
            TAB_LIST,
            view().with(ACTION_CREATE, true).with(ACTION_PRINT, true),
        )
        .with_node(
            ROLE_SUPERVISOR,
            PAGE_DOCKETS,
            TAB_DETAIL,
            view().with(ACTION_EDIT, true).with(ACTION_APPROVE, true),
        )
        .with_node(ROLE_SUPERVISOR, PAGE_CUSTOMERS, TAB_LIST, view())
        .with_node(
            ROLE_SUPERVISOR,
            PAGE_CUSTOMERS,
            TAB_DETAIL,
            view().with(ACTION_EDIT, true),
        )
        .with_node(
            ROLE_SUPERVISOR,
            PAGE_TIMESHEETS,
            TAB_LIST,
            view().with(ACTION_EDIT, true).with(ACTION_APPROVE, true),
        )
        .with_node(
            ROLE_SUPERVISOR,
            PAGE_SUBMISSIONS,
            TAB_LIST,
            view().with(ACTION_SUBMIT, true).with(ACTION_APPROVE, true),
        )
        .with_node(
            ROLE_SUPERVISOR,
            PAGE_JOB_FORMS,
            TAB_FORMS,
            view().with(ACTION_SUBMIT, true),
        )
}
