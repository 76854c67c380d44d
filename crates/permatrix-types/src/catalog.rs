//! Static catalog of protected operations.
//!
//! Each operation declares its requirement once; the request gate looks
//! operations up by id. Declarations are configuration, never runtime input.

use crate::ids::*;
use crate::{Requirement, Triple};

/// A protected operation and the requirement that gates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectedOperation {
    pub id: &'static str,
    pub summary: &'static str,
    pub requirement: Requirement,
    /// Resource family whose records are subject to ownership checks, if any.
    pub family: Option<&'static str>,
}

/// Look up an operation by id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_operation(id: &str) -> Option<ProtectedOperation> {
    let op = match id {
        "dockets.list" => op(
            "dockets.list",
            "List dockets",
            Requirement::single(PAGE_DOCKETS, TAB_LIST, ACTION_VIEW),
            None,
        ),
        "dockets.create" => op(
            "dockets.create",
            "Create a docket",
            Requirement::single(PAGE_DOCKETS, TAB_LIST, ACTION_CREATE),
            None,
        ),
        "dockets.edit" => op(
            "dockets.edit",
            "Edit a docket",
            Requirement::single(PAGE_DOCKETS, TAB_DETAIL, ACTION_EDIT),
            Some(FAMILY_DOCKETS),
        ),
        "dockets.print" => op(
            "dockets.print",
            "Print a docket",
            Requirement::either((PAGE_DOCKETS, TAB_DETAIL), (PAGE_DOCKETS, TAB_LIST), ACTION_PRINT),
            None,
        ),
        "dockets.delete" => op(
            "dockets.delete",
            "Delete a docket",
            Requirement::single(PAGE_DOCKETS, TAB_DETAIL, ACTION_DELETE),
            None,
        ),
        "customers.list" => op(
            "customers.list",
            "List customers",
            Requirement::single(PAGE_CUSTOMERS, TAB_LIST, ACTION_VIEW),
            None,
        ),
        "customers.edit" => op(
            "customers.edit",
            "Edit a customer",
            Requirement::single(PAGE_CUSTOMERS, TAB_DETAIL, ACTION_EDIT),
            None,
        ),
        "timesheets.list" => op(
            "timesheets.list",
            "List timesheets",
            Requirement::single(PAGE_TIMESHEETS, TAB_LIST, ACTION_VIEW),
            Some(FAMILY_TIMESHEETS),
        ),
        "timesheets.edit" => op(
            "timesheets.edit",
            "Edit a timesheet",
            Requirement::single(PAGE_TIMESHEETS, TAB_LIST, ACTION_EDIT),
            Some(FAMILY_TIMESHEETS),
        ),
        "timesheets.approve" => op(
            "timesheets.approve",
            "Approve a timesheet",
            Requirement::single(PAGE_TIMESHEETS, TAB_LIST, ACTION_APPROVE),
            None,
        ),
        "submissions.list" => op(
            "submissions.list",
            "List form submissions",
            Requirement::either(
                (PAGE_SUBMISSIONS, TAB_LIST),
                (PAGE_JOB_FORMS, TAB_FORMS),
                ACTION_VIEW,
            ),
            Some(FAMILY_SUBMISSIONS),
        ),
        "submissions.submit" => op(
            "submissions.submit",
            "Submit a form",
            Requirement::any_of(vec![
                Triple::new(PAGE_SUBMISSIONS, TAB_LIST, ACTION_SUBMIT),
                Triple::new(PAGE_JOB_FORMS, TAB_FORMS, ACTION_SUBMIT),
            ]),
            Some(FAMILY_SUBMISSIONS),
        ),
        "jobForms.design" => op(
            "jobForms.design",
            "Edit a form definition in the design tool",
            Requirement::single(PAGE_JOB_FORMS, TAB_DESIGN_TOOL, ACTION_EDIT),
            None,
        ),
        _ => return None,
    };
    Some(op)
}

/// List all known operation ids.
pub fn all_operation_ids() -> &'static [&'static str] {
    &[
        "dockets.list",
        "dockets.create",
        "dockets.edit",
        "dockets.print",
        "dockets.delete",
        "customers.list",
        "customers.edit",
        "timesheets.list",
        "timesheets.edit",
        "timesheets.approve",
        "submissions.list",
        "submissions.submit",
        "jobForms.design",
    ]
}

fn op(
    id: &'static str,
    summary: &'static str,
    requirement: Requirement,
    family: Option<&'static str>,
) -> ProtectedOperation {
    ProtectedOperation {
        id,
        summary,
        requirement,
        family,
    }
}
