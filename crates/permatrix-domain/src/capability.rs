//! Capability queries for presentation-layer gating.
//!
//! These mirror the request gate for UI visibility only: they run the same
//! evaluator over the same snapshot, so they can never be more permissive than
//! the gate for the same inputs. They are not a security boundary.

use crate::engine::{default_policy, evaluate_triple};
use crate::model::Matrix;
use crate::ownership::{OwnershipContext, OwnershipGuard};
use crate::roles::Role;
use permatrix_types::Triple;
use permatrix_types::ids::ACTION_VIEW;
use serde::Serialize;

/// A page the role may navigate to and the tabs it may open there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisiblePage {
    pub page: String,
    pub tabs: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct Capabilities<'a> {
    matrix: &'a Matrix,
    ownership: &'a OwnershipGuard,
}

impl<'a> Capabilities<'a> {
    pub fn new(matrix: &'a Matrix, ownership: &'a OwnershipGuard) -> Self {
        Self { matrix, ownership }
    }

    /// True iff at least one tab under `page` grants `view`.
    ///
    /// Tabs are every key any role stores under `page`. A page with no configuration
    /// under the role falls back to the default policy, like any other absent entry.
    pub fn page_visible(&self, role: &Role, page: &str) -> bool {
        if role.is_bypass() {
            return true;
        }
        let configured = self
            .matrix
            .role_policy(role)
            .and_then(|policy| policy.page(page))
            .is_some();
        if !configured {
            return default_policy(role);
        }
        self.matrix
            .known_tabs()
            .iter()
            .filter(|(p, _)| p == page)
            .any(|(_, tab)| self.tab_visible(role, page, tab))
    }

    pub fn tab_visible(&self, role: &Role, page: &str, tab: &str) -> bool {
        evaluate_triple(self.matrix, role, &Triple::new(page, tab, ACTION_VIEW))
    }

    /// Matrix grant and, when a record is in play, the ownership guard. Both must pass.
    pub fn action_allowed(
        &self,
        role: &Role,
        page: &str,
        tab: &str,
        action: &str,
        ownership: Option<&OwnershipContext<'_>>,
    ) -> bool {
        if !evaluate_triple(self.matrix, role, &Triple::new(page, tab, action)) {
            return false;
        }
        match ownership {
            Some(ctx) => self
                .ownership
                .allows_record(ctx.family, role, ctx.subject_id, ctx.owner_id),
            None => true,
        }
    }

    /// Navigation listing over every page/tab key the matrix knows about.
    ///
    /// Pages and tabs are an open schema, so keys no role mentions cannot be listed.
    pub fn visible_pages(&self, role: &Role) -> Vec<VisiblePage> {
        let mut out: Vec<VisiblePage> = Vec::new();
        for (page, tab) in self.matrix.known_tabs() {
            if !self.tab_visible(role, &page, &tab) {
                continue;
            }
            match out.last_mut() {
                Some(last) if last.page == page => last.tabs.push(tab),
                _ => out.push(VisiblePage {
                    page,
                    tabs: vec![tab],
                }),
            }
        }
        out
    }
}
