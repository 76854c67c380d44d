//! Capability queries for the presentation layer, served from the same snapshot path as the gate.

use crate::snapshot::PolicySnapshot;
use permatrix_domain::{
    Capabilities, Identity, ListScope, OwnershipContext, OwnershipGuard, VisiblePage,
};
use permatrix_settings::ResolvedConfig;
use permatrix_store::PolicyStore;
use std::sync::Arc;

/// The record an action would touch, for the ownership check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordRef<'a> {
    pub family: &'a str,
    pub owner_id: &'a str,
}

pub struct CapabilityService {
    store: Arc<dyn PolicyStore>,
    ownership: OwnershipGuard,
}

impl CapabilityService {
    pub fn new(store: Arc<dyn PolicyStore>, ownership: OwnershipGuard) -> Self {
        Self { store, ownership }
    }

    pub fn from_config(store: Arc<dyn PolicyStore>, config: &ResolvedConfig) -> Self {
        Self::new(store, config.ownership.clone())
    }

    pub fn page_visible(&self, identity: &Identity, page: &str) -> bool {
        self.query(identity, |caps| caps.page_visible(&identity.role, page))
    }

    pub fn tab_visible(&self, identity: &Identity, page: &str, tab: &str) -> bool {
        self.query(identity, |caps| caps.tab_visible(&identity.role, page, tab))
    }

    pub fn action_allowed(
        &self,
        identity: &Identity,
        page: &str,
        tab: &str,
        action: &str,
        record: Option<RecordRef<'_>>,
    ) -> bool {
        let ctx = record.map(|r| OwnershipContext::new(r.family, identity.subject(), r.owner_id));
        self.query(identity, |caps| {
            caps.action_allowed(&identity.role, page, tab, action, ctx.as_ref())
        })
    }

    /// Navigation listing. An unreadable store lists nothing, for every role.
    pub fn visible_pages(&self, identity: &Identity) -> Vec<VisiblePage> {
        match PolicySnapshot::load(self.store.as_ref()) {
            PolicySnapshot::Ready(matrix) => {
                Capabilities::new(&matrix, &self.ownership).visible_pages(&identity.role)
            }
            PolicySnapshot::Unavailable => Vec::new(),
        }
    }

    pub fn list_scope(&self, identity: &Identity, family: &str) -> ListScope {
        self.ownership
            .list_scope(family, &identity.role, identity.subject())
    }

    pub fn ownership(&self) -> &OwnershipGuard {
        &self.ownership
    }

    // Mirrors the gate: bypass answers without a store read, and an unreadable store
    // answers false for everyone else.
    fn query(&self, identity: &Identity, f: impl FnOnce(Capabilities<'_>) -> bool) -> bool {
        if identity.role.is_bypass() {
            let empty = permatrix_domain::Matrix::new();
            return f(Capabilities::new(&empty, &self.ownership));
        }
        match PolicySnapshot::load(self.store.as_ref()) {
            PolicySnapshot::Ready(matrix) => f(Capabilities::new(&matrix, &self.ownership)),
            PolicySnapshot::Unavailable => false,
        }
    }
}
