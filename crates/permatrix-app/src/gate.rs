//! The request gate: resolve the caller, evaluate the operation's requirement, decide.

use crate::identity::{IdentityError, IdentityProvider, RawIdentity};
use crate::snapshot::PolicySnapshot;
use permatrix_domain::{Identity, RoleNormalizer};
use permatrix_settings::ResolvedConfig;
use permatrix_store::PolicyStore;
use permatrix_types::{Decision, DenialDetail, Requirement, ids, lookup_operation};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

const REASON_NOT_GRANTED: &str = "not_granted";
const REASON_STORE_UNAVAILABLE: &str = "store_unavailable";

/// One incoming request as far as authorization cares.
#[derive(Clone, Debug, Default)]
pub struct GateRequest {
    /// Opaque credential; `None` is an anonymous caller.
    pub credential: Option<String>,
    /// The surrounding request's own deadline. Identity resolution that finishes
    /// after it is treated as anonymous.
    pub deadline: Option<Instant>,
}

impl GateRequest {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            deadline: None,
        }
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Gate result. On allow, the resolved identity travels on for ownership checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Allowed { identity: Identity, decision: Decision },
    Denied { decision: Decision },
}

impl GateOutcome {
    pub fn decision(&self) -> &Decision {
        match self {
            GateOutcome::Allowed { decision, .. } | GateOutcome::Denied { decision } => decision,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            GateOutcome::Allowed { identity, .. } => Some(identity),
            GateOutcome::Denied { .. } => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GateOutcome::Allowed { .. })
    }
}

pub struct RequestGate {
    store: Arc<dyn PolicyStore>,
    identities: Arc<dyn IdentityProvider>,
    normalizer: RoleNormalizer,
    diagnostics: bool,
}

impl RequestGate {
    pub fn new(
        store: Arc<dyn PolicyStore>,
        identities: Arc<dyn IdentityProvider>,
        normalizer: RoleNormalizer,
    ) -> Self {
        Self {
            store,
            identities,
            normalizer,
            diagnostics: false,
        }
    }

    pub fn from_config(
        store: Arc<dyn PolicyStore>,
        identities: Arc<dyn IdentityProvider>,
        config: &ResolvedConfig,
    ) -> Self {
        Self::new(store, identities, config.normalizer.clone()).with_diagnostics(config.diagnostics)
    }

    /// Include role and requirement in denials. Never on in production.
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Resolve the caller. Every failure mode, a late answer included, yields `Guest`.
    pub fn resolve_identity(&self, request: &GateRequest) -> Identity {
        let Some(credential) = request.credential.as_deref() else {
            return Identity::guest();
        };
        let raw = match self.resolve_within_deadline(credential, request.deadline) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Identity::guest(),
            Err(err) => {
                tracing::warn!(error = %err, "treating caller as Guest");
                return Identity::guest();
            }
        };
        Identity {
            role: self.normalizer.normalize(raw.role.as_deref()),
            subject_id: raw.subject_id,
        }
    }

    /// Without a deadline the provider is called inline. With one, it runs on its own
    /// thread and the gate stops waiting once the deadline passes. A provider that never
    /// answers leaks that thread but never holds the request.
    fn resolve_within_deadline(
        &self,
        credential: &str,
        deadline: Option<Instant>,
    ) -> Result<Option<RawIdentity>, IdentityError> {
        let Some(deadline) = deadline else {
            return self.identities.resolve(credential);
        };
        let Some(budget) = deadline.checked_duration_since(Instant::now()) else {
            return Err(IdentityError::TimedOut);
        };

        let (tx, rx) = mpsc::channel();
        let identities = Arc::clone(&self.identities);
        let credential = credential.to_string();
        thread::spawn(move || {
            // The receiver is gone once the gate has given up; nothing to report.
            let _ = tx.send(identities.resolve(&credential));
        });

        match rx.recv_timeout(budget) {
            Ok(resolved) => resolved,
            Err(RecvTimeoutError::Timeout) => Err(IdentityError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(IdentityError::Unavailable(
                "identity provider stopped without answering".to_string(),
            )),
        }
    }

    pub fn authorize(&self, request: &GateRequest, requirement: &Requirement) -> GateOutcome {
        let identity = self.resolve_identity(request);
        self.authorize_identity(identity, requirement, None)
    }

    /// Gate a catalog operation. Unknown ids are denied for every caller.
    pub fn authorize_operation(&self, request: &GateRequest, operation_id: &str) -> GateOutcome {
        let Some(operation) = lookup_operation(operation_id) else {
            tracing::warn!(operation = operation_id, "unknown operation");
            return GateOutcome::Denied {
                decision: Decision::deny(ids::CODE_UNKNOWN_OPERATION, None),
            };
        };
        let identity = self.resolve_identity(request);
        self.authorize_identity(identity, &operation.requirement, Some(operation.id))
    }

    /// Decide for an already resolved caller. The bypass role never reads the store.
    pub fn authorize_identity(
        &self,
        identity: Identity,
        requirement: &Requirement,
        operation: Option<&str>,
    ) -> GateOutcome {
        if identity.role.is_bypass() {
            return self.allowed(identity, operation);
        }

        let snapshot = PolicySnapshot::load(self.store.as_ref());
        if snapshot.evaluate(&identity.role, requirement) {
            return self.allowed(identity, operation);
        }

        let reason = if snapshot.is_available() {
            REASON_NOT_GRANTED
        } else {
            REASON_STORE_UNAVAILABLE
        };
        tracing::debug!(
            role = %identity.role,
            operation = operation.unwrap_or("-"),
            requirement = %requirement,
            reason,
            "deny"
        );
        let detail = self.diagnostics.then(|| DenialDetail {
            role: identity.role.to_string(),
            requirement: requirement.clone(),
            action: requirement.primary_action().map(str::to_string),
            operation: operation.map(str::to_string),
            reason: Some(reason.to_string()),
        });
        GateOutcome::Denied {
            decision: Decision::deny(ids::CODE_FORBIDDEN, detail),
        }
    }

    fn allowed(&self, identity: Identity, operation: Option<&str>) -> GateOutcome {
        tracing::debug!(
            role = %identity.role,
            operation = operation.unwrap_or("-"),
            "allow"
        );
        let decision = Decision::allow(identity.role.as_str(), identity.subject_id.clone());
        GateOutcome::Allowed { identity, decision }
    }
}
