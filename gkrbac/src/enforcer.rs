use arc_swap::ArcSwap;
use gkcore::{
    traits::Enforce,
    Model,
    Store,
};
use std::sync::Arc;

use crate::eval;

/// One loaded (model, store) generation.
#[derive(Debug)]
struct Snapshot {
    model: Model,
    store: Store,
}

/// The enforcement facade.
///
/// Holds exactly one active (model, store) pair behind an atomic slot.
/// The read path is lock-free: every query loads the snapshot once, so
/// a concurrent [`swap`](Self::swap) is observed either fully-before
/// or fully-after, never partially.
#[derive(Debug)]
pub struct Enforcer {
    // snapshot used by the enforce hot path; swapped wholesale, never
    // mutated in place
    active: ArcSwap<Snapshot>,
}

impl Enforcer {
    pub fn new(model: Model, store: Store) -> Self {
        log::debug!("new enforcer set up with {} policies", store.len());
        Self {
            active: ArcSwap::from_pointee(Snapshot { model, store }),
        }
    }

    /// Whether `sub` may perform `act` on `obj` under the currently
    /// active policy.  A request no rule determines is denied.
    pub fn enforce(&self, sub: &str, obj: &str, act: &str) -> bool {
        let snapshot = self.active.load();
        eval::evaluate(&snapshot.model, &snapshot.store, sub, obj, act)
    }

    /// Atomically replace the active (model, store) pair.  Takes
    /// effect for every query issued after the swap completes, and
    /// never for queries already past their snapshot load.
    pub fn swap(&self, model: Model, store: Store) {
        log::debug!("enforcer swapping in {} policies", store.len());
        self.active.store(Arc::new(Snapshot { model, store }));
    }

    /// Whether any one of `roles` may perform `act` on `obj`.
    ///
    /// Short-circuits on the first role that passes; no roles at all
    /// never passes.  The whole check runs against a single snapshot.
    pub fn check_allow_for_roles<I>(&self, obj: &str, act: &str, roles: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let snapshot = self.active.load();
        roles.into_iter().any(|role| eval::evaluate(
            &snapshot.model,
            &snapshot.store,
            role.as_ref(),
            obj,
            act,
        ))
    }
}

impl Enforce for Enforcer {
    fn enforce(&self, sub: &str, obj: &str, act: &str) -> bool {
        Enforcer::enforce(self, sub, obj, act)
    }
}
