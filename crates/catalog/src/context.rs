//! Store context resolution.

use vitrine_core::StoreScope;

use crate::error::{CatalogError, CatalogResult};

/// Supplier of the active website/store scope.
///
/// Resolution happens once per batch of calls; the resulting [`StoreScope`]
/// is then passed explicitly into every scoped operation.
pub trait StoreContext: Send + Sync {
    fn current_scope(&self) -> Option<StoreScope>;
}

/// Resolve the active scope, failing before any query executes when the
/// context cannot supply one.
pub fn resolve_scope(context: &dyn StoreContext) -> CatalogResult<StoreScope> {
    context
        .current_scope()
        .ok_or_else(|| CatalogError::configuration("store scope is not resolved"))
}

/// Trivial context for tests and single-store deployments.
#[derive(Debug, Copy, Clone)]
pub struct FixedContext {
    scope: StoreScope,
}

impl FixedContext {
    pub fn new(scope: StoreScope) -> Self {
        Self { scope }
    }
}

impl StoreContext for FixedContext {
    fn current_scope(&self) -> Option<StoreScope> {
        Some(self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unresolved;

    impl StoreContext for Unresolved {
        fn current_scope(&self) -> Option<StoreScope> {
            None
        }
    }

    #[test]
    fn fixed_context_resolves() {
        let context = FixedContext::new(StoreScope::new(1, 1));
        assert_eq!(resolve_scope(&context).unwrap(), StoreScope::new(1, 1));
    }

    #[test]
    fn missing_scope_is_a_configuration_error() {
        let err = resolve_scope(&Unresolved).unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
    }
}
