//! Retirement planning for aged-out indices.
//!
//! Pure functions from a filtered [`IndexCatalog`] to the instructions needed
//! to retire its indices: either an alias-mutation body for `/_aliases` or a
//! plain deletion list. No I/O happens here; the caller decides whether to
//! issue a request, and an empty plan means no request at all (the engine
//! treats an `actions` array with zero entries as malformed).

use bytes::Bytes;
use serde::Serialize;

use crate::catalog::IndexCatalog;

/// One `(index, alias)` removal pair. Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRemoval {
    /// Index to detach.
    pub index: String,
    /// Alias to remove it from.
    pub alias: String,
}

#[derive(Serialize)]
struct RemoveAction<'a> {
    remove: &'a AliasRemoval,
}

#[derive(Serialize)]
struct AliasActions<'a> {
    actions: Vec<RemoveAction<'a>>,
}

/// Instructions for retiring a set of indices from an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetirementPlan {
    /// Nothing matched; the caller must not issue a request.
    NothingToDo,
    /// Detach every listed index from its alias. Never empty.
    RemoveAliases(Vec<AliasRemoval>),
}

impl RetirementPlan {
    /// Check whether the plan requires no action.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NothingToDo)
    }

    /// The removal pairs, sorted by index name.
    pub fn removals(&self) -> &[AliasRemoval] {
        match self {
            Self::NothingToDo => &[],
            Self::RemoveAliases(removals) => removals,
        }
    }

    /// Serialize to the `/_aliases` mutation body, or `None` when there is
    /// nothing to do.
    pub fn to_body(&self) -> Option<Bytes> {
        match self {
            Self::NothingToDo => None,
            Self::RemoveAliases(removals) => {
                let actions = AliasActions {
                    actions: removals.iter().map(|r| RemoveAction { remove: r }).collect(),
                };
                // Serialization of these derive-only types cannot fail.
                let body = serde_json::to_vec(&actions).unwrap_or_default();
                Some(Bytes::from(body))
            }
        }
    }
}

/// Planner turning filtered catalogs into retirement instructions.
pub struct RetirementPlanner;

impl RetirementPlanner {
    /// Plan the removal of `alias` from every index in `catalog`.
    ///
    /// Output is sorted by index name so serialized plans are deterministic
    /// regardless of the catalog's map iteration order.
    pub fn plan_alias_removal(catalog: &IndexCatalog, alias: &str) -> RetirementPlan {
        if catalog.is_empty() {
            return RetirementPlan::NothingToDo;
        }

        let removals = catalog
            .sorted_names()
            .into_iter()
            .map(|index| AliasRemoval {
                index,
                alias: alias.to_string(),
            })
            .collect();

        RetirementPlan::RemoveAliases(removals)
    }

    /// Plan the deletion of every index in `catalog`, sorted by name and
    /// suitable for one comma-joined batch delete. Empty catalog yields an
    /// empty list and the caller skips the call.
    pub fn plan_index_deletion(catalog: &IndexCatalog) -> Vec<String> {
        catalog.sorted_names()
    }
}
