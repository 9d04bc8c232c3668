/*!
`DataStore` — the engine's inbound collaborator trait, and the types it hands back describing
every policy attached to a principal across identity, boundary, and organizational levels.
*/

use crate::error::EngineError;
use crate::model::Policy;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// A named policy document, as attached (directly or via a group) to a principal or org level.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyEntry {
    pub name: String,
    pub policy: Policy,
}

/// One level of an SCP or RCP hierarchy (e.g. one org unit), carrying the policies attached at
/// that level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub org_identifier: String,
    pub policies: Vec<PolicyEntry>,
}

/// The policies a principal inherits from one IAM group it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPolicies {
    pub group_name: String,
    pub managed_policies: Vec<PolicyEntry>,
    pub inline_policies: Vec<PolicyEntry>,
}

/// Everything `CombinationPipeline` needs to evaluate one principal's effective permissions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrincipalPolicies {
    pub managed_policies: Vec<PolicyEntry>,
    pub inline_policies: Vec<PolicyEntry>,
    pub permission_boundary: Option<PolicyEntry>,
    pub scps: Vec<Level>,
    pub rcps: Vec<Level>,
    pub group_policies: Vec<GroupPolicies>,
}

impl PrincipalPolicies {
    /// All identity policies attached to the principal: its own managed/inline policies, plus
    /// every managed/inline policy inherited through group membership.
    pub fn identity_policies(&self) -> Vec<&Policy> {
        let mut policies: Vec<&Policy> = self
            .managed_policies
            .iter()
            .chain(self.inline_policies.iter())
            .map(|entry| &entry.policy)
            .collect();
        for group in &self.group_policies {
            policies.extend(
                group
                    .managed_policies
                    .iter()
                    .chain(group.inline_policies.iter())
                    .map(|entry| &entry.policy),
            );
        }
        policies
    }
}

/// The engine's inbound collaborator: fetches every policy bearing on a principal's effective
/// permissions. Modeled as synchronous per the crate's concurrency model (§5) — an async-backed
/// implementation blocks on its own executor or pre-fetches before calling `can_what`.
pub trait DataStore {
    fn get_all_policies_for_principal(
        &self,
        principal_arn: &str,
    ) -> Result<PrincipalPolicies, EngineError>;
}

/// A fixed-fixture `DataStore` used by this crate's own tests and examples. Callers needing a
/// real backing store (API calls, a database) implement `DataStore` directly.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataStore {
    principals: std::collections::HashMap<String, PrincipalPolicies>,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `policies` as the full policy bundle for `principal_arn`.
    pub fn with_principal(mut self, principal_arn: impl Into<String>, policies: PrincipalPolicies) -> Self {
        self.principals.insert(principal_arn.into(), policies);
        self
    }

    pub fn insert_principal(&mut self, principal_arn: impl Into<String>, policies: PrincipalPolicies) {
        self.principals.insert(principal_arn.into(), policies);
    }
}

impl DataStore for InMemoryDataStore {
    fn get_all_policies_for_principal(
        &self,
        principal_arn: &str,
    ) -> Result<PrincipalPolicies, EngineError> {
        if principal_arn.is_empty() {
            return Err(EngineError::InvalidInput {
                reason: "principal ARN must not be empty".to_string(),
            });
        }
        Ok(self
            .principals
            .get(principal_arn)
            .cloned()
            .unwrap_or_default())
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, Effect, QualifiedName, Resource, Statement};

    fn single_statement_policy() -> Policy {
        let statement = Statement::unnamed()
            .allow()
            .action(Action::this_action(QualifiedName::new("s3", "GetObject").unwrap()))
            .resource(Resource::any_resource());
        assert_eq!(statement.effect, Effect::Allow);
        Policy::from(statement)
    }

    #[test]
    fn test_unknown_principal_returns_empty_bundle() {
        let store = InMemoryDataStore::new();
        let bundle = store.get_all_policies_for_principal("arn:aws:iam::123:user/nobody").unwrap();
        assert!(bundle.identity_policies().is_empty());
    }

    #[test]
    fn test_empty_principal_arn_is_invalid_input() {
        let store = InMemoryDataStore::new();
        let result = store.get_all_policies_for_principal("");
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_registered_principal_round_trips() {
        let mut bundle = PrincipalPolicies::default();
        bundle.inline_policies.push(PolicyEntry {
            name: "inline-1".to_string(),
            policy: single_statement_policy(),
        });
        let store = InMemoryDataStore::new().with_principal("arn:aws:iam::123:user/alice", bundle);
        let fetched = store.get_all_policies_for_principal("arn:aws:iam::123:user/alice").unwrap();
        assert_eq!(fetched.identity_policies().len(), 1);
    }
}
