/*!
`PolicyIngest` — the pull-through adapter from parsed `model::Policy` statements into `Permission`
atoms, plus the `ActionExpander` collaborator trait it depends on to turn wildcarded/`NotAction`
action lists into concrete `service:action` pairs.
*/

use std::collections::HashSet;
use std::ops::Deref;

use tracing::{debug, instrument, warn};

use crate::algebra::pattern::WildcardPattern;
use crate::algebra::permission::{Permission, ResourceScope};
use crate::algebra::permission_set::PermissionSet;
use crate::error::EngineError;
use crate::model::{Action, Condition, Effect, Match, Policy, QualifiedName, Resource, Statement};
use crate::service::ServiceCatalog;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Expands a statement's `Action`/`NotAction` element into concrete, lowercase `service:action`
/// strings. This crate ships `CatalogActionExpander`; production callers are expected to back
/// this with a live service-action registry.
pub trait ActionExpander {
    /// `actions` empty + `expand_asterisk` true means the statement's whole value was the bare
    /// wildcard `"*"`. Otherwise each entry may itself carry a `service:action*`-shaped wildcard.
    fn expand(&self, actions: &[QualifiedName], expand_asterisk: bool) -> Result<Vec<String>, EngineError>;

    /// The complement of `expand(not_actions, false)` against the full action catalog.
    fn invert(&self, not_actions: &[QualifiedName]) -> Result<Vec<String>, EngineError>;
}

/// A reference `ActionExpander` backed by a `ServiceCatalog`.
#[derive(Debug, Clone)]
pub struct CatalogActionExpander {
    catalog: ServiceCatalog,
}

/// Ingests parsed policy statements into a `PermissionSet`, filtering by effect.
#[derive(Debug)]
pub struct PolicyIngest<'a, E: ActionExpander> {
    expander: &'a E,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl CatalogActionExpander {
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self { catalog }
    }

    fn all_actions(&self) -> Vec<String> {
        self.catalog
            .services
            .iter()
            .flat_map(|service| {
                service
                    .actions
                    .iter()
                    .map(move |action| format!("{}:{}", service.namespace, action.to_lowercase()))
            })
            .collect()
    }

    fn expand_one(&self, qualified: &QualifiedName) -> Vec<String> {
        let service = qualified.namespace().to_string().to_lowercase();
        if !qualified.has_wildcard() {
            return vec![format!("{}:{}", service, qualified.name().to_lowercase())];
        }
        let pattern = WildcardPattern::compile(&qualified.name().to_lowercase());
        match self.catalog.service(&service) {
            Some(config) => config
                .actions
                .iter()
                .map(|a| a.to_lowercase())
                .filter(|a| pattern.matches(a))
                .map(|a| format!("{}:{}", service, a))
                .collect(),
            None => {
                warn!(service = %service, "no catalog entry for service; wildcard expands to nothing");
                vec![]
            }
        }
    }
}

impl ActionExpander for CatalogActionExpander {
    fn expand(&self, actions: &[QualifiedName], expand_asterisk: bool) -> Result<Vec<String>, EngineError> {
        if actions.is_empty() {
            return Ok(if expand_asterisk { self.all_actions() } else { vec![] });
        }
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for qualified in actions {
            for action in self.expand_one(qualified) {
                if seen.insert(action.clone()) {
                    result.push(action);
                }
            }
        }
        Ok(result)
    }

    fn invert(&self, not_actions: &[QualifiedName]) -> Result<Vec<String>, EngineError> {
        let excluded: HashSet<String> = self.expand(not_actions, false)?.into_iter().collect();
        Ok(self
            .all_actions()
            .into_iter()
            .filter(|a| !excluded.contains(a))
            .collect())
    }
}

impl<'a, E: ActionExpander> PolicyIngest<'a, E> {
    pub fn new(expander: &'a E) -> Self {
        Self { expander }
    }

    /// Ingests every statement of `policy` whose effect matches `effect` into `target`.
    #[instrument(skip(self, policy, target), fields(statements = policy.statements().count()))]
    pub fn ingest_policy(
        &self,
        policy: &Policy,
        effect: Effect,
        target: &mut PermissionSet,
    ) -> Result<(), EngineError> {
        for statement in policy.statements() {
            self.ingest_statement(statement, effect, target)?;
        }
        Ok(())
    }

    /// Ingests every statement of every policy in `policies` whose effect matches `effect`.
    pub fn add_policies_to_permission_set(
        &self,
        policies: &[Policy],
        effect: Effect,
        target: &mut PermissionSet,
    ) -> Result<(), EngineError> {
        for policy in policies {
            self.ingest_policy(policy, effect, target)?;
        }
        Ok(())
    }

    /// Builds a fresh `PermissionSet` of the `Allow` statements across `policies`.
    pub fn build_allow_set(&self, policies: &[Policy]) -> Result<PermissionSet, EngineError> {
        let mut set = PermissionSet::new();
        self.add_policies_to_permission_set(policies, Effect::Allow, &mut set)?;
        Ok(set)
    }

    /// Builds a fresh `PermissionSet` of the `Deny` statements across `policies`.
    pub fn build_deny_set(&self, policies: &[Policy]) -> Result<PermissionSet, EngineError> {
        let mut set = PermissionSet::new();
        self.add_policies_to_permission_set(policies, Effect::Deny, &mut set)?;
        Ok(set)
    }

    fn ingest_statement(
        &self,
        statement: &Statement,
        effect: Effect,
        target: &mut PermissionSet,
    ) -> Result<(), EngineError> {
        if statement.effect != effect {
            return Ok(());
        }

        let actions = match &statement.action {
            Action::Action(crate::model::OrAny::Any) => self.expander.expand(&[], true)?,
            Action::Action(crate::model::OrAny::Some(names)) => self.expander.expand(names, false)?,
            Action::NotAction(crate::model::OrAny::Any) => vec![],
            Action::NotAction(crate::model::OrAny::Some(names)) => self.expander.invert(names)?,
        };

        let resource = match &statement.resource {
            Resource::Resource(crate::model::OrAny::Any) => ResourceScope::Resource(vec!["*".to_string()]),
            Resource::Resource(crate::model::OrAny::Some(patterns)) => {
                ResourceScope::Resource(patterns.clone())
            }
            Resource::NotResource(crate::model::OrAny::Any) => {
                // Excludes everything: equivalent to an empty grant. No atom is produced.
                debug!("skipping statement with NotResource: * (vacuous)");
                return Ok(());
            }
            Resource::NotResource(crate::model::OrAny::Some(patterns)) => {
                ResourceScope::NotResource(patterns.clone())
            }
        };

        let conditions = statement
            .condition
            .as_ref()
            .map(normalize_condition)
            .unwrap_or_default();

        for action in actions {
            let Some((service, action_name)) = split_action(&action) else {
                warn!(action = %action, "skipping malformed expanded action");
                continue;
            };
            target.add_permission(Permission::new(
                effect,
                service,
                action_name,
                resource.clone(),
                conditions.clone(),
            ));
        }

        Ok(())
    }
}

fn split_action(action: &str) -> Option<(String, String)> {
    let (service, name) = action.split_once(':')?;
    if service.is_empty() || name.is_empty() {
        return None;
    }
    Some((service.to_lowercase(), name.to_lowercase()))
}

/// Lowercases every context key in `condition`; operator identity is already case-insensitive by
/// construction (`Operator` is an enum, not a raw string).
fn normalize_condition(condition: &Condition) -> Condition {
    let mut normalized = Condition::default();
    for (operator, matches) in condition.iter() {
        let mut lowered = Match::default();
        for (key, values) in matches.iter() {
            let lower_key = QualifiedName::new_unchecked(key.deref().to_lowercase());
            lowered.extend(lower_key, values.clone());
        }
        normalized.merge(operator.clone(), lowered);
    }
    normalized
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Statement;
    use crate::service::ServiceConfig;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(vec![ServiceConfig {
            namespace: "s3".to_string(),
            actions: vec!["GetObject".to_string(), "PutObject".to_string(), "ListBucket".to_string()],
            resource_types: vec![],
            condition_keys: vec![],
        }])
    }

    #[test]
    fn test_expand_wildcard_action() {
        let expander = CatalogActionExpander::new(catalog());
        let qn = QualifiedName::new("s3", "Get*").unwrap();
        let expanded = expander.expand(&[qn], false).unwrap();
        assert_eq!(expanded, vec!["s3:getobject".to_string()]);
    }

    #[test]
    fn test_invert_not_action() {
        let expander = CatalogActionExpander::new(catalog());
        let qn = QualifiedName::new("s3", "GetObject").unwrap();
        let mut inverted = expander.invert(&[qn]).unwrap();
        inverted.sort();
        assert_eq!(inverted, vec!["s3:listbucket".to_string(), "s3:putobject".to_string()]);
    }

    #[test]
    fn test_ingest_single_allow_statement() {
        let expander = CatalogActionExpander::new(catalog());
        let ingest = PolicyIngest::new(&expander);
        let statement = Statement::unnamed()
            .allow()
            .action(Action::this_action(QualifiedName::new("s3", "GetObject").unwrap()))
            .resource(Resource::this_resource("arn:aws:s3:::bucket/*"));
        let policy = Policy::from(statement);
        let mut set = PermissionSet::new();
        ingest.ingest_policy(&policy, Effect::Allow, &mut set).unwrap();
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn test_ingest_lowercases_condition_keys() {
        let expander = CatalogActionExpander::new(catalog());
        let ingest = PolicyIngest::new(&expander);
        let condition = Condition::string_not_equals(Match::new_one(
            QualifiedName::new_unchecked("aws:PrincipalOrgId"),
            "o-1",
        ));
        let statement = Statement::unnamed()
            .allow()
            .action(Action::this_action(QualifiedName::new("s3", "GetObject").unwrap()))
            .resource(Resource::this_resource("arn:aws:s3:::bucket/*"))
            .condition(condition);
        let policy = Policy::from(statement);
        let mut set = PermissionSet::new();
        ingest.ingest_policy(&policy, Effect::Allow, &mut set).unwrap();
        let permission = set.iter().next().unwrap();
        assert!(permission
            .conditions()
            .keys()
            .next()
            .map(|op| op.operator == crate::model::GlobalOperator::StringNotEquals)
            .unwrap_or(false));
    }
}
