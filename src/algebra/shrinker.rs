/*!
`PolicyShrinker` — an optional post-processing step invoked when `shrink_action_lists` is set,
compressing a statement's action array by substituting a service-level wildcard where the array
already lists every action the catalog knows about for that service.
*/

use std::collections::{BTreeMap, HashSet};

use crate::algebra::emitter::{EmittedStatement, PolicyDocument};
use crate::service::ServiceCatalog;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Compresses a `PolicyDocument`'s action lists where doing so is provably lossless.
pub trait PolicyShrinker {
    fn shrink(&self, document: PolicyDocument) -> PolicyDocument;
}

/// A conservative reference `PolicyShrinker` backed by a `ServiceCatalog`: an action list is
/// replaced by `service:*` only when it names every action the catalog knows for that service and
/// names no action of any other service.
#[derive(Debug, Clone)]
pub struct CatalogPolicyShrinker {
    catalog: ServiceCatalog,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl CatalogPolicyShrinker {
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self { catalog }
    }

    fn shrink_statement(&self, statement: EmittedStatement) -> EmittedStatement {
        let mut by_service: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for action in &statement.actions {
            if let Some((service, name)) = action.split_once(':') {
                by_service.entry(service).or_default().push(name);
            }
        }

        let mut shrunk = Vec::with_capacity(statement.actions.len());
        for (service, names) in &by_service {
            let Some(config) = self.catalog.service(service) else {
                shrunk.extend(names.iter().map(|n| format!("{service}:{n}")));
                continue;
            };
            let present: HashSet<&str> = names.iter().copied().collect();
            let all: HashSet<String> = config.actions.iter().map(|a| a.to_lowercase()).collect();
            if !all.is_empty() && all.iter().all(|a| present.contains(a.as_str())) && present.len() == all.len() {
                shrunk.push(format!("{service}:*"));
            } else {
                shrunk.extend(names.iter().map(|n| format!("{service}:{n}")));
            }
        }
        shrunk.sort();

        EmittedStatement {
            actions: shrunk,
            ..statement
        }
    }
}

impl PolicyShrinker for CatalogPolicyShrinker {
    fn shrink(&self, document: PolicyDocument) -> PolicyDocument {
        PolicyDocument {
            version: document.version,
            statements: document
                .statements
                .into_iter()
                .map(|statement| self.shrink_statement(statement))
                .collect(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::permission::ResourceScope;
    use crate::model::Effect;
    use crate::service::ServiceConfig;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(vec![ServiceConfig {
            namespace: "s3".to_string(),
            actions: vec!["GetObject".to_string(), "PutObject".to_string()],
            resource_types: vec![],
            condition_keys: vec![],
        }])
    }

    fn statement(actions: Vec<&str>) -> EmittedStatement {
        EmittedStatement {
            effect: Effect::Allow,
            actions: actions.into_iter().map(String::from).collect(),
            resource: ResourceScope::Resource(vec!["*".to_string()]),
            condition: None,
        }
    }

    #[test]
    fn test_complete_action_list_shrinks_to_wildcard() {
        let shrinker = CatalogPolicyShrinker::new(catalog());
        let document = PolicyDocument {
            version: "2012-10-17",
            statements: vec![statement(vec!["s3:getobject", "s3:putobject"])],
        };
        let shrunk = shrinker.shrink(document);
        assert_eq!(shrunk.statements[0].actions, vec!["s3:*".to_string()]);
    }

    #[test]
    fn test_partial_action_list_is_unchanged() {
        let shrinker = CatalogPolicyShrinker::new(catalog());
        let document = PolicyDocument {
            version: "2012-10-17",
            statements: vec![statement(vec!["s3:getobject"])],
        };
        let shrunk = shrinker.shrink(document);
        assert_eq!(shrunk.statements[0].actions, vec!["s3:getobject".to_string()]);
    }
}
