/*!
`PolicyEmitter` — coalesces a `PermissionSet`'s atoms that share a resource/condition fingerprint
into multi-action statements, and serializes the result into the canonical policy document shape.
*/

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::algebra::permission::{Permission, ResourceScope};
use crate::algebra::permission_set::PermissionSet;
use crate::error::IamFormatError;
use crate::model::{Condition, Effect};
use crate::syntax::{
    display_vec_to_json, ACTION_NAME, EFFECT_NAME, IamProperty, IamValue,
    RESOURCE_VALUE_NOT_RESOURCE, RESOURCE_VALUE_RESOURCE, STATEMENT_NAME, VERSION_NAME,
};

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// One emitted `Statement` in the canonical output document.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resource: ResourceScope,
    pub condition: Option<Condition>,
}

/// The canonical, stable-schema output of the engine: `{Version, Statement}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statements: Vec<EmittedStatement>,
}

pub const POLICY_DOCUMENT_VERSION: &str = "2012-10-17";

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl EmittedStatement {
    /// Renders this statement per the canonical schema: a bare string `Action` when there is
    /// exactly one action, a sorted array otherwise, matching `display_vec_to_json`'s collapsing
    /// rule for the input model's `Action`/`Resource` elements.
    pub fn to_json(&self) -> Result<Value, IamFormatError> {
        let mut statement = Map::default();
        statement.insert(EFFECT_NAME.to_string(), self.effect.to_json()?);
        statement.insert(ACTION_NAME.to_string(), display_vec_to_json(&self.actions)?);
        match &self.resource {
            ResourceScope::Resource(patterns) => {
                statement.insert(RESOURCE_VALUE_RESOURCE.to_string(), display_vec_to_json(patterns)?);
            }
            ResourceScope::NotResource(patterns) => {
                statement.insert(RESOURCE_VALUE_NOT_RESOURCE.to_string(), display_vec_to_json(patterns)?);
            }
        }
        if let Some(condition) = &self.condition {
            condition.into_json_object(&mut statement)?;
        }
        Ok(Value::Object(statement))
    }
}

impl PolicyDocument {
    /// Renders the canonical `{Version, Statement}` output document.
    pub fn to_json(&self) -> Result<Value, IamFormatError> {
        let mut document = Map::default();
        document.insert(VERSION_NAME.to_string(), Value::String(self.version.to_string()));
        let statements: Result<Vec<Value>, IamFormatError> =
            self.statements.iter().map(EmittedStatement::to_json).collect();
        document.insert(STATEMENT_NAME.to_string(), Value::Array(statements?));
        Ok(Value::Object(document))
    }
}

/// Groups and emits the `Permission`s of `sets`, in order; `allow`-effect sets are expected first
/// so that allow statements precede deny statements in the output, per §6.
pub struct PolicyEmitter;

impl PolicyEmitter {
    /// Emits one `PermissionSet` into its coalesced statements.
    pub fn emit(set: &PermissionSet) -> Vec<EmittedStatement> {
        let mut buckets: BTreeMap<String, (ResourceScope, Option<Condition>, Vec<String>)> = BTreeMap::new();

        for permission in set.iter() {
            let fingerprint = canonical_fingerprint(permission);
            let action = format!("{}:{}", permission.service(), permission.action());
            let entry = buckets.entry(fingerprint).or_insert_with(|| {
                (
                    permission.resource().clone(),
                    if permission.conditions().is_empty() {
                        None
                    } else {
                        Some(permission.conditions().clone())
                    },
                    Vec::new(),
                )
            });
            entry.2.push(action);
        }

        let mut statements: Vec<EmittedStatement> = buckets
            .into_values()
            .map(|(resource, condition, mut actions)| {
                actions.sort();
                actions.dedup();
                EmittedStatement {
                    effect: set.effect().unwrap_or(Effect::Allow),
                    actions,
                    resource,
                    condition,
                }
            })
            .collect();

        statements.sort_by(|a, b| a.actions.cmp(&b.actions).then_with(|| fingerprint_sort_key(a).cmp(&fingerprint_sort_key(b))));
        statements
    }

    /// Emits `allow` then `deny`, concatenated into one document.
    pub fn emit_document(allow: &PermissionSet, deny: &PermissionSet) -> PolicyDocument {
        let mut statements = Self::emit(allow);
        statements.extend(Self::emit(deny));
        PolicyDocument {
            version: POLICY_DOCUMENT_VERSION,
            statements,
        }
    }
}

fn fingerprint_sort_key(statement: &EmittedStatement) -> String {
    match &statement.resource {
        ResourceScope::Resource(patterns) => patterns.join(","),
        ResourceScope::NotResource(patterns) => patterns.join(","),
    }
}

/// `(sorted resource-or-notResource list, canonicalized condition JSON)`, joined into one string.
fn canonical_fingerprint(permission: &Permission) -> String {
    let mut resource_patterns = match permission.resource() {
        ResourceScope::Resource(patterns) => patterns.clone(),
        ResourceScope::NotResource(patterns) => patterns.clone(),
    };
    resource_patterns.sort();
    resource_patterns.dedup();
    let resource_tag = match permission.resource() {
        ResourceScope::Resource(_) => "R",
        ResourceScope::NotResource(_) => "N",
    };
    format!(
        "{}|{}|{}",
        resource_tag,
        resource_patterns.join(","),
        canonical_condition_fingerprint(permission.conditions())
    )
}

fn canonical_condition_fingerprint(condition: &Condition) -> String {
    let mut object = Map::new();
    for (operator, matches) in condition.iter() {
        let mut key_object = Map::new();
        for (key, values) in matches.iter() {
            let mut sorted_values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            sorted_values.sort();
            key_object.insert(
                key.to_string().to_lowercase(),
                Value::Array(sorted_values.into_iter().map(Value::String).collect()),
            );
        }
        object.insert(operator.to_string().to_lowercase(), Value::Object(key_object));
    }
    Value::Object(object).to_string()
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Match, QualifiedName};

    fn allow(service: &str, action: &str, resource: &str, conditions: Condition) -> Permission {
        Permission::new(
            Effect::Allow,
            service,
            action,
            ResourceScope::Resource(vec![resource.to_string()]),
            conditions,
        )
    }

    #[test]
    fn test_single_permission_emits_one_statement() {
        let mut set = PermissionSet::new();
        set.add_permission(allow("s3", "listbucket", "*", Condition::default()));
        let statements = PolicyEmitter::emit(&set);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].actions, vec!["s3:listbucket".to_string()]);
    }

    #[test]
    fn test_same_fingerprint_coalesces_actions() {
        let mut set = PermissionSet::new();
        set.add_permission(Permission::new(
            Effect::Allow,
            "s3",
            "getobject",
            ResourceScope::Resource(vec!["arn:aws:s3:::bucket/*".to_string()]),
            Condition::default(),
        ));
        set.add_permission(Permission::new(
            Effect::Allow,
            "s3",
            "putobject",
            ResourceScope::Resource(vec!["arn:aws:s3:::bucket/*".to_string()]),
            Condition::default(),
        ));
        let statements = PolicyEmitter::emit(&set);
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].actions,
            vec!["s3:getobject".to_string(), "s3:putobject".to_string()]
        );
    }

    #[test]
    fn test_differing_conditions_stay_separate_statements() {
        let mut set = PermissionSet::new();
        let key = QualifiedName::new_tagged("aws", "RequestTag", "Project").unwrap();
        set.add_permission(allow(
            "s3",
            "listbucket",
            "arn:aws:s3:::bucket/*",
            Condition::string_equals(Match::new_one(key.clone(), "A")),
        ));
        set.add_permission(allow(
            "s3",
            "listbucket",
            "arn:aws:s3:::bucket/*",
            Condition::string_equals(Match::new_one(key, "B")),
        ));
        let statements = PolicyEmitter::emit(&set);
        // `add_permission` merges same-shape conditions (identical operator/key set) into one
        // atom with a unioned value list, so this collapses to a single emitted statement.
        assert_eq!(statements.len(), 1);
        let values = statements[0].condition.as_ref().unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_single_action_renders_as_bare_string() {
        let statement = EmittedStatement {
            effect: Effect::Allow,
            actions: vec!["s3:listbucket".to_string()],
            resource: ResourceScope::Resource(vec!["*".to_string()]),
            condition: None,
        };
        let object = statement.to_json().unwrap();
        assert_eq!(object.get("Action").unwrap(), &Value::String("s3:listbucket".to_string()));
        assert_eq!(object.get("Resource").unwrap(), &Value::String("*".to_string()));
    }

    #[test]
    fn test_multiple_actions_render_as_array() {
        let statement = EmittedStatement {
            effect: Effect::Allow,
            actions: vec!["s3:getobject".to_string(), "s3:putobject".to_string()],
            resource: ResourceScope::Resource(vec!["*".to_string()]),
            condition: None,
        };
        let object = statement.to_json().unwrap();
        let actions = object.get("Action").unwrap().as_array().unwrap();
        assert_eq!(
            actions,
            &vec![
                Value::String("s3:getobject".to_string()),
                Value::String("s3:putobject".to_string()),
            ]
        );
    }

    #[test]
    fn test_policy_document_to_json_wraps_version_and_statements() {
        let mut set = PermissionSet::new();
        set.add_permission(allow("s3", "listbucket", "*", Condition::default()));
        let document = PolicyEmitter::emit_document(&set, &PermissionSet::new());
        let object = document.to_json().unwrap();
        assert_eq!(object.get("Version").unwrap(), &Value::String("2012-10-17".to_string()));
        assert_eq!(object.get("Statement").unwrap().as_array().unwrap().len(), 1);
    }
}
