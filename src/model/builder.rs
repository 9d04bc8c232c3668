//! A convenient and fluent builder interface for constructing policies.
//!
//! # Example
//!
//! ```rust
//! use iam_permission_algebra::model::*;
//! use iam_permission_algebra::model::builder::*;
//!
//! let policy: Policy = PolicyBuilder::new()
//!     .named("confidential-data-access")
//!     .evaluate_statement(
//!         StatementBuilder::new()
//!             .named("AllowConfidentialRead")
//!             .allows()
//!             .may_perform_actions(vec!["s3:List*", "s3:Get*"])
//!             .on_resources(vec![
//!                 "arn:aws:s3:::confidential-data",
//!                 "arn:aws:s3:::confidential-data/*",
//!             ]),
//!     )
//!     .into();
//! ```

use crate::model::containers::OrAny;
use crate::model::*;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PolicyBuilder {
    version: Option<Version>,
    id: Option<String>,
    statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct StatementBuilder {
    sid: Option<String>,
    effect: Effect,
    actions: Vec<QualifiedName>,
    a_direction: Option<bool>,
    resources: Vec<String>,
    r_direction: Option<bool>,
    condition: Option<Condition>,
}

#[derive(Debug, Clone)]
pub struct ConditionBuilder {
    operator: Operator,
    rhs: Match,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl PolicyBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn named(&mut self, id: &str) -> &mut Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn evaluate_statement(&mut self, statement: &mut StatementBuilder) -> &mut Self {
        self.statements.push(statement.clone().build());
        self
    }

    pub fn evaluate_statements(&mut self, statements: &mut [StatementBuilder]) -> &mut Self {
        self.statements
            .extend(statements.iter().cloned().map(StatementBuilder::build));
        self
    }

    pub fn build(&mut self) -> Policy {
        Policy {
            version: self.version,
            id: self.id.clone(),
            statement: match self.statements.len() {
                0 => panic!("a policy must have at least one statement"),
                1 => crate::model::containers::OneOrAll::One(self.statements.remove(0)),
                _ => crate::model::containers::OneOrAll::All(self.statements.drain(..).collect()),
            },
        }
    }
}

impl From<&mut PolicyBuilder> for Policy {
    fn from(pb: &mut PolicyBuilder) -> Self {
        pb.build()
    }
}

impl Default for StatementBuilder {
    fn default() -> Self {
        StatementBuilder {
            sid: None,
            effect: Effect::Deny,
            actions: Vec::new(),
            a_direction: None,
            resources: Vec::new(),
            r_direction: None,
            condition: None,
        }
    }
}

impl StatementBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn named(&mut self, sid: &str) -> &mut Self {
        self.sid = Some(sid.to_string());
        self
    }

    pub fn allows(&mut self) -> &mut Self {
        self.effect = Effect::Allow;
        self
    }

    pub fn denies(&mut self) -> &mut Self {
        self.effect = Effect::Deny;
        self
    }

    pub fn may_perform_any_action(&mut self) -> &mut Self {
        self.a_direction = Some(true);
        self.actions = Vec::new();
        self
    }

    pub fn may_perform_actions(&mut self, actions: Vec<&str>) -> &mut Self {
        match self.a_direction {
            None => self.a_direction = Some(true),
            Some(false) => panic!("a statement cannot have both Action and NotAction"),
            _ => (),
        };
        self.actions
            .extend(actions.iter().map(|s| s.parse().unwrap()));
        self
    }

    pub fn may_not_perform_actions(&mut self, actions: Vec<&str>) -> &mut Self {
        match self.a_direction {
            None => self.a_direction = Some(false),
            Some(true) => panic!("a statement cannot have both Action and NotAction"),
            _ => (),
        };
        self.actions
            .extend(actions.iter().map(|s| s.parse().unwrap()));
        self
    }

    pub fn on_any_resource(&mut self) -> &mut Self {
        self.r_direction = Some(true);
        self.resources = Vec::new();
        self
    }

    pub fn on_resources(&mut self, resources: Vec<&str>) -> &mut Self {
        match self.r_direction {
            None => self.r_direction = Some(true),
            Some(false) => panic!("a statement cannot have both Resource and NotResource"),
            _ => (),
        };
        self.resources
            .extend(resources.iter().map(|s| s.to_string()));
        self
    }

    pub fn not_on_resources(&mut self, resources: Vec<&str>) -> &mut Self {
        match self.r_direction {
            None => self.r_direction = Some(false),
            Some(true) => panic!("a statement cannot have both Resource and NotResource"),
            _ => (),
        };
        self.resources
            .extend(resources.iter().map(|s| s.to_string()));
        self
    }

    pub fn if_condition(&mut self, condition: &mut ConditionBuilder) -> &mut Self {
        let existing = self.condition.get_or_insert_with(Condition::default);
        existing.merge(condition.operator.clone(), condition.rhs.clone());
        self
    }

    pub fn build(self) -> Statement {
        let action = match (self.a_direction, self.actions.len()) {
            (Some(true), 0) => Action::Action(OrAny::Any),
            (Some(true), _) => Action::these_actions(self.actions),
            (Some(false), 0) => Action::NotAction(OrAny::Any),
            (Some(false), _) => Action::not_these_actions(self.actions),
            (None, _) => Action::default(),
        };

        let resource = match (self.r_direction, self.resources.len()) {
            (Some(true), 0) => Resource::Resource(OrAny::Any),
            (Some(true), _) => Resource::these_resources(self.resources),
            (Some(false), 0) => Resource::NotResource(OrAny::Any),
            (Some(false), _) => Resource::not_these_resources(self.resources),
            (None, _) => Resource::default(),
        };

        Statement {
            sid: self.sid,
            effect: self.effect,
            action,
            resource,
            condition: self.condition,
        }
    }
}

impl From<&mut StatementBuilder> for Statement {
    fn from(sb: &mut StatementBuilder) -> Self {
        sb.clone().build()
    }
}

impl ConditionBuilder {
    pub fn new(operator: Operator) -> Self {
        ConditionBuilder {
            operator,
            rhs: Match::default(),
        }
    }

    pub fn new_string_equals() -> Self {
        Self::new(Operator::string_equals())
    }

    pub fn new_string_not_equals() -> Self {
        Self::new(Operator::string_not_equals())
    }

    pub fn new_numeric_equals() -> Self {
        Self::new(Operator::numeric_equals())
    }

    pub fn new_bool() -> Self {
        Self::new(Operator::bool_equals())
    }

    pub fn for_all(&mut self) -> &mut Self {
        self.operator.set_for_all();
        self
    }

    pub fn for_any(&mut self) -> &mut Self {
        self.operator.set_for_any();
        self
    }

    pub fn if_exists(&mut self) -> &mut Self {
        self.operator.set_if_exists();
        self
    }

    pub fn right_hand<S: Into<String>>(&mut self, key: &str, value: S) -> &mut Self {
        self.rhs
            .insert(QualifiedName::new_unchecked(key), value.into());
        self
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::IamValue;

    #[test]
    fn test_simple_builder() {
        let policy: Policy = PolicyBuilder::new()
            .named("confidential-data-access")
            .evaluate_statement(
                StatementBuilder::new()
                    .named("AllowConfidentialRead")
                    .allows()
                    .may_perform_actions(vec!["s3:List*", "s3:Get*"])
                    .on_resources(vec![
                        "arn:aws:s3:::confidential-data",
                        "arn:aws:s3:::confidential-data/*",
                    ]),
            )
            .into();
        assert_eq!(policy.id.as_deref(), Some("confidential-data-access"));
        assert!(policy.to_json().is_ok());
    }

    #[test]
    fn test_condition_builder_attaches_match() {
        let statement = StatementBuilder::new()
            .allows()
            .may_perform_actions(vec!["s3:PutObject"])
            .on_resources(vec!["arn:aws:s3:::bucket/*"])
            .if_condition(ConditionBuilder::new_bool().right_hand("aws:SecureTransport", "true"))
            .clone()
            .build();
        assert!(statement.condition.is_some());
    }
}
