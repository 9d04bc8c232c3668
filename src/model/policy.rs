/*!
The `Policy` document: `{Version, Id, Statement}`, the root JSON object both ingested by the
algebra and emitted by `algebra::emitter::PolicyEmitter`.
*/

use std::convert::TryFrom;

use crate::error::{empty_vector_property, unexpected_value_for_type, IamFormatError};
use crate::model::containers::OneOrAll;
use crate::model::{Statement, Version};
use crate::syntax::{
    display_to_json, json_type_name, IamValue, ID_NAME, JSON_TYPE_NAME_ARRAY,
    JSON_TYPE_NAME_OBJECT, JSON_TYPE_NAME_STRING, POLICY_NAME, STATEMENT_NAME, VERSION_NAME,
};
use serde_json::{Map, Value};

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// An IAM policy document.
///
/// ## policy_id_string
///
/// Provides a way to include information about the policy as a whole. The id_block is allowed
/// in resource-based policies, but not in identity-based policies.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// The IAM version of the policy grammar used in this resource
    pub version: Option<Version>,
    /// The identifier of this policy, if any
    pub id: Option<String>,
    /// One or more policy statements
    pub statement: OneOrAll<Statement>,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl From<Statement> for Policy {
    fn from(st: Statement) -> Self {
        Policy::unnamed(vec![st]).unwrap()
    }
}

impl TryFrom<Vec<Statement>> for Policy {
    type Error = IamFormatError;

    fn try_from(sts: Vec<Statement>) -> Result<Self, Self::Error> {
        Policy::unnamed(sts)
    }
}

impl IamValue for Policy {
    fn to_json(&self) -> Result<Value, IamFormatError> {
        let mut policy: Map<String, Value> = Default::default();
        if let Some(version) = &self.version {
            let _ = policy.insert(VERSION_NAME.to_string(), display_to_json(version));
        }
        if let Some(id) = &self.id {
            let _ = policy.insert(ID_NAME.to_string(), display_to_json(id));
        }
        let statements: Result<Vec<Value>, IamFormatError> =
            self.statement.as_slice().iter().map(IamValue::to_json).collect();
        let _ = policy.insert(STATEMENT_NAME.to_string(), Value::Array(statements?));
        Ok(Value::Object(policy))
    }

    fn from_json(value: &Value) -> Result<Self, IamFormatError> {
        if let Value::Object(object) = value {
            let version = if let Some(version) = object.get(VERSION_NAME) {
                Some(Version::from_json(version)?)
            } else {
                None
            };

            let id = if let Some(id) = object.get(ID_NAME) {
                if let Value::String(id) = id {
                    Some(id.to_string())
                } else {
                    return Err(IamFormatError::TypeMismatch {
                        name: ID_NAME.to_string(),
                        expecting: JSON_TYPE_NAME_STRING.to_string(),
                        found: json_type_name(value),
                    });
                }
            } else {
                None
            };

            let statement = if let Some(statement) = object.get(STATEMENT_NAME) {
                if let Value::Array(statement) = statement {
                    let statements: Result<Vec<Statement>, IamFormatError> =
                        statement.iter().map(Statement::from_json).collect();
                    OneOrAll::All(statements?)
                } else if let Value::Object(_) = statement {
                    OneOrAll::One(Statement::from_json(statement)?)
                } else {
                    return Err(IamFormatError::TypeMismatch {
                        name: STATEMENT_NAME.to_string(),
                        expecting: JSON_TYPE_NAME_ARRAY.to_string(),
                        found: json_type_name(value),
                    });
                }
            } else {
                return empty_vector_property(STATEMENT_NAME).into();
            };

            Ok(Policy {
                version,
                id,
                statement,
            })
        } else {
            Err(IamFormatError::TypeMismatch {
                name: POLICY_NAME.to_string(),
                expecting: JSON_TYPE_NAME_OBJECT.to_string(),
                found: json_type_name(value),
            })
        }
    }
}

impl Policy {
    pub fn unnamed(statements: Vec<Statement>) -> Result<Self, IamFormatError> {
        if statements.is_empty() {
            empty_vector_property(STATEMENT_NAME).into()
        } else {
            Ok(Self {
                version: Default::default(),
                id: Default::default(),
                statement: OneOrAll::All(statements),
            })
        }
    }

    pub fn named(id: &str, statements: Vec<Statement>) -> Result<Self, IamFormatError> {
        if !Self::is_valid_external_id(id) {
            unexpected_value_for_type(ID_NAME, id).into()
        } else if statements.is_empty() {
            empty_vector_property(STATEMENT_NAME).into()
        } else {
            Ok(Self {
                version: Default::default(),
                id: Some(id.to_string()),
                statement: OneOrAll::All(statements),
            })
        }
    }

    pub fn for_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statement.as_slice().iter()
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statement.into_vec()
    }

    // The external ID value that a third party uses to assume a role must have a minimum of 2
    // characters and a maximum of 1,224 characters: alphanumeric, plus +=,.@:/-
    pub fn is_valid_external_id(s: &str) -> bool {
        s.len() >= 2
            && s.len() <= 1224
            && s.chars().any(|c| {
                c.is_ascii_alphanumeric() || ['+', '=', ',', '.', '@', ':', '/', '-'].contains(&c)
            })
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::{Policy, Statement, Version};
    use crate::syntax::IamValue;

    #[test]
    fn test_simple_policy_to_json() {
        let policy = Policy::unnamed(vec![Statement::unnamed()]).unwrap();
        let object = policy.to_json().unwrap();

        assert_eq!(
            object,
            json!({
              "Statement": [
                {
                  "Action": "*",
                  "Effect": "Deny",
                  "Resource": "*"
                }
              ]
            })
        );
    }

    #[test]
    fn test_named_policy_to_json() {
        let policy = Policy::named("SomePolicyName", vec![Statement::unnamed()])
            .unwrap()
            .for_version(Version::V2012);
        let object = policy.to_json().unwrap();

        assert_eq!(
            object,
            json!({
              "Id": "SomePolicyName",
              "Statement": [
                {
                  "Action": "*",
                  "Effect": "Deny",
                  "Resource": "*"
                }
              ],
              "Version": "2012-10-17"
            })
        );
    }

    #[test]
    fn test_policy_from_json_single_statement_object() {
        let json = json!({
            "Version": "2012-10-17",
            "Statement": {
              "Sid": "AllowListBucket",
              "Effect": "Allow",
              "Action": "s3:ListBucket",
              "Resource": "arn:aws:s3:::example-bucket"
            }
        });

        let policy = Policy::from_json(&json).unwrap();
        assert_eq!(policy.statements().count(), 1);
    }
}
