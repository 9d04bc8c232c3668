/*!
The `Resource`/`NotResource` statement element.

Resources are kept as raw, possibly wildcarded, pattern strings rather than parsed ARNs — the
algebra (`algebra::pattern::WildcardPattern`) operates on the pattern syntax directly and never
needs structured ARN component access.
*/

use crate::error::{missing_property, type_mismatch, unexpected_properties, IamFormatError};
use crate::model::containers::{MaybeAny, OrAny};
use crate::syntax::{
    display_vec_to_json, json_type_name, IamProperty, IamValue, JSON_TYPE_NAME_STRING,
    POLICY_WILDCARD_VALUE, RESOURCE_NAME, RESOURCE_VALUE_NOT_RESOURCE, RESOURCE_VALUE_RESOURCE,
};
use serde_json::{Map, Value};

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// The Resource element specifies the object or objects that the statement covers. Statements
/// must include either a Resource or a NotResource element.
///
/// From [IAM JSON Policy Elements: Resource](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_resource.html)
/// and [IAM JSON Policy Elements: NotResource](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_notresource.html).
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Asserts that the resource in the request **must** match one of the specified patterns.
    Resource(OrAny<Vec<String>>),
    /// Asserts that the resource in the request **must not** match one of the specified patterns.
    NotResource(OrAny<Vec<String>>),
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl Default for Resource {
    fn default() -> Self {
        Self::Resource(OrAny::Any)
    }
}

impl IamProperty for Resource {
    fn into_json_object(&self, object: &mut Map<String, Value>) -> Result<(), IamFormatError> {
        let _ = match &self {
            Self::Resource(values) => {
                object.insert(RESOURCE_VALUE_RESOURCE.to_string(), values.to_json()?)
            }
            Self::NotResource(values) => {
                object.insert(RESOURCE_VALUE_NOT_RESOURCE.to_string(), values.to_json()?)
            }
        };
        Ok(())
    }

    fn from_json_object(value: &Map<String, Value>) -> Result<Self, IamFormatError>
    where
        Self: Sized,
    {
        match (
            value.get(RESOURCE_VALUE_RESOURCE),
            value.get(RESOURCE_VALUE_NOT_RESOURCE),
        ) {
            (Some(v), None) => Ok(Resource::Resource(OrAny::<Vec<String>>::from_json(v)?)),
            (None, Some(v)) => Ok(Resource::NotResource(OrAny::<Vec<String>>::from_json(v)?)),
            (None, None) => missing_property(RESOURCE_NAME).into(),
            (Some(_), Some(_)) => unexpected_properties(RESOURCE_NAME).into(),
        }
    }
}

impl Resource {
    pub fn any_resource() -> Self {
        Self::Resource(OrAny::Any)
    }

    pub fn this_resource<S: Into<String>>(pattern: S) -> Self {
        Self::Resource(OrAny::Some(vec![pattern.into()]))
    }

    pub fn these_resources<S: Into<String>>(patterns: Vec<S>) -> Self {
        Self::Resource(OrAny::Some(patterns.into_iter().map(Into::into).collect()))
    }

    pub fn not_this_resource<S: Into<String>>(pattern: S) -> Self {
        Self::NotResource(OrAny::Some(vec![pattern.into()]))
    }

    pub fn not_these_resources<S: Into<String>>(patterns: Vec<S>) -> Self {
        Self::NotResource(OrAny::Some(patterns.into_iter().map(Into::into).collect()))
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Resource::NotResource(_))
    }

    pub fn is_any(&self) -> bool {
        matches!(self.inner(), OrAny::Any)
    }

    pub fn some(&self) -> Option<&Vec<String>> {
        self.inner().some()
    }
}

impl MaybeAny<Vec<String>> for Resource {
    fn new_any() -> Self {
        Self::Resource(OrAny::Any)
    }

    fn new_none() -> Self {
        Self::NotResource(OrAny::Any)
    }

    fn inner(&self) -> &OrAny<Vec<String>> {
        match self {
            Resource::Resource(v) => v,
            Resource::NotResource(v) => v,
        }
    }

    fn is_negative(&self) -> bool {
        matches!(self, Resource::NotResource(_))
    }
}

// ------------------------------------------------------------------------------------------------

impl IamValue for OrAny<Vec<String>> {
    fn to_json(&self) -> Result<Value, IamFormatError> {
        Ok(if let OrAny::Some(values) = self {
            display_vec_to_json(values)?
        } else {
            Value::String(POLICY_WILDCARD_VALUE.to_string())
        })
    }

    fn from_json(value: &Value) -> Result<Self, IamFormatError>
    where
        Self: Sized,
    {
        if let Value::String(s) = value {
            if s == POLICY_WILDCARD_VALUE {
                Ok(OrAny::Any)
            } else {
                Ok(OrAny::Some(vec![s.clone()]))
            }
        } else if let Value::Array(arr) = value {
            let results: Result<Vec<String>, IamFormatError> = arr
                .iter()
                .map(|v| {
                    if let Value::String(s) = v {
                        Ok(s.clone())
                    } else {
                        Err(type_mismatch(
                            RESOURCE_NAME,
                            JSON_TYPE_NAME_STRING,
                            json_type_name(v),
                        ))
                    }
                })
                .collect();
            Ok(OrAny::Some(results?))
        } else {
            type_mismatch(RESOURCE_NAME, JSON_TYPE_NAME_STRING, json_type_name(value)).into()
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_default_is_any() {
        assert!(Resource::default().is_any());
    }

    #[test]
    fn test_resource_these_resources() {
        let resource = Resource::these_resources(vec!["arn:aws:s3:::bucket/*"]);
        assert_eq!(resource.some().unwrap().len(), 1);
        assert!(!resource.is_negative());
    }

    #[test]
    fn test_not_resource_is_negative() {
        let resource = Resource::not_this_resource("arn:aws:s3:::secret/*");
        assert!(resource.is_negative());
    }
}
