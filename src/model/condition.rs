/*!
The `Condition` policy element.

```abnf
<condition_block> = "Condition" : { <condition_map> }
<condition_map> = {
  <condition_type_string> : { <condition_key_string> : <condition_value_list> },
  <condition_type_string> : { <condition_key_string> : <condition_value_list> }, ...
}
<condition_value_list> = [<condition_value>, <condition_value>, ...]
<condition_value> = ("string" | "number" | "Boolean")
```

`Condition`/`Match` are keyed by `BTreeMap` rather than `HashMap`: the permission algebra's
canonical emitter needs to fingerprint a condition map by its sorted textual form, and a
deterministic iteration order means that fingerprint never needs a separate sort pass.
*/

use crate::error::{type_mismatch, unexpected_value_for_type, IamFormatError};
use crate::model::QualifiedName;
use crate::syntax::{
    display_vec_map_to_json, json_type_name, string_vec_from_json, IamProperty, IamValue,
    CONDITION_NAME, CONDITION_OPERATOR_ARN_EQUALS, CONDITION_OPERATOR_ARN_LIKE,
    CONDITION_OPERATOR_ARN_NOT_EQUALS, CONDITION_OPERATOR_ARN_NOT_LIKE,
    CONDITION_OPERATOR_BINARY_EQUALS, CONDITION_OPERATOR_BOOL, CONDITION_OPERATOR_DATE_EQUALS,
    CONDITION_OPERATOR_DATE_GREATER_THAN, CONDITION_OPERATOR_DATE_GREATER_THAN_EQUALS,
    CONDITION_OPERATOR_DATE_LESS_THAN, CONDITION_OPERATOR_DATE_LESS_THAN_EQUALS,
    CONDITION_OPERATOR_DATE_NOT_EQUALS, CONDITION_OPERATOR_IP_ADDRESS,
    CONDITION_OPERATOR_NOT_IP_ADDRESS, CONDITION_OPERATOR_NULL, CONDITION_OPERATOR_NUMERIC_EQUALS,
    CONDITION_OPERATOR_NUMERIC_GREATER_THAN, CONDITION_OPERATOR_NUMERIC_GREATER_THAN_EQUALS,
    CONDITION_OPERATOR_NUMERIC_LESS_THAN, CONDITION_OPERATOR_NUMERIC_LESS_THAN_EQUALS,
    CONDITION_OPERATOR_NUMERIC_NOT_EQUALS, CONDITION_OPERATOR_STRING_EQUALS,
    CONDITION_OPERATOR_STRING_EQUALS_IGNORE_CASE, CONDITION_OPERATOR_STRING_LIKE,
    CONDITION_OPERATOR_STRING_NOT_EQUALS, CONDITION_OPERATOR_STRING_NOT_EQUALS_IGNORE_CASE,
    CONDITION_OPERATOR_STRING_NOT_LIKE, CONDITION_QUANTIFIER_FOR_ALL, CONDITION_QUANTIFIER_FOR_ANY,
    CONDITION_QUANTIFIER_IF_EXISTS, CONDITION_VALUE_NAME, JSON_TYPE_NAME_OBJECT,
};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::iter::FromIterator;
use std::ops::Deref;
use std::str::FromStr;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// A condition block: the full set of operator-keyed matches attached to a statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Condition(BTreeMap<Operator, Match>);

/// The context-key-to-values map nested under a single operator in a `Condition`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Match(BTreeMap<QualifiedName, Vec<ConditionValue>>);

/// A single condition value, stored as its original string representation.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConditionValue(String);

///
/// Pulls apart the string form of an operator used by IAM. It identifies the
/// quantifiers which are used as string prefixes and recognizes the _if exist_
/// suffix as well.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operator {
    /// Used to test multiple keys or multiple values for a single key in a request.
    pub quantifier: Option<Quantifier>,
    /// The condition operator you choose to use.
    pub operator: GlobalOperator,
    /// You use this to say "If the policy key is present in the context of the
    /// request, process the key as specified in the policy. If the key is not
    /// present, evaluate the condition element as true." Other condition elements
    /// in the statement can still result in a nonmatch, but not a missing key
    /// when checked with ...`IfExists`.
    pub if_exists: bool,
}

///
/// You can use the Condition element of a policy to test multiple keys or multiple
/// values for a single key in a request.
///
/// From [Creating a Condition with Multiple Keys or
/// Values](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_multi-value-conditions.html).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantifier {
    /// The condition **must** hold true for **all** values provided.
    ForAllValues,
    /// The condition **must** hold true for **at least** one value provided.
    ForAnyValue,
}

///
/// Use condition operators in the `Condition` element to match the condition
/// key and value in the policy against values in the request context.
///
/// From [IAM JSON Policy Elements: Condition
/// Operators](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlobalOperator {
    // ----- String Condition Operators
    /// Exact matching, case sensitive
    StringEquals,
    /// Negated matching
    StringNotEquals,
    /// Exact matching, ignoring case
    StringEqualsIgnoreCase,
    /// Negated matching, ignoring case
    StringNotEqualsIgnoreCase,
    /// Case-sensitive matching, allowing the `*`/`?` wildcards.
    StringLike,
    /// Negated case-sensitive matching, allowing the `*`/`?` wildcards.
    StringNotLike,
    // ----- Numeric Condition Operators
    /// Matching
    NumericEquals,
    /// Negated matching
    NumericNotEquals,
    /// "Less than" matching
    NumericLessThan,
    /// "Less than or equals" matching
    NumericLessThanEquals,
    /// "Greater than" matching
    NumericGreaterThan,
    /// "Greater than or equals" matching
    NumericGreaterThanEquals,
    // ----- Date Condition Operators
    /// Matching a specific date
    DateEquals,
    /// Negated matching
    DateNotEquals,
    /// Matching before a specific date and time
    DateLessThan,
    /// Matching at or before a specific date and time
    DateLessThanEquals,
    /// Matching after a specific a date and time
    DateGreaterThan,
    /// Matching at or after a specific date and time
    DateGreaterThanEquals,
    // ----- Boolean Condition Operators
    /// Boolean matching
    Bool,
    // ----- Binary Condition Operators
    /// Compares the value of the specified key byte for byte against a
    /// base-64 encoded representation of the binary value in the policy.
    BinaryEquals,
    // ----- IP Address Condition Operators
    /// The specified IP address or range
    IpAddress,
    /// All IP addresses except the specified IP address or range
    NotIpAddress,
    // ----- ARN Condition Operators
    /// Case-sensitive matching of the ARN, colon-component by colon-component,
    /// each of which can include the `*`/`?` wildcards.
    ArnEquals,
    /// Negated equality for ARN.
    ArnNotEquals,
    /// Case-sensitive matching of the ARN, colon-component by colon-component,
    /// each of which can include the `*`/`?` wildcards.
    ArnLike,
    /// Negated matching for ARN.
    ArnNotLike,
    // ------ Check Existence of Condition Keys
    /// Use a Null condition operator to check if a condition key is
    /// present at the time of authorization.
    Null,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl Deref for Condition {
    type Target = BTreeMap<Operator, Match>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<BTreeMap<Operator, Match>> for Condition {
    fn from(v: BTreeMap<Operator, Match>) -> Self {
        Self(v)
    }
}

impl IamProperty for Condition {
    fn into_json_object(&self, object: &mut Map<String, Value>) -> Result<(), IamFormatError> {
        let results: Result<Vec<(String, Value)>, IamFormatError> = self
            .iter()
            .map(|(k, v)| match v.to_json() {
                Ok(v) => Ok((k.to_string(), v)),
                Err(e) => Err(e),
            })
            .collect();
        let inner_object = Map::from_iter(results?.into_iter());
        object.insert(CONDITION_NAME.to_string(), Value::Object(inner_object));
        Ok(())
    }

    fn from_json_object_optional(value: &Map<String, Value>) -> Result<Option<Self>, IamFormatError>
    where
        Self: Sized,
    {
        if value.contains_key(CONDITION_NAME) {
            let value = value.get(CONDITION_NAME).unwrap();
            if let Value::Object(object) = value {
                let results: Result<Vec<(Operator, Match)>, IamFormatError> = object
                    .iter()
                    .map(
                        |(k, v)| match (Operator::from_str(k), Match::from_json(v)) {
                            (Ok(k), Ok(v)) => Ok((k, v)),
                            (Ok(_), Err(e)) => Err(e),
                            (Err(e), Ok(_)) => Err(e),
                            (Err(e), Err(_)) => Err(e),
                        },
                    )
                    .collect();
                let inner_object = BTreeMap::from_iter(results?.into_iter());
                Ok(Some(Self(inner_object)))
            } else {
                type_mismatch(CONDITION_NAME, JSON_TYPE_NAME_OBJECT, json_type_name(value)).into()
            }
        } else {
            Ok(None)
        }
    }

    fn from_json_object(_: &Map<String, Value>) -> Result<Self, IamFormatError>
    where
        Self: Sized,
    {
        unimplemented!()
    }
}

impl Condition {
    pub fn string_equals(matches: Match) -> Self {
        Self::new_match(Operator::string_equals(), matches)
    }

    pub fn string_not_equals(matches: Match) -> Self {
        Self::new_match(Operator::string_not_equals(), matches)
    }

    pub fn string_equals_ignore_case(matches: Match) -> Self {
        Self::new_match(Operator::string_equals_ignore_case(), matches)
    }

    pub fn string_not_equals_ignore_case(matches: Match) -> Self {
        Self::new_match(Operator::string_not_equals_ignore_case(), matches)
    }

    pub fn string_like(matches: Match) -> Self {
        Self::new_match(Operator::string_like(), matches)
    }

    pub fn string_not_like(matches: Match) -> Self {
        Self::new_match(Operator::string_not_like(), matches)
    }

    pub fn numeric_equals(matches: Match) -> Self {
        Self::new_match(Operator::numeric_equals(), matches)
    }

    pub fn numeric_not_equals(matches: Match) -> Self {
        Self::new_match(Operator::numeric_not_equals(), matches)
    }

    pub fn numeric_less_than(matches: Match) -> Self {
        Self::new_match(Operator::numeric_less_than(), matches)
    }

    pub fn numeric_less_than_or_equals(matches: Match) -> Self {
        Self::new_match(Operator::numeric_less_than_or_equals(), matches)
    }

    pub fn numeric_greater_than(matches: Match) -> Self {
        Self::new_match(Operator::numeric_greater_than(), matches)
    }

    pub fn numeric_greater_than_or_equals(matches: Match) -> Self {
        Self::new_match(Operator::numeric_greater_than_or_equals(), matches)
    }

    pub fn date_equals(matches: Match) -> Self {
        Self::new_match(Operator::date_equals(), matches)
    }

    pub fn date_not_equals(matches: Match) -> Self {
        Self::new_match(Operator::date_not_equals(), matches)
    }

    pub fn date_less_than(matches: Match) -> Self {
        Self::new_match(Operator::date_less_than(), matches)
    }

    pub fn date_less_than_or_equals(matches: Match) -> Self {
        Self::new_match(Operator::date_less_than_or_equals(), matches)
    }

    pub fn date_greater_than(matches: Match) -> Self {
        Self::new_match(Operator::date_greater_than(), matches)
    }

    pub fn date_greater_than_or_equals(matches: Match) -> Self {
        Self::new_match(Operator::date_greater_than_or_equals(), matches)
    }

    pub fn bool_equals(matches: Match) -> Self {
        Self::new_match(Operator::bool_equals(), matches)
    }

    pub fn binary_equals(matches: Match) -> Self {
        Self::new_match(Operator::binary_equals(), matches)
    }

    pub fn ip_address(matches: Match) -> Self {
        Self::new_match(Operator::ip_address(), matches)
    }

    pub fn not_ip_address(matches: Match) -> Self {
        Self::new_match(Operator::not_ip_address(), matches)
    }

    pub fn arn_equals(matches: Match) -> Self {
        Self::new_match(Operator::arn_equals(), matches)
    }

    pub fn arn_not_equals(matches: Match) -> Self {
        Self::new_match(Operator::arn_not_equals(), matches)
    }

    pub fn arn_like(matches: Match) -> Self {
        Self::new_match(Operator::arn_like(), matches)
    }

    pub fn arn_not_like(matches: Match) -> Self {
        Self::new_match(Operator::arn_not_like(), matches)
    }

    pub fn null(matches: Match) -> Self {
        Self::new_match(Operator::null(), matches)
    }

    pub fn new_one<S>(operator: Operator, context_key: QualifiedName, value: S) -> Self
    where
        S: Into<ConditionValue>,
    {
        Self::new_match(operator, Match::new_one(context_key, value))
    }

    pub fn new<S>(operator: Operator, context_key: QualifiedName, value: Vec<S>) -> Self
    where
        S: Into<ConditionValue>,
    {
        Self::new_match(operator, Match::new(context_key, value))
    }

    pub fn new_match(operator: Operator, matches: Match) -> Self {
        Self(BTreeMap::from_iter(vec![(operator, matches)].into_iter()))
    }

    pub fn insert<S>(&mut self, operator: Operator, context_key: QualifiedName, value: S)
    where
        S: Into<ConditionValue>,
    {
        if let Some(existing) = self.0.get_mut(&operator) {
            existing.insert(context_key, value);
        } else {
            self.0.insert(operator, Match::new_one(context_key, value));
        }
    }

    pub fn into_inner(self) -> BTreeMap<Operator, Match> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge a `Match` block into this condition under `operator`, extending any existing
    /// per-key value lists rather than overwriting them.
    pub fn merge(&mut self, operator: Operator, other: Match) {
        if let Some(existing) = self.0.get_mut(&operator) {
            for (key, values) in other.into_inner() {
                existing.extend(key, values);
            }
        } else {
            self.0.insert(operator, other);
        }
    }
}

// ------------------------------------------------------------------------------------------------

impl Deref for Match {
    type Target = BTreeMap<QualifiedName, Vec<ConditionValue>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<BTreeMap<QualifiedName, Vec<ConditionValue>>> for Match {
    fn from(v: BTreeMap<QualifiedName, Vec<ConditionValue>>) -> Self {
        Self(v)
    }
}

impl IamValue for Match {
    fn to_json(&self) -> Result<Value, IamFormatError> {
        display_vec_map_to_json(self)
    }

    fn from_json(value: &Value) -> Result<Self, IamFormatError> {
        if let Value::Object(object) = value {
            let results: Result<Vec<(QualifiedName, Vec<ConditionValue>)>, IamFormatError> = object
                .iter()
                .map(|(k, v)| {
                    match (
                        QualifiedName::from_str(k),
                        string_vec_from_json(v, CONDITION_VALUE_NAME),
                    ) {
                        (Ok(k), Ok(v)) => Ok((k, v)),
                        (Ok(_), Err(e)) => Err(e),
                        (Err(e), Ok(_)) => Err(e),
                        (Err(e), Err(_)) => Err(e),
                    }
                })
                .collect();
            Ok(Self(BTreeMap::from_iter(results?)))
        } else {
            type_mismatch(CONDITION_NAME, JSON_TYPE_NAME_OBJECT, json_type_name(value)).into()
        }
    }
}

impl Match {
    pub fn new_one<S>(context_key: QualifiedName, value: S) -> Self
    where
        S: Into<ConditionValue>,
    {
        Self::new(context_key, vec![value])
    }

    pub fn new<S>(context_key: QualifiedName, values: Vec<S>) -> Self
    where
        S: Into<ConditionValue>,
    {
        Self(BTreeMap::from_iter(
            vec![(context_key, values.into_iter().map(|v| v.into()).collect())].into_iter(),
        ))
    }

    pub fn insert<S>(&mut self, context_key: QualifiedName, value: S)
    where
        S: Into<ConditionValue>,
    {
        if let Some(existing) = self.0.get_mut(&context_key) {
            existing.push(value.into());
        } else {
            self.0.insert(context_key, vec![value.into()]);
        }
    }

    pub fn extend<S>(&mut self, context_key: QualifiedName, values: Vec<S>)
    where
        S: Into<ConditionValue>,
    {
        let values: Vec<ConditionValue> = values.into_iter().map(|v| v.into()).collect();
        if let Some(existing) = self.0.get_mut(&context_key) {
            existing.extend(values);
        } else {
            self.0.insert(context_key, values);
        }
    }

    pub fn into_inner(self) -> BTreeMap<QualifiedName, Vec<ConditionValue>> {
        self.0
    }
}

// ------------------------------------------------------------------------------------------------

const CHAR_OPERATOR_SEP: char = ':';

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(quantifier) = &self.quantifier {
            write!(f, "{}{}", quantifier, CHAR_OPERATOR_SEP)?;
        }

        write!(f, "{}", self.operator)?;

        if self.if_exists {
            write!(f, "{}", CONDITION_QUANTIFIER_IF_EXISTS)?;
        }

        Ok(())
    }
}

impl FromStr for Operator {
    type Err = IamFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split(CHAR_OPERATOR_SEP).collect();
        if parts.len() == 1 || parts.len() == 2 {
            let mut operator = Operator {
                quantifier: None,
                operator: GlobalOperator::Bool,
                if_exists: false,
            };

            if parts.len() == 2 {
                let quantifier = Quantifier::from_str(parts.remove(0))?;
                operator.quantifier = Some(quantifier);
            }

            let mut op_string = parts.remove(0);
            if op_string.ends_with(CONDITION_QUANTIFIER_IF_EXISTS) {
                operator.if_exists = true;
                op_string = &op_string[..op_string.len() - CONDITION_QUANTIFIER_IF_EXISTS.len()];
            }
            operator.operator = GlobalOperator::from_str(op_string)?;
            Ok(operator)
        } else {
            unexpected_value_for_type(CONDITION_NAME, s).into()
        }
    }
}

impl Operator {
    pub fn string_equals() -> Self {
        Self::plain(GlobalOperator::StringEquals)
    }

    pub fn string_not_equals() -> Self {
        Self::plain(GlobalOperator::StringNotEquals)
    }

    pub fn string_equals_ignore_case() -> Self {
        Self::plain(GlobalOperator::StringEqualsIgnoreCase)
    }

    pub fn string_not_equals_ignore_case() -> Self {
        Self::plain(GlobalOperator::StringNotEqualsIgnoreCase)
    }

    pub fn string_like() -> Self {
        Self::plain(GlobalOperator::StringLike)
    }

    pub fn string_not_like() -> Self {
        Self::plain(GlobalOperator::StringNotLike)
    }

    pub fn numeric_equals() -> Self {
        Self::plain(GlobalOperator::NumericEquals)
    }

    pub fn numeric_not_equals() -> Self {
        Self::plain(GlobalOperator::NumericNotEquals)
    }

    pub fn numeric_less_than() -> Self {
        Self::plain(GlobalOperator::NumericLessThan)
    }

    pub fn numeric_less_than_or_equals() -> Self {
        Self::plain(GlobalOperator::NumericLessThanEquals)
    }

    pub fn numeric_greater_than() -> Self {
        Self::plain(GlobalOperator::NumericGreaterThan)
    }

    pub fn numeric_greater_than_or_equals() -> Self {
        Self::plain(GlobalOperator::NumericGreaterThanEquals)
    }

    pub fn date_equals() -> Self {
        Self::plain(GlobalOperator::DateEquals)
    }

    pub fn date_not_equals() -> Self {
        Self::plain(GlobalOperator::DateNotEquals)
    }

    pub fn date_less_than() -> Self {
        Self::plain(GlobalOperator::DateLessThan)
    }

    pub fn date_less_than_or_equals() -> Self {
        Self::plain(GlobalOperator::DateLessThanEquals)
    }

    pub fn date_greater_than() -> Self {
        Self::plain(GlobalOperator::DateGreaterThan)
    }

    pub fn date_greater_than_or_equals() -> Self {
        Self::plain(GlobalOperator::DateGreaterThanEquals)
    }

    pub fn bool_equals() -> Self {
        Self::plain(GlobalOperator::Bool)
    }

    pub fn binary_equals() -> Self {
        Self::plain(GlobalOperator::BinaryEquals)
    }

    pub fn ip_address() -> Self {
        Self::plain(GlobalOperator::IpAddress)
    }

    pub fn not_ip_address() -> Self {
        Self::plain(GlobalOperator::NotIpAddress)
    }

    pub fn arn_equals() -> Self {
        Self::plain(GlobalOperator::ArnEquals)
    }

    pub fn arn_not_equals() -> Self {
        Self::plain(GlobalOperator::ArnNotEquals)
    }

    pub fn arn_like() -> Self {
        Self::plain(GlobalOperator::ArnLike)
    }

    pub fn arn_not_like() -> Self {
        Self::plain(GlobalOperator::ArnNotLike)
    }

    pub fn null() -> Self {
        Self::plain(GlobalOperator::Null)
    }

    fn plain(operator: GlobalOperator) -> Self {
        Self {
            quantifier: None,
            operator,
            if_exists: false,
        }
    }

    pub fn is_for_any(&self) -> bool {
        matches!(self.quantifier, Some(Quantifier::ForAnyValue))
    }

    pub fn set_for_any(&mut self) {
        self.quantifier = Some(Quantifier::ForAnyValue);
    }

    pub fn is_for_all(&self) -> bool {
        matches!(self.quantifier, Some(Quantifier::ForAllValues))
    }

    pub fn set_for_all(&mut self) {
        self.quantifier = Some(Quantifier::ForAllValues);
    }

    pub fn is_if_exists(&self) -> bool {
        self.if_exists
    }

    pub fn set_if_exists(&mut self) {
        self.if_exists = true;
    }

    /// Same base operator and quantifier, ignoring the `IfExists` suffix — used by the
    /// condition algebra's inclusion/merge rules, which treat `IfExists` as an evaluation-time
    /// relaxation rather than a distinct comparison.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.quantifier == other.quantifier && self.operator == other.operator
    }
}

// ------------------------------------------------------------------------------------------------

impl Display for Quantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::ForAllValues => CONDITION_QUANTIFIER_FOR_ALL,
                Self::ForAnyValue => CONDITION_QUANTIFIER_FOR_ANY,
            }
        )
    }
}

impl FromStr for Quantifier {
    type Err = IamFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CONDITION_QUANTIFIER_FOR_ALL => Ok(Self::ForAllValues),
            CONDITION_QUANTIFIER_FOR_ANY => Ok(Self::ForAnyValue),
            _ => unexpected_value_for_type(CONDITION_NAME, s).into(),
        }
    }
}

// ------------------------------------------------------------------------------------------------

impl From<GlobalOperator> for QualifiedName {
    fn from(v: GlobalOperator) -> Self {
        QualifiedName::new_unchecked(v.to_string())
    }
}

impl Display for GlobalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::StringEquals => CONDITION_OPERATOR_STRING_EQUALS,
                Self::StringNotEquals => CONDITION_OPERATOR_STRING_NOT_EQUALS,
                Self::StringEqualsIgnoreCase => CONDITION_OPERATOR_STRING_EQUALS_IGNORE_CASE,
                Self::StringNotEqualsIgnoreCase => CONDITION_OPERATOR_STRING_NOT_EQUALS_IGNORE_CASE,
                Self::StringLike => CONDITION_OPERATOR_STRING_LIKE,
                Self::StringNotLike => CONDITION_OPERATOR_STRING_NOT_LIKE,
                Self::NumericEquals => CONDITION_OPERATOR_NUMERIC_EQUALS,
                Self::NumericNotEquals => CONDITION_OPERATOR_NUMERIC_NOT_EQUALS,
                Self::NumericLessThan => CONDITION_OPERATOR_NUMERIC_LESS_THAN,
                Self::NumericLessThanEquals => CONDITION_OPERATOR_NUMERIC_LESS_THAN_EQUALS,
                Self::NumericGreaterThan => CONDITION_OPERATOR_NUMERIC_GREATER_THAN,
                Self::NumericGreaterThanEquals => CONDITION_OPERATOR_NUMERIC_GREATER_THAN_EQUALS,
                Self::DateEquals => CONDITION_OPERATOR_DATE_EQUALS,
                Self::DateNotEquals => CONDITION_OPERATOR_DATE_NOT_EQUALS,
                Self::DateLessThan => CONDITION_OPERATOR_DATE_LESS_THAN,
                Self::DateLessThanEquals => CONDITION_OPERATOR_DATE_LESS_THAN_EQUALS,
                Self::DateGreaterThan => CONDITION_OPERATOR_DATE_GREATER_THAN,
                Self::DateGreaterThanEquals => CONDITION_OPERATOR_DATE_GREATER_THAN_EQUALS,
                Self::Bool => CONDITION_OPERATOR_BOOL,
                Self::BinaryEquals => CONDITION_OPERATOR_BINARY_EQUALS,
                Self::IpAddress => CONDITION_OPERATOR_IP_ADDRESS,
                Self::NotIpAddress => CONDITION_OPERATOR_NOT_IP_ADDRESS,
                Self::ArnEquals => CONDITION_OPERATOR_ARN_EQUALS,
                Self::ArnNotEquals => CONDITION_OPERATOR_ARN_NOT_EQUALS,
                Self::ArnLike => CONDITION_OPERATOR_ARN_LIKE,
                Self::ArnNotLike => CONDITION_OPERATOR_ARN_NOT_LIKE,
                Self::Null => CONDITION_OPERATOR_NULL,
            }
        )
    }
}

impl FromStr for GlobalOperator {
    type Err = IamFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CONDITION_OPERATOR_STRING_EQUALS => Ok(Self::StringEquals),
            CONDITION_OPERATOR_STRING_NOT_EQUALS => Ok(Self::StringNotEquals),
            CONDITION_OPERATOR_STRING_EQUALS_IGNORE_CASE => Ok(Self::StringEqualsIgnoreCase),
            CONDITION_OPERATOR_STRING_NOT_EQUALS_IGNORE_CASE => Ok(Self::StringNotEqualsIgnoreCase),
            CONDITION_OPERATOR_STRING_LIKE => Ok(Self::StringLike),
            CONDITION_OPERATOR_STRING_NOT_LIKE => Ok(Self::StringNotLike),
            CONDITION_OPERATOR_NUMERIC_EQUALS => Ok(Self::NumericEquals),
            CONDITION_OPERATOR_NUMERIC_NOT_EQUALS => Ok(Self::NumericNotEquals),
            CONDITION_OPERATOR_NUMERIC_LESS_THAN => Ok(Self::NumericLessThan),
            CONDITION_OPERATOR_NUMERIC_LESS_THAN_EQUALS => Ok(Self::NumericLessThanEquals),
            CONDITION_OPERATOR_NUMERIC_GREATER_THAN => Ok(Self::NumericGreaterThan),
            CONDITION_OPERATOR_NUMERIC_GREATER_THAN_EQUALS => Ok(Self::NumericGreaterThanEquals),
            CONDITION_OPERATOR_DATE_EQUALS => Ok(Self::DateEquals),
            CONDITION_OPERATOR_DATE_NOT_EQUALS => Ok(Self::DateNotEquals),
            CONDITION_OPERATOR_DATE_LESS_THAN => Ok(Self::DateLessThan),
            CONDITION_OPERATOR_DATE_LESS_THAN_EQUALS => Ok(Self::DateLessThanEquals),
            CONDITION_OPERATOR_DATE_GREATER_THAN => Ok(Self::DateGreaterThan),
            CONDITION_OPERATOR_DATE_GREATER_THAN_EQUALS => Ok(Self::DateGreaterThanEquals),
            CONDITION_OPERATOR_BOOL => Ok(Self::Bool),
            CONDITION_OPERATOR_BINARY_EQUALS => Ok(Self::BinaryEquals),
            CONDITION_OPERATOR_IP_ADDRESS => Ok(Self::IpAddress),
            CONDITION_OPERATOR_NOT_IP_ADDRESS => Ok(Self::NotIpAddress),
            CONDITION_OPERATOR_ARN_EQUALS => Ok(Self::ArnEquals),
            CONDITION_OPERATOR_ARN_NOT_EQUALS => Ok(Self::ArnNotEquals),
            CONDITION_OPERATOR_ARN_LIKE => Ok(Self::ArnLike),
            CONDITION_OPERATOR_ARN_NOT_LIKE => Ok(Self::ArnNotLike),
            CONDITION_OPERATOR_NULL => Ok(Self::Null),
            _ => unexpected_value_for_type(CONDITION_NAME, s).into(),
        }
    }
}

// ------------------------------------------------------------------------------------------------

lazy_static! {
    static ref REGEX_VARIABLE: Regex = Regex::new(r"\$\{([^$}]+)\}").unwrap();
}

impl Display for ConditionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for ConditionValue {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> From<T> for ConditionValue
where
    T: Into<String>,
{
    fn from(s: T) -> Self {
        Self(s.into())
    }
}

impl ConditionValue {
    /// Return `true` if the identifier contains variables of the form
    /// `${name}`, else `false`.
    pub fn has_variables(&self) -> bool {
        REGEX_VARIABLE.is_match(self.deref())
    }

    /// Replace any variables in the string with values from the context,
    /// returning a new value if the replacements result in a legal identifier
    /// string.
    pub fn replace_variables<V>(&self, context: &BTreeMap<String, V>) -> Result<Self, IamFormatError>
    where
        V: Clone + Into<String>,
    {
        let new_text = REGEX_VARIABLE.replace_all(self.deref(), |caps: &Captures<'_>| {
            if let Some(value) = context.get(&caps[1]) {
                value.clone().into()
            } else {
                format!("${{{}}}", &caps[1])
            }
        });
        Ok(Self(new_text.to_string()))
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equals_operator_is_not_string_not_like() {
        assert_eq!(Operator::numeric_equals().operator, GlobalOperator::NumericEquals);
    }

    #[test]
    fn test_global_operator_round_trips_string_not_equals() {
        assert_eq!(
            GlobalOperator::from_str("StringNotEquals").unwrap(),
            GlobalOperator::StringNotEquals
        );
    }

    #[test]
    fn test_operator_display_with_quantifier_and_if_exists() {
        let mut op = Operator::string_equals();
        op.set_for_any();
        op.set_if_exists();
        assert_eq!(op.to_string(), "ForAnyValue:StringEqualsIfExists");
    }

    #[test]
    fn test_operator_from_str_round_trip() {
        let op = Operator::from_str("ForAllValues:NumericLessThanIfExists").unwrap();
        assert!(op.is_for_all());
        assert!(op.is_if_exists());
        assert_eq!(op.operator, GlobalOperator::NumericLessThan);
    }

    #[test]
    fn test_condition_value_replace_variables() {
        let value = ConditionValue::from("user/${aws:username}");
        assert!(value.has_variables());
        let mut context = BTreeMap::new();
        context.insert("aws:username".to_string(), "alice".to_string());
        let replaced = value.replace_variables(&context).unwrap();
        assert_eq!(replaced.to_string(), "user/alice");
    }

    #[test]
    fn test_condition_insert_and_to_json() {
        let mut condition = Condition::string_equals(Match::new_one(
            QualifiedName::new_unchecked("s3:x-amz-acl"),
            "public-read",
        ));
        condition.insert(
            Operator::string_equals(),
            QualifiedName::new_unchecked("s3:x-amz-acl"),
            "bucket-owner-full-control",
        );
        assert_eq!(condition.len(), 1);
    }
}
