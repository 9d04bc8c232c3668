/*!
Pure functions over `model::Condition`: inclusion (subsumption), merge (single-block union),
intersection, and inversion — the four operations `algebra::permission::Permission` composes to
implement `includes`/`union`/`intersection`/`subtract`.

Every rule below is keyed off the *base operator family* a `GlobalOperator` belongs to; the
`ForAllValues`/`ForAnyValue` quantifier and the `IfExists` suffix ride along on the operator key
itself and are not otherwise inspected by these rules.
*/

use crate::model::{Condition, ConditionValue, GlobalOperator, Match, Operator, Quantifier};
use std::collections::BTreeSet;
use std::ops::Deref;

// ------------------------------------------------------------------------------------------------
// Operator families
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    /// Positive set-membership: string/arn `equals`/`like`, and (by extrapolation from the
    /// explicit numeric rule) numeric/date `equals`.
    SetMembership,
    /// Negative set-membership: string/arn `not-equals`/`not-like`, and numeric/date `not-equals`.
    SetExclusion,
    NumericLessThan,
    NumericGreaterThan,
    DateLessThan,
    DateGreaterThan,
    Bool,
    IpPositive,
    IpNegative,
    /// No merge/intersect/invert rule is defined for this operator (`BinaryEquals`, `Null`).
    Unknown,
}

fn family(op: GlobalOperator) -> Family {
    use GlobalOperator::*;
    match op {
        StringEquals | StringEqualsIgnoreCase | StringLike | ArnEquals | ArnLike | NumericEquals
        | DateEquals => Family::SetMembership,
        StringNotEquals | StringNotEqualsIgnoreCase | StringNotLike | ArnNotEquals | ArnNotLike
        | NumericNotEquals | DateNotEquals => Family::SetExclusion,
        NumericLessThan | NumericLessThanEquals => Family::NumericLessThan,
        NumericGreaterThan | NumericGreaterThanEquals => Family::NumericGreaterThan,
        DateLessThan | DateLessThanEquals => Family::DateLessThan,
        DateGreaterThan | DateGreaterThanEquals => Family::DateGreaterThan,
        Bool => Family::Bool,
        IpAddress => Family::IpPositive,
        NotIpAddress => Family::IpNegative,
        BinaryEquals | Null => Family::Unknown,
    }
}

fn values_set(values: &[ConditionValue]) -> BTreeSet<&str> {
    values.iter().map(|v| v.deref()).collect()
}

fn boundary(values: &[ConditionValue]) -> Option<f64> {
    values.first().and_then(|v| v.deref().parse::<f64>().ok())
}

// ------------------------------------------------------------------------------------------------
// Inclusion
// ------------------------------------------------------------------------------------------------

/// Does `a` hold in every situation `b` holds? Used to decide `Permission::includes`.
pub fn inclusion(a: &Condition, b: &Condition) -> bool {
    a.iter().all(|(operator, a_match)| match b.get(operator) {
        Some(b_match) => match_inclusion(family(operator.operator), a_match, b_match),
        None => false,
    })
}

fn match_inclusion(family: Family, a: &Match, b: &Match) -> bool {
    a.iter().all(|(key, a_values)| match b.get(key) {
        Some(b_values) => value_inclusion(family, a_values, b_values),
        None => false,
    })
}

fn value_inclusion(family: Family, a_values: &[ConditionValue], b_values: &[ConditionValue]) -> bool {
    match family {
        Family::SetMembership => values_set(b_values).is_subset(&values_set(a_values)),
        Family::SetExclusion => values_set(a_values).is_subset(&values_set(b_values)),
        Family::NumericLessThan => match (boundary(a_values), boundary(b_values)) {
            (Some(a), Some(b)) => b <= a,
            _ => false,
        },
        Family::NumericGreaterThan => match (boundary(a_values), boundary(b_values)) {
            (Some(a), Some(b)) => b >= a,
            _ => false,
        },
        Family::DateLessThan => match (a_values.first(), b_values.first()) {
            (Some(a), Some(b)) => b.deref() <= a.deref(),
            _ => false,
        },
        Family::DateGreaterThan => match (a_values.first(), b_values.first()) {
            (Some(a), Some(b)) => b.deref() >= a.deref(),
            _ => false,
        },
        Family::Bool => values_set(a_values) == values_set(b_values),
        Family::IpPositive | Family::IpNegative => {
            values_set(b_values).is_subset(&values_set(a_values))
        }
        Family::Unknown => false,
    }
}

// ------------------------------------------------------------------------------------------------
// Merge (single-block union)
// ------------------------------------------------------------------------------------------------

/// Merge two conditions into one, as required when two `Allow` atoms are combined into a single
/// statement. Only defined when both sides share the same operator set and, per operator, the
/// same context-key set.
pub fn merge(a: &Condition, b: &Condition) -> Option<Condition> {
    let a_ops: BTreeSet<_> = a.keys().collect();
    let b_ops: BTreeSet<_> = b.keys().collect();
    if a_ops != b_ops {
        return None;
    }

    let mut result = Condition::default();
    for (operator, a_match) in a.iter() {
        let b_match = b.get(operator)?;
        let a_keys: BTreeSet<_> = a_match.keys().collect();
        let b_keys: BTreeSet<_> = b_match.keys().collect();
        if a_keys != b_keys {
            return None;
        }
        let merged = merge_match(family(operator.operator), a_match, b_match)?;
        result.merge(operator.clone(), merged);
    }
    Some(result)
}

fn merge_match(family: Family, a: &Match, b: &Match) -> Option<Match> {
    let mut result = Match::default();
    for (key, a_values) in a.iter() {
        let b_values = b.get(key)?;
        let merged = merge_values(family, a_values, b_values)?;
        result.extend(key.clone(), merged);
    }
    Some(result)
}

fn merge_values(
    family: Family,
    a_values: &[ConditionValue],
    b_values: &[ConditionValue],
) -> Option<Vec<ConditionValue>> {
    match family {
        Family::SetMembership | Family::SetExclusion | Family::IpPositive | Family::IpNegative => {
            Some(union_values(a_values, b_values))
        }
        Family::NumericLessThan | Family::NumericGreaterThan => {
            let (a, b) = (boundary(a_values)?, boundary(b_values)?);
            let widest = if family == Family::NumericLessThan { a.max(b) } else { a.min(b) };
            if widest == a { Some(a_values.to_vec()) } else { Some(b_values.to_vec()) }
        }
        Family::DateLessThan | Family::DateGreaterThan => {
            let (a, b) = (a_values.first()?, b_values.first()?);
            let pick_a = if family == Family::DateLessThan { a.deref() >= b.deref() } else { a.deref() <= b.deref() };
            Some(vec![if pick_a { a.clone() } else { b.clone() }])
        }
        Family::Bool => {
            if values_set(a_values) == values_set(b_values) {
                Some(a_values.to_vec())
            } else {
                None
            }
        }
        Family::Unknown => None,
    }
}

fn union_values(a_values: &[ConditionValue], b_values: &[ConditionValue]) -> Vec<ConditionValue> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut result = Vec::new();
    for v in a_values.iter().chain(b_values.iter()) {
        if seen.insert(v.to_string()) {
            result.push(v.clone());
        }
    }
    result
}

// ------------------------------------------------------------------------------------------------
// Intersection
// ------------------------------------------------------------------------------------------------

/// Intersect two conditions, as required when an `Allow` is constrained by a boundary/SCP/RCP
/// `Allow`. Operator and key sets are unioned; entries present on only one side are carried
/// through unchanged. Returns `None` if any shared key's combination is empty.
pub fn intersection(a: &Condition, b: &Condition) -> Option<Condition> {
    let operators: BTreeSet<_> = a.keys().chain(b.keys()).cloned().collect();
    let mut result = Condition::default();
    for operator in operators {
        match (a.get(&operator), b.get(&operator)) {
            (Some(a_match), Some(b_match)) => {
                let combined = intersect_match(family(operator.operator), a_match, b_match)?;
                result.merge(operator, combined);
            }
            (Some(only), None) | (None, Some(only)) => {
                result.merge(operator, only.clone());
            }
            (None, None) => unreachable!(),
        }
    }
    Some(result)
}

fn intersect_match(family: Family, a: &Match, b: &Match) -> Option<Match> {
    let keys: BTreeSet<_> = a.keys().chain(b.keys()).cloned().collect();
    let mut result = Match::default();
    for key in keys {
        match (a.get(&key), b.get(&key)) {
            (Some(a_values), Some(b_values)) => {
                let combined = intersect_values(family, a_values, b_values)?;
                result.extend(key, combined);
            }
            (Some(only), None) | (None, Some(only)) => {
                result.extend(key, only.clone());
            }
            (None, None) => unreachable!(),
        }
    }
    Some(result)
}

fn intersect_values(
    family: Family,
    a_values: &[ConditionValue],
    b_values: &[ConditionValue],
) -> Option<Vec<ConditionValue>> {
    match family {
        Family::SetMembership | Family::IpPositive => {
            let b_set = values_set(b_values);
            let intersected: Vec<ConditionValue> = a_values
                .iter()
                .filter(|v| b_set.contains(<ConditionValue as Deref>::deref(v)))
                .cloned()
                .collect();
            if intersected.is_empty() {
                None
            } else {
                Some(intersected)
            }
        }
        Family::SetExclusion | Family::IpNegative => Some(union_values(a_values, b_values)),
        Family::NumericLessThan | Family::NumericGreaterThan => {
            let (a, b) = (boundary(a_values)?, boundary(b_values)?);
            let tighter = if family == Family::NumericLessThan { a.min(b) } else { a.max(b) };
            Some(if tighter == a { a_values.to_vec() } else { b_values.to_vec() })
        }
        Family::DateLessThan | Family::DateGreaterThan => {
            let (a, b) = (a_values.first()?, b_values.first()?);
            let pick_a = if family == Family::DateLessThan { a.deref() <= b.deref() } else { a.deref() >= b.deref() };
            Some(vec![if pick_a { a.clone() } else { b.clone() }])
        }
        Family::Bool => {
            if values_set(a_values) == values_set(b_values) {
                Some(a_values.to_vec())
            } else {
                None
            }
        }
        Family::Unknown => None,
    }
}

// ------------------------------------------------------------------------------------------------
// Inversion
// ------------------------------------------------------------------------------------------------

/// Invert every operator in `condition` to its logical complement, for subtracting a conditional
/// `Deny` from an `Allow` (`allowCond ∧ ¬denyCond`). Returns `None` if any operator present has no
/// defined complement — per the engine's error taxonomy this is treated as an unsupported
/// operator and the caller falls back to a conservative full deny.
pub fn invert(condition: &Condition) -> Option<Condition> {
    let mut result = Condition::default();
    for (operator, m) in condition.iter() {
        let inverted_base = invert_operator(operator.operator)?;
        let mut inverted_operator = operator.clone();
        inverted_operator.operator = inverted_base;
        if let Some(quantifier) = operator.quantifier {
            inverted_operator.quantifier = Some(match quantifier {
                Quantifier::ForAllValues => Quantifier::ForAnyValue,
                Quantifier::ForAnyValue => Quantifier::ForAllValues,
            });
        }
        let inverted_match = if operator.operator == GlobalOperator::Bool {
            flip_bool(m)
        } else {
            m.clone()
        };
        result.merge(inverted_operator, inverted_match);
    }
    Some(complementary_pair_cleanup(result))
}

fn invert_operator(op: GlobalOperator) -> Option<GlobalOperator> {
    use GlobalOperator::*;
    Some(match op {
        StringEquals => StringNotEquals,
        StringNotEquals => StringEquals,
        StringLike => StringNotLike,
        StringNotLike => StringLike,
        ArnEquals => ArnNotEquals,
        ArnNotEquals => ArnEquals,
        ArnLike => ArnNotLike,
        ArnNotLike => ArnLike,
        NumericLessThan => NumericGreaterThanEquals,
        NumericGreaterThanEquals => NumericLessThan,
        NumericLessThanEquals => NumericGreaterThan,
        NumericGreaterThan => NumericLessThanEquals,
        NumericEquals => NumericNotEquals,
        NumericNotEquals => NumericEquals,
        DateLessThan => DateGreaterThanEquals,
        DateGreaterThanEquals => DateLessThan,
        DateLessThanEquals => DateGreaterThan,
        DateGreaterThan => DateLessThanEquals,
        Bool => Bool,
        IpAddress => NotIpAddress,
        NotIpAddress => IpAddress,
        StringEqualsIgnoreCase | StringNotEqualsIgnoreCase | DateEquals | DateNotEquals
        | BinaryEquals | Null => return None,
    })
}

fn flip_bool(m: &Match) -> Match {
    let mut result = Match::default();
    for (key, values) in m.iter() {
        let flipped = values
            .iter()
            .map(|v| {
                ConditionValue::from(if v.deref().eq_ignore_ascii_case("true") {
                    "false"
                } else {
                    "true"
                })
            })
            .collect::<Vec<_>>();
        result.extend(key.clone(), flipped);
    }
    result
}

/// Remove keys that, after inversion, appear under both a base operator and its complement within
/// the same condition — the pair cancels for that key (it can never hold both at once).
///
/// Exposed for `algebra::permission::Permission::subtract`, which runs this same cleanup over the
/// result of combining an allow's conditions with an inverted deny's conditions.
pub fn complementary_pair_cleanup(condition: Condition) -> Condition {
    let entries: Vec<(Operator, Match)> = condition.into_inner().into_iter().collect();
    let mut result = Condition::default();
    for (operator, m) in &entries {
        let Some(complement_base) = invert_operator(operator.operator) else {
            result.merge(operator.clone(), m.clone());
            continue;
        };
        let mut complement = operator.clone();
        complement.operator = complement_base;
        let complement_keys: BTreeSet<String> = entries
            .iter()
            .find(|(op, _)| op == &complement)
            .map(|(_, cm)| cm.keys().map(|k| k.to_string()).collect())
            .unwrap_or_default();
        let mut remaining = Match::default();
        for (key, values) in m.iter() {
            if !complement_keys.contains(key.deref() as &str) {
                remaining.extend(key.clone(), values.clone());
            }
        }
        if !remaining.is_empty() {
            result.merge(operator.clone(), remaining);
        }
    }
    result
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QualifiedName;

    fn key(s: &str) -> QualifiedName {
        QualifiedName::new_unchecked(s)
    }

    #[test]
    fn test_inclusion_string_equals_subset() {
        let a = Condition::string_equals(Match::new(key("aws:username"), vec!["alice", "bob"]));
        let b = Condition::string_equals(Match::new_one(key("aws:username"), "alice"));
        assert!(inclusion(&a, &b));
        assert!(!inclusion(&b, &a));
    }

    #[test]
    fn test_merge_fails_on_differing_key_sets() {
        let a = Condition::string_equals(Match::new_one(key("aws:username"), "alice"));
        let b = Condition::string_equals(Match::new_one(key("aws:userid"), "AID123"));
        assert!(merge(&a, &b).is_none());
    }

    #[test]
    fn test_merge_unions_matching_shape() {
        let a = Condition::string_equals(Match::new_one(key("aws:RequestTag/Project"), "A"));
        let b = Condition::string_equals(Match::new_one(key("aws:RequestTag/Project"), "B"));
        let merged = merge(&a, &b).unwrap();
        let values = merged.get(&Operator::string_equals()).unwrap().get(&key("aws:RequestTag/Project")).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_intersection_empty_value_set_fails() {
        let a = Condition::string_equals(Match::new_one(key("aws:username"), "alice"));
        let b = Condition::string_equals(Match::new_one(key("aws:username"), "bob"));
        assert!(intersection(&a, &b).is_none());
    }

    #[test]
    fn test_intersection_carries_through_unmatched_keys() {
        let a = Condition::string_equals(Match::new_one(key("aws:username"), "alice"));
        let b = Condition::string_equals(Match::new_one(key("aws:userid"), "AID123"));
        let combined = intersection(&a, &b).unwrap();
        let m = combined.get(&Operator::string_equals()).unwrap();
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_invert_string_not_equals_round_trips() {
        let original = Condition::string_not_equals(Match::new_one(key("aws:PrincipalOrgId"), "o-1"));
        let inverted = invert(&original).unwrap();
        assert!(inverted.get(&Operator::string_equals()).is_some());
        let back = invert(&inverted).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_invert_unsupported_operator_fails() {
        let c = Condition::new_one(Operator::string_equals_ignore_case(), key("aws:username"), "Alice");
        assert!(invert(&c).is_none());
    }

    #[test]
    fn test_invert_bool_flips_values() {
        let c = Condition::bool_equals(Match::new_one(key("aws:SecureTransport"), "true"));
        let inverted = invert(&c).unwrap();
        let values = inverted.get(&Operator::bool_equals()).unwrap().get(&key("aws:SecureTransport")).unwrap();
        assert_eq!(values[0].to_string(), "false");
    }
}
