/*!
`Permission` — a single `(effect, service, action, resource-scope, conditions)` atom and the three
pure binary operations (`includes`, `union`, `intersection`) plus `subtract` that the rest of the
engine composes. The resource scope is a tagged enum rather than a pair of optional fields, which
makes the "resource XOR notResource" invariant a type-level guarantee rather than a runtime check.
*/

use crate::algebra::condition_algebra;
use crate::algebra::pattern::pattern_includes;
use crate::model::{Condition, Effect};
use std::collections::BTreeSet;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Which side of the resource scope a `Permission` carries. Exactly one variant is ever present —
/// see `SPEC_FULL.md` §3's "resource XOR notResource" invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    Resource(Vec<String>),
    NotResource(Vec<String>),
}

/// An immutable, freely shareable permission atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    effect: Effect,
    service: String,
    action: String,
    resource: ResourceScope,
    conditions: Condition,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl Permission {
    pub fn new(
        effect: Effect,
        service: impl Into<String>,
        action: impl Into<String>,
        resource: ResourceScope,
        conditions: Condition,
    ) -> Self {
        Self {
            effect,
            service: service.into(),
            action: action.into(),
            resource,
            conditions,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource(&self) -> &ResourceScope {
        &self.resource
    }

    pub fn conditions(&self) -> &Condition {
        &self.conditions
    }

    fn same_action(&self, other: &Permission) -> bool {
        self.effect == other.effect && self.service == other.service && self.action == other.action
    }

    fn with_conditions(&self, conditions: Condition) -> Permission {
        Permission {
            conditions,
            ..self.clone()
        }
    }

    /// True iff every concrete request `other` allows, `self` also allows.
    pub fn includes(&self, other: &Permission) -> bool {
        if !self.same_action(other) {
            return false;
        }
        if !condition_algebra::inclusion(&self.conditions, &other.conditions) {
            return false;
        }
        match (&self.resource, &other.resource) {
            (ResourceScope::Resource(this_r), ResourceScope::Resource(other_r)) => other_r
                .iter()
                .all(|p2| this_r.iter().any(|p1| pattern_includes(p1, p2))),
            (ResourceScope::NotResource(this_not), ResourceScope::NotResource(other_not)) => {
                this_not
                    .iter()
                    .all(|p1| other_not.iter().any(|p2| pattern_includes(p2, p1)))
            }
            (ResourceScope::Resource(this_r), ResourceScope::NotResource(other_not)) => other_not
                .iter()
                .all(|excluded| this_r.iter().any(|p1| pattern_includes(p1, excluded))),
            (ResourceScope::NotResource(this_not), ResourceScope::Resource(other_r)) => other_r
                .iter()
                .all(|p| !this_not.iter().any(|excluded| pattern_includes(excluded, p))),
        }
    }

    /// Returns 1 or 2 atoms: the union of `self` and `other`, collapsed into one where possible.
    pub fn union(&self, other: &Permission) -> Vec<Permission> {
        if !self.same_action(other) {
            return vec![self.clone(), other.clone()];
        }
        if self.includes(other) {
            return vec![self.clone()];
        }
        if other.includes(self) {
            return vec![other.clone()];
        }
        let Some(merged_conditions) = condition_algebra::merge(&self.conditions, &other.conditions)
        else {
            return vec![self.clone(), other.clone()];
        };
        match (&self.resource, &other.resource) {
            (ResourceScope::Resource(a), ResourceScope::Resource(b)) => {
                vec![Permission {
                    resource: ResourceScope::Resource(dedup_union(a, b)),
                    conditions: merged_conditions,
                    ..self.clone()
                }]
            }
            (ResourceScope::NotResource(a), ResourceScope::NotResource(b)) => {
                vec![Permission {
                    resource: ResourceScope::NotResource(intersect_literal(a, b)),
                    conditions: merged_conditions,
                    ..self.clone()
                }]
            }
            _ => vec![
                self.with_conditions(merged_conditions.clone()),
                other.with_conditions(merged_conditions),
            ],
        }
    }

    /// Returns `None` if the two atoms don't apply to the same action, or their intersection is
    /// empty; otherwise the single atom representing requests both sides allow.
    pub fn intersection(&self, other: &Permission) -> Option<Permission> {
        if !self.same_action(other) {
            return None;
        }
        if let (ResourceScope::Resource(_), ResourceScope::Resource(_)) =
            (&self.resource, &other.resource)
        {
            if self.includes(other) {
                return Some(other.clone());
            }
            if other.includes(self) {
                return Some(self.clone());
            }
        }
        let conditions = condition_algebra::intersection(&self.conditions, &other.conditions)?;
        let resource = match (&self.resource, &other.resource) {
            (ResourceScope::Resource(a), ResourceScope::Resource(b)) => {
                // Only patterns actually subsumed by a pattern on the other side belong in the
                // intersection; a pattern that merely overlaps one on the other side (without
                // either containing the other) has no literal pattern that expresses its
                // narrower, shared requests, so it is dropped rather than carried through whole.
                let mut kept = Vec::new();
                for p in a {
                    if b.iter().any(|q| pattern_includes(q, p)) {
                        kept.push(p.clone());
                    }
                }
                for q in b {
                    if a.iter().any(|p| pattern_includes(p, q)) {
                        kept.push(q.clone());
                    }
                }
                let kept = dedup(kept);
                if kept.is_empty() {
                    return None;
                }
                ResourceScope::Resource(kept)
            }
            (ResourceScope::NotResource(a), ResourceScope::NotResource(b)) => {
                ResourceScope::NotResource(drop_subsumed(&dedup_union(a, b)))
            }
            (ResourceScope::Resource(pos), ResourceScope::NotResource(neg))
            | (ResourceScope::NotResource(neg), ResourceScope::Resource(pos)) => {
                let kept: Vec<String> = pos
                    .iter()
                    .filter(|p| !neg.iter().any(|n| pattern_includes(n, p)))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    return None;
                }
                ResourceScope::Resource(kept)
            }
        };
        Some(Permission {
            effect: self.effect,
            service: self.service.clone(),
            action: self.action.clone(),
            resource,
            conditions,
        })
    }

    /// Subtracts `deny` (which must be `Effect::Deny` on the same service/action) from `self`
    /// (which must be `Effect::Allow`), returning 0, 1, or 2 residue atoms.
    pub fn subtract(&self, deny: &Permission) -> Vec<Permission> {
        if self.effect != Effect::Allow
            || deny.effect != Effect::Deny
            || self.service != deny.service
            || self.action != deny.action
        {
            return vec![self.clone()];
        }

        if self.conditions == deny.conditions && self.fully_covered_by(deny) {
            return vec![];
        }

        let Some(inverted_deny) = condition_algebra::invert(&deny.conditions) else {
            // The deny carries an operator with no defined complement: carving it out of the
            // allow's condition can't be expressed soundly, so the allow is conservatively
            // treated as fully denied rather than risk emitting an over-broad permission.
            return vec![];
        };
        let merged_conditions = condition_algebra::complementary_pair_cleanup(
            condition_algebra::merge(&self.conditions, &inverted_deny)
                .unwrap_or_else(|| shallow_union(&self.conditions, &inverted_deny)),
        );
        let deny_has_conditions = !deny.conditions.is_empty();

        match (&self.resource, &deny.resource) {
            (ResourceScope::Resource(allow_r), ResourceScope::Resource(deny_r)) => {
                if deny_has_conditions {
                    vec![self.with_conditions(merged_conditions)]
                } else {
                    self.subtract_resource_resource(allow_r, deny_r, deny)
                }
            }
            (ResourceScope::Resource(allow_r), ResourceScope::NotResource(deny_not)) => {
                if deny_has_conditions {
                    vec![self.with_conditions(merged_conditions)]
                } else {
                    let residual: Vec<String> = allow_r
                        .iter()
                        .filter(|p| deny_not.iter().any(|x| patterns_overlap(p, x)))
                        .cloned()
                        .collect();
                    if residual.is_empty() {
                        vec![]
                    } else {
                        vec![Permission {
                            resource: ResourceScope::Resource(residual),
                            conditions: self.conditions.clone(),
                            ..self.clone()
                        }]
                    }
                }
            }
            (ResourceScope::NotResource(allow_not), ResourceScope::Resource(deny_r)) => {
                if deny_has_conditions {
                    vec![self.with_conditions(merged_conditions)]
                } else if deny_r
                    .iter()
                    .all(|d| allow_not.iter().any(|p| pattern_includes(p, d)))
                {
                    vec![self.clone()]
                } else {
                    vec![Permission {
                        resource: ResourceScope::NotResource(dedup_union(allow_not, deny_r)),
                        conditions: self.conditions.clone(),
                        ..self.clone()
                    }]
                }
            }
            (ResourceScope::NotResource(allow_not), ResourceScope::NotResource(deny_not)) => {
                if deny_has_conditions {
                    vec![self.with_conditions(merged_conditions)]
                } else {
                    let new_not: Vec<String> = allow_not
                        .iter()
                        .filter(|p| !deny_not.iter().any(|d| pattern_includes(d, p)))
                        .cloned()
                        .collect();
                    vec![Permission {
                        resource: ResourceScope::NotResource(new_not),
                        conditions: self.conditions.clone(),
                        ..self.clone()
                    }]
                }
            }
        }
    }

    fn fully_covered_by(&self, deny: &Permission) -> bool {
        match (&self.resource, &deny.resource) {
            (ResourceScope::Resource(a), ResourceScope::Resource(b))
            | (ResourceScope::NotResource(a), ResourceScope::NotResource(b)) => {
                a.iter().all(|p| b.iter().any(|d| pattern_includes(d, p)))
            }
            _ => false,
        }
    }

    fn subtract_resource_resource(
        &self,
        allow_r: &[String],
        deny_r: &[String],
        deny: &Permission,
    ) -> Vec<Permission> {
        let mut residual = Vec::new();
        let mut any_removed = false;
        let mut any_overlap = false;
        for p in allow_r {
            if deny_r.iter().any(|d| pattern_includes(d, p)) {
                any_removed = true;
                any_overlap = true;
                continue;
            }
            if deny_r.iter().any(|d| patterns_overlap(p, d)) {
                any_overlap = true;
            }
            residual.push(p.clone());
        }
        if any_removed {
            if residual.is_empty() {
                vec![]
            } else {
                vec![Permission {
                    resource: ResourceScope::Resource(residual),
                    conditions: self.conditions.clone(),
                    ..self.clone()
                }]
            }
        } else if any_overlap {
            // Patterns overlap but neither side's literal pattern subsumes the other — pattern
            // subtraction can't express the carve, so both atoms are kept and the emitted
            // document relies on the explicit Deny to narrow the Allow at evaluation time.
            vec![self.clone(), deny.clone()]
        } else {
            vec![self.clone()]
        }
    }
}

fn shallow_union(a: &Condition, b: &Condition) -> Condition {
    let mut result = Condition::default();
    for (operator, m) in a.iter() {
        result.merge(operator.clone(), m.clone());
    }
    for (operator, m) in b.iter() {
        result.merge(operator.clone(), m.clone());
    }
    result
}

fn patterns_overlap(a: &str, b: &str) -> bool {
    pattern_includes(a, b) || pattern_includes(b, a)
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

fn dedup_union(a: &[String], b: &[String]) -> Vec<String> {
    dedup(a.iter().chain(b.iter()).cloned().collect())
}

fn intersect_literal(a: &[String], b: &[String]) -> Vec<String> {
    let b_set: BTreeSet<&str> = b.iter().map(|s| s.as_str()).collect();
    dedup(a.iter().filter(|p| b_set.contains(p.as_str())).cloned().collect())
}

fn drop_subsumed(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .filter(|p| !patterns.iter().any(|q| q != *p && pattern_includes(q, p)))
        .cloned()
        .collect()
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------
