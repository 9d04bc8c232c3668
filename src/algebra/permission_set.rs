/*!
`PermissionSet` — a collection of `Permission` atoms, normalized so that no two atoms in the set
are comparable under `includes` (the narrower one is always redundant once the wider one is
present). Indexed internally by `(service, action)` so that the per-operation work is limited to
atoms that could possibly interact.
*/

use crate::algebra::permission::Permission;
use crate::model::Effect;
use std::collections::BTreeMap;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// A normalized collection of `Permission` atoms, all sharing the same `Effect`.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    effect: Option<Effect>,
    buckets: BTreeMap<(String, String), Vec<Permission>>,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(|v| v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.buckets.values().flatten()
    }

    pub fn into_permissions(self) -> Vec<Permission> {
        self.buckets.into_values().flatten().collect()
    }

    fn bucket_key(permission: &Permission) -> (String, String) {
        (permission.service().to_string(), permission.action().to_string())
    }

    /// Adds `permission` to the set, maintaining the "no atom is comparable to another" invariant
    /// by unioning it against every existing atom sharing its `(service, action)` bucket.
    pub fn add_permission(&mut self, permission: Permission) {
        if self.effect.is_none() {
            self.effect = Some(permission.effect());
        }
        let key = Self::bucket_key(&permission);
        let bucket = self.buckets.entry(key).or_default();

        let mut incoming = permission;
        let mut redundant = false;
        let mut next_bucket = Vec::with_capacity(bucket.len() + 1);

        for existing in bucket.drain(..) {
            if redundant {
                next_bucket.push(existing);
                continue;
            }
            let combined = existing.union(&incoming);
            match combined.len() {
                1 => {
                    let atom = combined.into_iter().next().unwrap();
                    if atom == existing {
                        // `incoming` was redundant: the existing atom already covers it.
                        redundant = true;
                        next_bucket.push(existing);
                    } else if atom == incoming {
                        // `existing` was redundant: drop it, keep scanning with `incoming`.
                        continue;
                    } else {
                        // Neither side alone covers the union: keep scanning with the merged
                        // atom, so a later existing atom can still absorb or be absorbed by it.
                        incoming = atom;
                    }
                }
                _ => next_bucket.push(existing),
            }
        }
        if !redundant {
            next_bucket.push(incoming);
        }
        *bucket = next_bucket;
    }

    /// Adds every atom of `other` into `self`.
    pub fn add_all(&mut self, other: PermissionSet) {
        for permission in other.into_permissions() {
            self.add_permission(permission);
        }
    }

    /// Intersects `self` and `other`; both must share the same `Effect` (or one/both be empty).
    pub fn intersection(&self, other: &PermissionSet) -> Option<PermissionSet> {
        if let (Some(a), Some(b)) = (self.effect, other.effect) {
            if a != b {
                return None;
            }
        }
        let mut result = PermissionSet::new();
        for (key, bucket) in &self.buckets {
            let Some(other_bucket) = other.buckets.get(key) else {
                continue;
            };
            for a in bucket {
                for b in other_bucket {
                    if let Some(atom) = a.intersection(b) {
                        result.add_permission(atom);
                    }
                }
            }
        }
        Some(result)
    }

    /// Subtracts `deny` (a set of `Effect::Deny` atoms) from `self` (a set of `Effect::Allow`
    /// atoms). Each deny atom is folded against the currently-accumulated allow atoms for its
    /// `(service, action)` bucket via `Permission::subtract`; `Allow`-effect residues feed the
    /// next fold, `Deny`-effect residues (the unresolvable-overlap case, where neither atom's
    /// resource pattern subsumes the other) accumulate into the returned deny set. Returns
    /// `(residual allow, synthesized deny)`.
    pub fn subtract(&self, deny: &PermissionSet) -> (PermissionSet, PermissionSet) {
        let mut residual_allow = PermissionSet::new();
        let mut residual_deny = PermissionSet::new();
        for (key, allow_bucket) in &self.buckets {
            let Some(deny_bucket) = deny.buckets.get(key) else {
                for atom in allow_bucket {
                    residual_allow.add_permission(atom.clone());
                }
                continue;
            };
            let mut current: Vec<Permission> = allow_bucket.clone();
            for deny_atom in deny_bucket {
                let mut next = Vec::new();
                for allow_atom in &current {
                    for residue in allow_atom.subtract(deny_atom) {
                        match residue.effect() {
                            Effect::Allow => next.push(residue),
                            Effect::Deny => residual_deny.add_permission(residue),
                        }
                    }
                }
                current = next;
            }
            for atom in current {
                residual_allow.add_permission(atom);
            }
        }
        (residual_allow, residual_deny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::permission::ResourceScope;
    use crate::model::Condition;

    fn allow(service: &str, action: &str, resource: &str) -> Permission {
        Permission::new(
            Effect::Allow,
            service,
            action,
            ResourceScope::Resource(vec![resource.to_string()]),
            Condition::default(),
        )
    }

    #[test]
    fn test_add_permission_drops_redundant_narrower_atom() {
        let mut set = PermissionSet::new();
        set.add_permission(allow("s3", "getobject", "*"));
        set.add_permission(allow("s3", "getobject", "arn:aws:s3:::bucket/*"));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn test_add_permission_merges_distinct_resources() {
        let mut set = PermissionSet::new();
        set.add_permission(allow("s3", "getobject", "arn:aws:s3:::a/*"));
        set.add_permission(allow("s3", "getobject", "arn:aws:s3:::b/*"));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn test_subtract_removes_matching_deny() {
        let mut allow_set = PermissionSet::new();
        allow_set.add_permission(allow("s3", "getobject", "arn:aws:s3:::bucket/*"));
        let mut deny_set = PermissionSet::new();
        deny_set.add_permission(Permission::new(
            Effect::Deny,
            "s3",
            "getobject",
            ResourceScope::Resource(vec!["arn:aws:s3:::bucket/*".to_string()]),
            Condition::default(),
        ));
        let (residual, _) = allow_set.subtract(&deny_set);
        assert!(residual.is_empty());
    }
}
