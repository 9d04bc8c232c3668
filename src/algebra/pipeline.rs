/*!
`CombinationPipeline` — composes one principal's identity, boundary, SCP, and RCP policy bundles
into the net-effective `Allow`/`Deny` residue, then hands the result to `PolicyEmitter`.
*/

use tracing::{debug, info, instrument};

use crate::algebra::datastore::{Level, PrincipalPolicies};
use crate::algebra::emitter::{PolicyDocument, PolicyEmitter};
use crate::algebra::ingest::{ActionExpander, PolicyIngest};
use crate::algebra::permission_set::PermissionSet;
use crate::error::EngineError;
use crate::model::Policy;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Runs the identity → boundary → SCP → RCP combination described in the component design,
/// emitting the net-effective policy document for one principal's bundle.
#[derive(Debug)]
pub struct CombinationPipeline<'a, E: ActionExpander> {
    ingest: PolicyIngest<'a, E>,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl<'a, E: ActionExpander> CombinationPipeline<'a, E> {
    pub fn new(expander: &'a E) -> Self {
        Self {
            ingest: PolicyIngest::new(expander),
        }
    }

    #[instrument(skip(self, bundle))]
    pub fn combine(&self, bundle: &PrincipalPolicies) -> Result<PolicyDocument, EngineError> {
        let identity_policies: Vec<Policy> = bundle.identity_policies().into_iter().cloned().collect();

        debug!(count = identity_policies.len(), "building identity allow set");
        let mut allowed = self.ingest.build_allow_set(&identity_policies)?;

        debug!("building identity deny set");
        let mut identity_deny = self.ingest.build_deny_set(&identity_policies)?;

        if let Some(boundary) = &bundle.permission_boundary {
            debug!(policy = %boundary.name, "intersecting permission boundary");
            let boundary_allow = self.ingest.build_allow_set(std::slice::from_ref(&boundary.policy))?;
            allowed = allowed
                .intersection(&boundary_allow)
                .ok_or_else(|| EngineError::ConstructionViolation {
                    reason: "boundary intersection produced mismatched effects".to_string(),
                })?;
        }

        let mut scp_allows_by_level = Vec::with_capacity(bundle.scps.len());
        for level in &bundle.scps {
            info!(org = %level.org_identifier, "processing SCP level");
            scp_allows_by_level.push(self.level_allow_set(level)?);
            self.fold_level_deny(level, &mut identity_deny)?;
        }

        let mut principal_account_deny = identity_deny.clone();
        let mut rcp_allows_by_level = Vec::with_capacity(bundle.rcps.len());
        for level in &bundle.rcps {
            info!(org = %level.org_identifier, "processing RCP level");
            rcp_allows_by_level.push(self.level_allow_set(level)?);
            self.fold_level_deny(level, &mut principal_account_deny)?;
        }

        for level_allow in scp_allows_by_level.into_iter().chain(rcp_allows_by_level) {
            allowed = allowed
                .intersection(&level_allow)
                .ok_or_else(|| EngineError::ConstructionViolation {
                    reason: "org-level intersection produced mismatched effects".to_string(),
                })?;
        }

        info!("subtracting combined deny footprint");
        let (final_allow, synthesized_deny) = allowed.subtract(&principal_account_deny);

        Ok(PolicyEmitter::emit_document(&final_allow, &synthesized_deny))
    }

    fn level_allow_set(&self, level: &Level) -> Result<PermissionSet, EngineError> {
        let policies: Vec<Policy> = level.policies.iter().map(|entry| entry.policy.clone()).collect();
        self.ingest.build_allow_set(&policies)
    }

    fn fold_level_deny(&self, level: &Level, target: &mut PermissionSet) -> Result<(), EngineError> {
        let policies: Vec<Policy> = level.policies.iter().map(|entry| entry.policy.clone()).collect();
        self.ingest.add_policies_to_permission_set(&policies, crate::model::Effect::Deny, target)
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::datastore::PolicyEntry;
    use crate::algebra::ingest::CatalogActionExpander;
    use crate::model::{Action, Effect, QualifiedName, Resource, Statement};
    use crate::service::{ServiceCatalog, ServiceConfig};

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(vec![
            ServiceConfig {
                namespace: "s3".to_string(),
                actions: vec!["GetObject".to_string(), "ListBucket".to_string()],
                resource_types: vec![],
                condition_keys: vec![],
            },
            ServiceConfig {
                namespace: "ec2".to_string(),
                actions: vec!["RunInstances".to_string()],
                resource_types: vec![],
                condition_keys: vec![],
            },
        ])
    }

    fn allow_statement(service: &str, action: &str, resource: &str) -> Statement {
        Statement::unnamed()
            .allow()
            .action(Action::this_action(QualifiedName::new(service, action).unwrap()))
            .resource(Resource::this_resource(resource))
    }

    #[test]
    fn test_single_identity_allow_passes_through() {
        let expander = CatalogActionExpander::new(catalog());
        let pipeline = CombinationPipeline::new(&expander);
        let mut bundle = PrincipalPolicies::default();
        bundle.inline_policies.push(PolicyEntry {
            name: "inline".to_string(),
            policy: Policy::from(allow_statement("s3", "ListBucket", "*")),
        });
        let document = pipeline.combine(&bundle).unwrap();
        assert_eq!(document.statements.len(), 1);
        assert_eq!(document.statements[0].effect, Effect::Allow);
        assert_eq!(document.statements[0].actions, vec!["s3:listbucket".to_string()]);
    }

    #[test]
    fn test_scp_level_excluding_service_yields_no_allow() {
        let expander = CatalogActionExpander::new(catalog());
        let pipeline = CombinationPipeline::new(&expander);
        let mut bundle = PrincipalPolicies::default();
        bundle.inline_policies.push(PolicyEntry {
            name: "inline".to_string(),
            policy: Policy::from(allow_statement("s3", "GetObject", "arn:aws:s3:::b/*")),
        });
        bundle.scps.push(Level {
            org_identifier: "root".to_string(),
            policies: vec![PolicyEntry {
                name: "root-scp".to_string(),
                policy: Policy::from(allow_statement("s3", "GetObject", "*")),
            }],
        });
        bundle.scps.push(Level {
            org_identifier: "ou".to_string(),
            policies: vec![PolicyEntry {
                name: "ou-scp".to_string(),
                policy: Policy::from(allow_statement("ec2", "RunInstances", "*")),
            }],
        });
        let document = pipeline.combine(&bundle).unwrap();
        assert!(document.statements.is_empty());
    }
}
