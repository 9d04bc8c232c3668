/*!
The engine's public entry point: `can_what`, answering *"what can this principal do?"* by
fetching its policy bundle from a `DataStore` and running it through `CombinationPipeline`.
*/

use tracing::{info, instrument};

use crate::algebra::datastore::DataStore;
use crate::algebra::emitter::PolicyDocument;
use crate::algebra::ingest::{ActionExpander, CatalogActionExpander};
use crate::algebra::pipeline::CombinationPipeline;
use crate::algebra::shrinker::{CatalogPolicyShrinker, PolicyShrinker};
use crate::error::EngineError;
use crate::service::ServiceCatalog;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Options controlling `can_what`'s post-processing of the emitted document.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// When set, the emitted document's action arrays are compressed with `service:*` wildcards
    /// wherever that substitution is lossless, using the same catalog the default
    /// `CatalogActionExpander` uses.
    pub shrink_action_lists: bool,
    /// The action catalog backing the bundled `CatalogActionExpander`/`CatalogPolicyShrinker`.
    /// Callers with their own live action registry should not use `can_what` directly; they
    /// should drive `CombinationPipeline` themselves with a custom `ActionExpander`.
    pub catalog: ServiceCatalog,
}

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

/// Answers *"what can this principal do?"*, returning the net-effective, canonical policy
/// document after identity, boundary, SCP, and RCP combination.
#[instrument(skip(data_store, options))]
pub fn can_what(
    data_store: &dyn DataStore,
    principal_arn: &str,
    options: &EngineOptions,
) -> Result<PolicyDocument, EngineError> {
    if principal_arn.is_empty() {
        return Err(EngineError::InvalidInput {
            reason: "principal ARN must not be empty".to_string(),
        });
    }

    info!(principal = %principal_arn, "fetching principal policy bundle");
    let bundle = data_store.get_all_policies_for_principal(principal_arn)?;

    let expander = CatalogActionExpander::new(options.catalog.clone());
    let document = run_pipeline(&expander, &bundle)?;

    Ok(if options.shrink_action_lists {
        CatalogPolicyShrinker::new(options.catalog.clone()).shrink(document)
    } else {
        document
    })
}

fn run_pipeline<E: ActionExpander>(
    expander: &E,
    bundle: &crate::algebra::datastore::PrincipalPolicies,
) -> Result<PolicyDocument, EngineError> {
    CombinationPipeline::new(expander).combine(bundle)
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------
