/*!
The symbolic permission algebra: `WildcardPattern` and `ConditionAlgebra` at the leaves,
`Permission`/`PermissionSet` built on top of them, `PolicyIngest`/`PolicyEmitter` at the JSON
boundary, and `CombinationPipeline`/`can_what` orchestrating the whole evaluation for one
principal.
*/

pub mod condition_algebra;
pub mod datastore;
pub mod emitter;
pub mod engine;
pub mod ingest;
pub mod pattern;
pub mod permission;
pub mod permission_set;
pub mod pipeline;
pub mod shrinker;

pub use datastore::{DataStore, GroupPolicies, InMemoryDataStore, Level, PolicyEntry, PrincipalPolicies};
pub use emitter::{EmittedStatement, PolicyDocument, PolicyEmitter};
pub use engine::{can_what, EngineOptions};
pub use ingest::{ActionExpander, CatalogActionExpander, PolicyIngest};
pub use pattern::WildcardPattern;
pub use permission::{Permission, ResourceScope};
pub use permission_set::PermissionSet;
pub use pipeline::CombinationPipeline;
pub use shrinker::{CatalogPolicyShrinker, PolicyShrinker};
