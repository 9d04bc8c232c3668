/*!
A symbolic permission algebra for consolidating IAM-style identity, boundary, service-control
and resource-control policies into a single effective policy document.

The crate answers one question: *what can this principal do?* It does not evaluate individual
requests (`is this one call allowed?`) — that is a job for a separate simulator that consults
this crate's model types but lives outside this engine.

# Overview

Raw policy documents (`model::Policy`) are ingested (`algebra::ingest`) into `algebra::Permission`
atoms, held in `algebra::PermissionSet`s. `algebra::CombinationPipeline` combines the identity,
boundary, SCP, and RCP sets using the exact union/intersection/subtraction algebra in
`algebra::permission` and `algebra::condition_algebra`, and `algebra::PolicyEmitter` serializes
the result back into a minimal `model::Policy`-shaped document.

# Example

```
use iam_permission_algebra::algebra::{can_what, InMemoryDataStore, EngineOptions};

let store = InMemoryDataStore::new();
let result = can_what(&store, "arn:aws:iam::123456789012:user/example", &EngineOptions::default());
assert!(result.is_ok());
```
*/

#![warn(
    missing_debug_implementations,
    unused_extern_crates,
    rust_2018_idioms
)]

#[macro_use]
extern crate lazy_static;

pub mod algebra;
pub mod constants;
pub mod error;
pub mod io;
pub mod model;
pub mod service;
pub mod syntax;
