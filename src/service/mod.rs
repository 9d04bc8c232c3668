/*!
A small catalog of service-specific metadata: the actions a service exposes, its resource
types, and the condition keys it contributes. `CatalogActionExpander` (`algebra::ingest`) uses
this catalog to expand `Action::Action(OrAny::Any)`/`NotAction` into concrete action lists.

The catalog can be loaded from TOML when the `service_config` feature is enabled.
*/
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// The actions, resource types, and condition keys a single AWS-like service namespace (e.g.
/// `s3`, `dynamodb`) contributes to the catalog.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub namespace: String,
    pub actions: Vec<String>,
    pub resource_types: Vec<String>,
    #[serde(default)]
    pub condition_keys: Vec<ConditionKey>,
}

///
/// The value-type family of a condition key's right-hand side, used only as advisory metadata;
/// the algebra itself treats all condition values as opaque strings (`model::condition`).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKeyType {
    String,
    Numeric,
    Boolean,
    Binary,
    ARN,
}

///
/// A single condition key a service contributes, e.g. `s3:x-amz-acl`.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionKey {
    pub name: String,
    pub key_type: ConditionKeyType,
}

///
/// A collection of `ServiceConfig`s indexed by namespace, as consumed by `CatalogActionExpander`.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCatalog {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceConfig>,
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceConfig>) -> Self {
        Self { services }
    }

    pub fn service(&self, namespace: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.namespace == namespace)
    }
}

#[cfg(feature = "service_config")]
mod toml_loader {
    use super::ServiceCatalog;
    use std::path::Path;
    use thiserror::Error;

    /// Errors arising while loading a `ServiceCatalog` from a TOML document.
    #[derive(Debug, Error)]
    pub enum CatalogLoadError {
        #[error("could not read service catalog file {path}: {source}")]
        Io {
            path: String,
            #[source]
            source: std::io::Error,
        },
        #[error("could not parse service catalog TOML: {0}")]
        Parse(#[from] toml::de::Error),
    }

    impl ServiceCatalog {
        /// Load a catalog from a TOML file on disk.
        pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml_str(&content)
        }

        /// Parse a catalog from a TOML document already in memory.
        pub fn from_toml_str(content: &str) -> Result<Self, CatalogLoadError> {
            Ok(toml::from_str(content)?)
        }
    }
}

#[cfg(feature = "service_config")]
pub use toml_loader::CatalogLoadError;

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn s3_config() -> ServiceConfig {
        ServiceConfig {
            namespace: "s3".to_string(),
            actions: vec!["GetObject".to_string(), "PutObject".to_string()],
            resource_types: vec!["bucket".to_string(), "object".to_string()],
            condition_keys: vec![ConditionKey {
                name: "x-amz-acl".to_string(),
                key_type: ConditionKeyType::String,
            }],
        }
    }

    #[test]
    fn test_catalog_lookup_by_namespace() {
        let catalog = ServiceCatalog::new(vec![s3_config()]);
        assert!(catalog.service("s3").is_some());
        assert!(catalog.service("dynamodb").is_none());
    }

    #[cfg(feature = "service_config")]
    #[test]
    fn test_catalog_from_toml_str() {
        let toml = r#"
            [[service]]
            namespace = "s3"
            actions = ["GetObject", "PutObject"]
            resource_types = ["bucket", "object"]

            [[service.condition_keys]]
            name = "x-amz-acl"
            key_type = "String"
        "#;
        let catalog = ServiceCatalog::from_toml_str(toml).unwrap();
        let s3 = catalog.service("s3").unwrap();
        assert_eq!(s3.actions, vec!["GetObject".to_string(), "PutObject".to_string()]);
    }
}
