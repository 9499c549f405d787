//! Resource source trait definition.
//!
//! This module defines the common interface for anything that can supply
//! deployed resource records per namespace and resource type.

use async_trait::async_trait;

use crate::error::Result;
use crate::resource::{ResourceRecord, ResourceType};

/// Trait for deployed-resource collectors.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Collects the deployed records of one resource type in one namespace.
    ///
    /// Returns an empty list when the namespace or type has no resources.
    async fn collect(&self, namespace: &str, resource_type: ResourceType) -> Result<Vec<ResourceRecord>>;

    /// Gets the backend type name.
    fn backend_type(&self) -> &'static str;
}
