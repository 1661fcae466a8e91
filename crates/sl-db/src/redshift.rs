//! Redshift warehouse backend stub
//!
//! The production warehouse is an external collaborator; this placeholder
//! keeps the `warehouse.type: redshift` configuration path honest until a
//! real driver lands.

use crate::error::{DbError, DbResult};
use crate::traits::Warehouse;
use async_trait::async_trait;

/// Redshift warehouse backend (stub implementation)
pub struct RedshiftBackend {
    // Connection details would go here
}

impl RedshiftBackend {
    /// Create a new Redshift backend (not yet implemented)
    pub fn new(_connection_string: &str) -> DbResult<Self> {
        Err(Self::not_implemented("connect"))
    }

    fn not_implemented(feature: &str) -> DbError {
        DbError::NotImplemented {
            backend: "redshift".to_string(),
            feature: feature.to_string(),
        }
    }
}

#[async_trait]
impl Warehouse for RedshiftBackend {
    async fn execute(&self, _sql: &str) -> DbResult<usize> {
        Err(Self::not_implemented("execute"))
    }

    async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
        Err(Self::not_implemented("execute_batch"))
    }

    async fn query_scalar(&self, _sql: &str) -> DbResult<Option<i64>> {
        Err(Self::not_implemented("query_scalar"))
    }

    async fn query_count(&self, _sql: &str) -> DbResult<usize> {
        Err(Self::not_implemented("query_count"))
    }

    async fn relation_exists(&self, _name: &str) -> DbResult<bool> {
        Err(Self::not_implemented("relation_exists"))
    }

    fn warehouse_type(&self) -> &'static str {
        "redshift"
    }
}
