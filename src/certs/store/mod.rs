//! Record store capability.
//!
//! A store persists [`Record`]s keyed by namespace + name and classifies the two
//! conditions writers act on: a missing record and a conflicting create.
//!
//! ## Available Stores
//!
//! - **InMemoryRecordStore**: process-local map, observable call counters
//! - **FileRecordStore**: one YAML document per record under a root directory

mod file;
mod memory;

pub use file::FileRecordStore;
pub use memory::InMemoryRecordStore;

use async_trait::async_trait;

use super::error::StoreError;
use super::record::{Record, RecordIdentifier};

/// Key/value client for certificate records.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Fetch the record at `identifier`.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no record exists
    async fn get(&self, identifier: &RecordIdentifier) -> Result<Record, StoreError>;

    /// Store a new record.
    ///
    /// # Errors
    ///
    /// - `StoreError::AlreadyExists` if a record already exists at the identifier
    async fn create(&self, record: &Record) -> Result<(), StoreError>;

    /// Replace an existing record. Last writer wins.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no record exists
    async fn update(&self, record: &Record) -> Result<(), StoreError>;
}
