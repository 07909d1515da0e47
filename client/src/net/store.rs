//! Document store that appends records through the server.

use async_trait::async_trait;
use session::{DocumentStore, Record, StoreError};

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

/// Posts records to `/api/records`; the server writes them with the caller's
/// session credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpDocumentStore;

#[async_trait(?Send)]
impl DocumentStore for HttpDocumentStore {
    async fn append(&self, record: &Record) -> Result<(), StoreError> {
        record.validate()?;
        let result = super::api::append_record(record).await;
        #[cfg(feature = "hydrate")]
        if let Err(e) = &result {
            log::error!("append to {} failed: {e}", record.collection());
        }
        result
    }
}
