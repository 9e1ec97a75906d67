use async_trait::async_trait;
use bson::{Document, RawDocumentBuf};
use futures::stream::BoxStream;

use crate::error::Result;

mod filter;
mod memory;
mod mongo;

pub use filter::build_filter;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Single-pass stream of raw documents, in cursor order.
pub type DocumentStream = BoxStream<'static, Result<RawDocumentBuf>>;

/// Something that can run a filter against a named collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: Document) -> Result<DocumentStream>;
}
