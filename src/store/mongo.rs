use std::time::Duration;

use async_trait::async_trait;
use bson::{Document, RawDocumentBuf};
use futures::{StreamExt, TryStreamExt};
use mongodb::{options::ClientOptions, Client, Database};
use tracing::{debug, info};

use super::{DocumentStore, DocumentStream};
use crate::error::{Error, Result};

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect lazily: the driver only dials the server on the first query.
    pub async fn connect(uri: &str, database: &str, timeout: Duration) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        info!(database, "mongodb client ready");

        Ok(Self {
            db: client.database(database),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: &str, filter: Document) -> Result<DocumentStream> {
        debug!(collection, %filter, "find");

        let cursor = self
            .db
            .collection::<RawDocumentBuf>(collection)
            .find(filter, None)
            .await?;

        Ok(cursor.map_err(Error::from).boxed())
    }
}
