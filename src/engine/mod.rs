use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, error, warn};

use crate::api::QueryData;
use crate::decode::{decode, Decoded};
use crate::error::{Error, Result};
use crate::mapping::{CollectionDescriptor, MappingTable};
use crate::model::Sample;
use crate::query::QueryRequest;
use crate::series::{InstantAggregator, RangeAggregator};
use crate::store::{build_filter, DocumentStore, DocumentStream};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(15);

/// Runs validated queries: mapping lookup, filter, store round trip,
/// decoding and series assembly.
#[derive(Clone)]
pub struct Engine {
    table: Arc<MappingTable>,
    store: Arc<dyn DocumentStore>,
    deadline: Duration,
}

impl Engine {
    pub fn new(table: Arc<MappingTable>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            table,
            store,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryData> {
        let descriptor = self.table.resolve(&request.query.metric)?;
        let filter = build_filter(&request.query.labels, descriptor, request.window.as_ref());

        debug!(
            metric = request.query.metric.as_str(),
            collection = descriptor.name.as_str(),
            ranged = request.ranged,
            %filter,
            "executing query"
        );

        let fut = async {
            let docs = self.store.find(&descriptor.name, filter).await?;
            if request.ranged {
                collect_range(docs, descriptor).await
            } else {
                collect_instant(docs, descriptor).await
            }
        };

        match tokio::time::timeout(self.deadline, fut).await {
            Ok(Ok(data)) => {
                debug!(series = data.len(), "query done");
                Ok(data)
            }
            Ok(Err(e)) => {
                error!(collection = descriptor.name.as_str(), error = %e, "query failed");
                Err(e)
            }
            Err(_) => {
                error!(
                    collection = descriptor.name.as_str(),
                    deadline = ?self.deadline,
                    "query timed out"
                );
                Err(Error::Timeout(self.deadline))
            }
        }
    }
}

async fn collect_instant(
    mut docs: DocumentStream,
    descriptor: &CollectionDescriptor,
) -> Result<QueryData> {
    let mut agg = InstantAggregator::new();
    while let Some(raw) = docs.next().await {
        if let Some(sample) = accept(decode(&raw?, descriptor), descriptor) {
            agg.push(sample);
        }
    }
    Ok(QueryData::vector(agg.finish()))
}

async fn collect_range(
    mut docs: DocumentStream,
    descriptor: &CollectionDescriptor,
) -> Result<QueryData> {
    let mut agg = RangeAggregator::new();
    while let Some(raw) = docs.next().await {
        if let Some(sample) = accept(decode(&raw?, descriptor), descriptor) {
            agg.push(sample);
        }
    }
    Ok(QueryData::matrix(agg.finish()))
}

fn accept(decoded: Decoded, descriptor: &CollectionDescriptor) -> Option<Sample> {
    match decoded {
        Decoded::Sample { sample, anomalies } => {
            for anomaly in anomalies {
                warn!(collection = descriptor.name.as_str(), "{}", anomaly);
            }
            Some(sample)
        }
        Decoded::Skipped(reason) => {
            warn!(collection = descriptor.name.as_str(), %reason, "skipping undecodable document");
            None
        }
    }
}
