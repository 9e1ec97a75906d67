use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bson::{Bson, Document, RawDocumentBuf};
use futures::stream::{self, StreamExt};

use super::{DocumentStore, DocumentStream};
use crate::error::{Error, Result};

/// In-process store that understands the subset of the query language
/// `build_filter` produces: field equality plus `$gte` / `$lte`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, document: Document) {
        if let Ok(mut collections) = self.collections.write() {
            collections
                .entry(collection.to_string())
                .or_default()
                .push(document);
        }
    }

    pub fn insert_many<I>(&self, collection: &str, documents: I)
    where
        I: IntoIterator<Item = Document>,
    {
        for document in documents {
            self.insert(collection, document);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: Document) -> Result<DocumentStream> {
        let matched = {
            let collections = self
                .collections
                .read()
                .map_err(|e| Error::Store(e.to_string()))?;

            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|doc| matches(doc, &filter))
                        .map(|doc| {
                            RawDocumentBuf::from_document(doc)
                                .map_err(|e| Error::Store(e.to_string()))
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        };

        Ok(stream::iter(matched).boxed())
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, condition)| {
        let actual = doc.get(field);
        match condition {
            Bson::Document(ops) if is_operator_doc(ops) => ops.iter().all(|(op, operand)| {
                let ord = actual.and_then(|a| compare(a, operand));
                match op.as_str() {
                    "$eq" => ord == Some(Ordering::Equal),
                    "$gte" => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
                    "$lte" => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                    "$gt" => ord == Some(Ordering::Greater),
                    "$lt" => ord == Some(Ordering::Less),
                    _ => false,
                }
            }),
            expected => actual.map_or(false, |a| compare(a, expected) == Some(Ordering::Equal)),
        }
    })
}

fn is_operator_doc(doc: &Document) -> bool {
    doc.keys().next().map_or(false, |k| k.starts_with('$'))
}

/// Type-bracketed comparison: numbers compare across numeric types,
/// everything else only against its own type.
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (a, b) => match (as_number(a), as_number(b)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

fn as_number(v: &Bson) -> Option<f64> {
    match v {
        Bson::Double(f) => Some(*f),
        Bson::Int32(i) => Some(*i as f64),
        Bson::Int64(i) => Some(*i as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use futures::TryStreamExt;

    fn at(ms: i64) -> bson::DateTime {
        bson::DateTime::from_millis(ms)
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_many(
            "metrics_http",
            vec![
                doc! { "n": 1, "status_code": "200", "timestamp": at(1000) },
                doc! { "n": 2, "status_code": 200, "timestamp": at(2000) },
                doc! { "n": 3, "status_code": "500", "timestamp": at(3000) },
            ],
        );
        store
    }

    async fn find_ids(store: &MemoryStore, filter: Document) -> Result<Vec<i32>> {
        let docs: Vec<RawDocumentBuf> = store
            .find("metrics_http", filter)
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_i32("n").ok())
            .collect())
    }

    #[tokio::test]
    async fn test_find() -> Result<()> {
        let store = store();

        #[rustfmt::skip]
        let tests = [
            (doc! {}, vec![1, 2, 3]),
            (doc! { "status_code": "200" }, vec![1]),
            (doc! { "status_code": 200 }, vec![2]),
            (doc! { "missing": "x" }, vec![]),
            (doc! { "timestamp": { "$gte": at(2000), "$lte": at(3000) } }, vec![2, 3]),
            (doc! { "timestamp": { "$gte": at(1001), "$lte": at(1999) } }, vec![]),
            (doc! { "timestamp": { "$gte": 0, "$lte": 5000 } }, vec![]),
        ];

        for (filter, expected) in tests.iter() {
            assert_eq!(*expected, find_ids(&store, filter.clone()).await?, "for {}", filter);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() -> Result<()> {
        let docs: Vec<RawDocumentBuf> = store().find("nope", doc! {}).await?.try_collect().await?;
        assert!(docs.is_empty());
        Ok(())
    }
}
