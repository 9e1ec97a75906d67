use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{LabelName, LabelValue, MetricName, METRIC_NAME_LABEL};

lazy_static! {
    static ref LABEL_NAME_RE: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Where the documents of a metric live and how their fields map onto
/// labels, timestamp and value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDescriptor {
    pub name: String,
    #[serde(default)]
    pub time_field: String,
    #[serde(default)]
    pub metric_field: String,
    #[serde(default)]
    pub value_field: String,
    /// Label name -> document field name.
    #[serde(default)]
    pub label_fields: HashMap<LabelName, String>,
    /// Applied when a document lacks the field a label maps to.
    #[serde(default)]
    pub default_labels: HashMap<LabelName, LabelValue>,
}

impl CollectionDescriptor {
    fn validate(&self, key: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config(format!(
                "collection {:?} has no collection name",
                key
            )));
        }

        for label in self.label_fields.keys().chain(self.default_labels.keys()) {
            if label != METRIC_NAME_LABEL && !LABEL_NAME_RE.is_match(label) {
                return Err(Error::Config(format!(
                    "collection {:?}: invalid label name {:?}",
                    key, label
                )));
            }
        }

        for (label, field) in &self.label_fields {
            if field.is_empty() {
                return Err(Error::Config(format!(
                    "collection {:?}: label {:?} maps to an empty field name",
                    key, label
                )));
            }
        }

        Ok(())
    }
}

/// Immutable metric name -> collection lookup, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    collections: HashMap<String, CollectionDescriptor>,
    mappings: HashMap<MetricName, String>,
}

impl MappingTable {
    /// `collections` is keyed by an arbitrary collection key; `mappings` maps
    /// each metric name onto one of those keys.
    pub fn new(
        collections: HashMap<String, CollectionDescriptor>,
        mappings: HashMap<MetricName, String>,
    ) -> Result<Self> {
        for (key, descriptor) in &collections {
            descriptor.validate(key)?;
        }

        for (metric, key) in &mappings {
            if !collections.contains_key(key) {
                return Err(Error::Config(format!(
                    "metric {:?} maps to unknown collection {:?}",
                    metric, key
                )));
            }
        }

        Ok(Self {
            collections,
            mappings,
        })
    }

    pub fn resolve(&self, metric: &str) -> Result<&CollectionDescriptor> {
        self.mappings
            .get(metric)
            .and_then(|key| self.collections.get(key))
            .ok_or_else(|| Error::bad_data(format!("unknown metric {:?}", metric)))
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricName> {
        self.mappings.keys()
    }
}
