use bson::{Bson, Document, RawDocumentBuf};
use chrono::prelude::*;
use thiserror::Error;

use crate::mapping::CollectionDescriptor;
use crate::model::{now, Labels, Sample, Timestamp, TimestampTrait, METRIC_NAME_LABEL};

/// Recovered per-document problem. The sample is still produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Anomaly {
    #[error("time field {0:?} not found, using current time")]
    MissingTime(String),

    #[error("time field {field:?} holds unusable {found}, using current time")]
    UnusableTime { field: String, found: String },

    #[error("value field {0:?} not found, using \"0\"")]
    MissingValue(String),

    #[error("value field {field:?} holds non-numeric {found}, using \"0\"")]
    NonNumericValue { field: String, found: String },

    #[error("metric field {0:?} not found and no __name__ label set")]
    MissingMetricName(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Sample { sample: Sample, anomalies: Vec<Anomaly> },
    /// The raw bytes do not form a valid document.
    Skipped(String),
}

pub fn decode(raw: &RawDocumentBuf, descriptor: &CollectionDescriptor) -> Decoded {
    match raw.to_document() {
        Ok(doc) => decode_document(&doc, descriptor),
        Err(e) => Decoded::Skipped(e.to_string()),
    }
}

pub fn decode_document(doc: &Document, descriptor: &CollectionDescriptor) -> Decoded {
    let mut anomalies = Vec::new();

    let timestamp = timestamp(doc, &descriptor.time_field).unwrap_or_else(|anomaly| {
        anomalies.push(anomaly);
        now()
    });

    let value = value(doc, &descriptor.value_field).unwrap_or_else(|anomaly| {
        anomalies.push(anomaly);
        String::from("0")
    });

    let mut labels: Labels = descriptor.default_labels.clone();
    for (label, field) in &descriptor.label_fields {
        if let Some(v) = doc.get(field) {
            labels.insert(label.clone(), text(v));
        }
    }

    match doc.get(&descriptor.metric_field) {
        Some(name) => {
            labels.insert(METRIC_NAME_LABEL.to_string(), text(name));
        }
        None if !labels.contains_key(METRIC_NAME_LABEL) => {
            anomalies.push(Anomaly::MissingMetricName(descriptor.metric_field.clone()));
        }
        None => (),
    }

    Decoded::Sample {
        sample: Sample::new(timestamp, value, labels),
        anomalies,
    }
}

fn timestamp(doc: &Document, field: &str) -> Result<Timestamp, Anomaly> {
    let unusable = |found: String| Anomaly::UnusableTime {
        field: field.to_string(),
        found,
    };

    match doc.get(field) {
        Some(Bson::DateTime(dt)) => Ok(Timestamp::from_millis(dt.timestamp_millis())),
        Some(Bson::String(s)) => {
            parse_time_string(s).ok_or_else(|| unusable(format!("{:?}", s)))
        }
        Some(Bson::Double(f)) => Ok(*f),
        Some(Bson::Int64(i)) => Ok(*i as Timestamp),
        Some(Bson::Int32(i)) => Ok(*i as Timestamp),
        Some(other) => Err(unusable(format!("{:?}", other.element_type()))),
        None => Err(Anomaly::MissingTime(field.to_string())),
    }
}

/// RFC3339, with or without fractional seconds. Strings without an offset
/// are not accepted.
fn parse_time_string(s: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| Timestamp::from_datetime(&dt))
}

fn value(doc: &Document, field: &str) -> Result<String, Anomaly> {
    let v = doc
        .get(field)
        .ok_or_else(|| Anomaly::MissingValue(field.to_string()))?;

    let repr = match v {
        Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_) => return Ok(text(v)),
        Bson::String(s) => s.clone(),
        other => text(other),
    };

    if repr.parse::<f64>().is_ok() {
        Ok(repr)
    } else {
        Err(Anomaly::NonNumericValue {
            field: field.to_string(),
            found: format!("{:?}", repr),
        })
    }
}

/// Plain text form of a field value, as it appears in a label.
fn text(v: &Bson) -> String {
    match v {
        Bson::String(s) => s.clone(),
        Bson::Double(f) => f.to_string(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => String::new(),
        Bson::ObjectId(id) => id.to_hex(),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        other => other.to_string(),
    }
}
