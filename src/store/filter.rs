use bson::{doc, Bson, Document};
use tracing::debug;

use crate::common::time::TimeRange;
use crate::mapping::CollectionDescriptor;
use crate::model::{LabelSet, TimestampTrait};

/// Translate equality matchers and an optional window into a store filter.
///
/// Only labels listed in the descriptor's `label_fields` take part; the rest
/// are dropped. The window becomes a closed `[$gte, $lte]` interval on the
/// descriptor's time field, at millisecond precision.
pub fn build_filter(
    labels: &LabelSet,
    descriptor: &CollectionDescriptor,
    window: Option<&TimeRange>,
) -> Document {
    let mut filter = Document::new();

    for (label, value) in labels {
        match descriptor.label_fields.get(label) {
            Some(field) => {
                filter.insert(field.clone(), Bson::String(value.clone()));
            }
            None => debug!(
                label = label.as_str(),
                collection = descriptor.name.as_str(),
                "label has no field mapping, dropped from filter"
            ),
        }
    }

    if let Some(window) = window {
        if !descriptor.time_field.is_empty() {
            filter.insert(
                descriptor.time_field.clone(),
                doc! {
                    "$gte": bson::DateTime::from_millis(window.start().ceil_millis()),
                    "$lte": bson::DateTime::from_millis(window.end().floor_millis()),
                },
            );
        }
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::test_utils::http_descriptor;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_mapped_labels_only() {
        #[rustfmt::skip]
        let tests = [
            (vec![], doc! {}),
            (vec![("code", "200")], doc! { "status_code": "200" }),
            (vec![("method", "GET")], doc! {}),
            (vec![("code", "500"), ("method", "GET")], doc! { "status_code": "500" }),
            (vec![("environment", "staging")], doc! {}),
        ];

        for (input, expected) in &tests {
            let filter = build_filter(&labels(input), &http_descriptor(), None);
            assert_eq!(*expected, filter, "for {:?}", input);
        }
    }

    #[test]
    fn test_window_is_closed_interval() -> Result<()> {
        let window = TimeRange::new(1609459200.0, 1609459260.5)?;
        let filter = build_filter(
            &labels(&[("code", "200")]),
            &http_descriptor(),
            Some(&window),
        );

        assert_eq!(
            filter,
            doc! {
                "status_code": "200",
                "timestamp": {
                    "$gte": bson::DateTime::from_millis(1609459200000),
                    "$lte": bson::DateTime::from_millis(1609459260500),
                },
            }
        );
        Ok(())
    }

    #[test]
    fn test_window_bounds_stay_inside() -> Result<()> {
        let window = TimeRange::new(9.9994, 10.0006)?;
        let filter = build_filter(&LabelSet::new(), &http_descriptor(), Some(&window));

        assert_eq!(
            filter,
            doc! {
                "timestamp": {
                    "$gte": bson::DateTime::from_millis(10000),
                    "$lte": bson::DateTime::from_millis(10000),
                },
            }
        );
        Ok(())
    }

    #[test]
    fn test_window_without_time_field() -> Result<()> {
        let mut descriptor = http_descriptor();
        descriptor.time_field.clear();

        let window = TimeRange::new(10.0, 20.0)?;
        assert_eq!(build_filter(&LabelSet::new(), &descriptor, Some(&window)), doc! {});
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result<()> {
        let window = TimeRange::new(10.0, 10.0)?;
        let input = labels(&[("code", "404"), ("job", "api")]);

        let first = build_filter(&input, &http_descriptor(), Some(&window));
        let second = build_filter(&input, &http_descriptor(), Some(&window));
        assert_eq!(first, second);
        Ok(())
    }
}
