use crate::mapping::CollectionDescriptor;

/// `metrics_http` as laid out by the sample data: `code` lives in
/// `status_code` and `environment` falls back to `production`.
pub(crate) fn http_descriptor() -> CollectionDescriptor {
    CollectionDescriptor {
        name: "metrics_http".into(),
        time_field: "timestamp".into(),
        metric_field: "metric_name".into(),
        value_field: "value".into(),
        label_fields: vec![("code".into(), "status_code".into())]
            .into_iter()
            .collect(),
        default_labels: vec![("environment".into(), "production".into())]
            .into_iter()
            .collect(),
    }
}
