use super::labels::Labels;
use super::timestamp::Timestamp;

/// A single decoded data point. The value is kept as decimal text, exactly
/// as it goes out in the API response.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    timestamp: Timestamp,
    value: String,
    labels: Labels,
}

impl Sample {
    pub fn new<V: Into<String>>(timestamp: Timestamp, value: V, labels: Labels) -> Self {
        Self {
            timestamp,
            value: value.into(),
            labels,
        }
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn label(&self, name: &str) -> Option<&String> {
        self.labels.get(name)
    }

    pub fn into_parts(self) -> (Timestamp, String, Labels) {
        (self.timestamp, self.value, self.labels)
    }
}
