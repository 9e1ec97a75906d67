use std::collections::HashMap;

use crate::model::{Labels, Sample, Timestamp};

const SEP: u8 = 0xff;

/// Canonical grouping key of a label set: labels sorted by name, every
/// name and value followed by a `0xff` byte. Label text is UTF-8, which
/// never contains `0xff`, so distinct label sets never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Vec<u8>);

pub fn signature(labels: &Labels) -> Signature {
    let mut pairs: Vec<_> = labels.iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut buf = Vec::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (name, value) in pairs {
        buf.extend_from_slice(name.as_bytes());
        buf.push(SEP);
        buf.extend_from_slice(value.as_bytes());
        buf.push(SEP);
    }
    Signature(buf)
}

pub type Point = (Timestamp, String);

#[derive(Debug, Clone, PartialEq)]
pub struct InstantSeries {
    pub labels: Labels,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSeries {
    pub labels: Labels,
    pub points: Vec<Point>,
}

/// Keeps the latest sample of every series. On equal timestamps the
/// sample seen first stays.
#[derive(Debug, Default)]
pub struct InstantAggregator {
    index: HashMap<Signature, usize>,
    series: Vec<InstantSeries>,
}

impl InstantAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        let sig = signature(sample.labels());
        let (timestamp, value, labels) = sample.into_parts();

        match self.index.get(&sig) {
            Some(&i) => {
                let current = &mut self.series[i];
                if timestamp > current.point.0 {
                    current.point = (timestamp, value);
                }
            }
            None => {
                self.index.insert(sig, self.series.len());
                self.series.push(InstantSeries {
                    labels,
                    point: (timestamp, value),
                });
            }
        }
    }

    /// Series in the order their label sets were first seen.
    pub fn finish(self) -> Vec<InstantSeries> {
        self.series
    }
}

/// Collects every sample of every series, in arrival order.
#[derive(Debug, Default)]
pub struct RangeAggregator {
    index: HashMap<Signature, usize>,
    series: Vec<RangeSeries>,
}

impl RangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        let sig = signature(sample.labels());
        let (timestamp, value, labels) = sample.into_parts();

        match self.index.get(&sig) {
            Some(&i) => self.series[i].points.push((timestamp, value)),
            None => {
                self.index.insert(sig, self.series.len());
                self.series.push(RangeSeries {
                    labels,
                    points: vec![(timestamp, value)],
                });
            }
        }
    }

    pub fn finish(self) -> Vec<RangeSeries> {
        self.series
    }
}
