use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::Error;
use crate::series::{InstantSeries, Point, RangeSeries};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorItem {
    metric: BTreeMap<String, String>,
    value: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixItem {
    metric: BTreeMap<String, String>,
    values: Vec<Point>,
}

impl From<InstantSeries> for VectorItem {
    fn from(series: InstantSeries) -> Self {
        Self {
            metric: series.labels.into_iter().collect(),
            value: series.point,
        }
    }
}

impl From<RangeSeries> for MatrixItem {
    fn from(series: RangeSeries) -> Self {
        Self {
            metric: series.labels.into_iter().collect(),
            values: series.points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryData {
    Vector(Vec<VectorItem>),
    Matrix(Vec<MatrixItem>),
}

impl QueryData {
    pub fn vector(series: Vec<InstantSeries>) -> Self {
        QueryData::Vector(series.into_iter().map(Into::into).collect())
    }

    pub fn matrix(series: Vec<RangeSeries>) -> Self {
        QueryData::Matrix(series.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            QueryData::Vector(v) => v.len(),
            QueryData::Matrix(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The Prometheus HTTP API envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    Success {
        data: QueryData,
    },
    Error {
        #[serde(rename = "errorType")]
        error_type: &'static str,
        error: String,
    },
}

impl ApiResponse {
    pub fn success(data: QueryData) -> Self {
        ApiResponse::Success { data }
    }

    pub fn error(err: &Error) -> Self {
        ApiResponse::Error {
            error_type: err.error_type(),
            error: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiResponse::Success { .. } => StatusCode::OK,
            ApiResponse::Error { error_type: "bad_data", .. } => StatusCode::BAD_REQUEST,
            ApiResponse::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        ApiResponse::error(&self).into_response()
    }
}
