mod response;
mod server;

pub use response::{ApiResponse, MatrixItem, QueryData, VectorItem};
pub use server::{router, serve, AppState, QUERY_PATH, QUERY_RANGE_PATH};
