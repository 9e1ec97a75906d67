//! Server configuration, loaded from a YAML file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::api::QUERY_PATH;
use crate::error::{Error, Result};
use crate::mapping::{CollectionDescriptor, MappingTable};
use crate::model::MetricName;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mongodb: MongoConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub collections: HashMap<String, CollectionDescriptor>,
    #[serde(default)]
    pub mappings: HashMap<MetricName, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_query_path")]
    pub query_path: String,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            query_path: default_query_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9090
}

fn default_query_path() -> String {
    QUERY_PATH.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// Connect and server selection timeout, in seconds.
    #[serde(default = "default_mongo_timeout")]
    pub timeout: u64,
}

impl MongoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            database: default_database(),
            timeout: default_mongo_timeout(),
        }
    }
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "metrics_db".to_string()
}

fn default_mongo_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Deadline for one store round trip, in seconds.
    #[serde(default = "default_query_timeout")]
    pub timeout: u64,
}

impl QueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout: default_query_timeout(),
        }
    }
}

fn default_query_timeout() -> u64 {
    15
}

impl Config {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.server.query_path.starts_with('/') {
            return Err(Error::Config(format!(
                "server.queryPath must start with '/', got {:?}",
                self.server.query_path
            )));
        }
        if self.query.timeout == 0 {
            return Err(Error::Config("query.timeout must be positive".into()));
        }
        Ok(())
    }

    pub fn mapping_table(&self) -> Result<MappingTable> {
        MappingTable::new(self.collections.clone(), self.mappings.clone())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "failed to read {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    Config::from_yaml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
server:
  host: 127.0.0.1
  port: 9191
  queryPath: /prom/api/v1/query
mongodb:
  uri: mongodb://mongo:27017
  database: metrics
  timeout: 3
query:
  timeout: 5
collections:
  http:
    name: metrics_http
    timeField: timestamp
    metricField: metric_name
    valueField: value
    labelFields:
      code: status_code
      method: http_method
    defaultLabels:
      environment: production
mappings:
  http_requests_total: http
"#;

    #[test]
    fn test_full_config() -> Result<()> {
        let config = Config::from_yaml(FULL)?;

        assert_eq!(config.server.addr(), "127.0.0.1:9191");
        assert_eq!(config.server.query_path, "/prom/api/v1/query");
        assert_eq!(config.mongodb.uri, "mongodb://mongo:27017");
        assert_eq!(config.mongodb.database, "metrics");
        assert_eq!(config.mongodb.timeout(), Duration::from_secs(3));
        assert_eq!(config.query.timeout(), Duration::from_secs(5));

        let table = config.mapping_table()?;
        let http = table.resolve("http_requests_total")?;
        assert_eq!(http.label_fields["method"], "http_method");
        assert_eq!(http.default_labels["environment"], "production");
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = Config::from_yaml("collections: {}\n")?;

        assert_eq!(config.server.addr(), "0.0.0.0:9090");
        assert_eq!(config.server.query_path, QUERY_PATH);
        assert_eq!(config.mongodb.uri, "mongodb://localhost:27017");
        assert_eq!(config.mongodb.database, "metrics_db");
        assert_eq!(config.query.timeout(), Duration::from_secs(15));
        assert_eq!(config.mapping_table()?.metrics().count(), 0);
        Ok(())
    }

    #[test]
    fn test_invalid() {
        #[rustfmt::skip]
        let tests = [
            "server: { queryPath: api/v1/query }",
            "query: { timeout: 0 }",
            "server: { port: not-a-port }",
            "collections: [1, 2]",
        ];

        for input in &tests {
            match Config::from_yaml(input) {
                Err(Error::Config(_)) => (),
                res => panic!("expected a configuration error for {:?}, got {:?}", input, res),
            }
        }
    }

    #[test]
    fn test_dangling_mapping() {
        let config = Config::from_yaml("mappings: { up: nowhere }\n").expect("parses");
        assert!(matches!(config.mapping_table(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/promdoc.yaml"),
            Err(Error::Config(_))
        ));
    }
}
