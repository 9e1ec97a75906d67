use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use crate::common::parser::parse_duration;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "promdoc",
    about = "Serve Prometheus-style selector queries from a document store"
)]
pub struct CliOpt {
    /// YAML configuration file
    #[structopt(long = "config", short = "c", parse(from_os_str), default_value = "config.yaml")]
    pub config: PathBuf,

    /// Overrides server.host
    #[structopt(long = "host")]
    pub host: Option<String>,

    /// Overrides server.port
    #[structopt(long = "port", short = "p")]
    pub port: Option<u16>,

    /// Overrides query.timeout, e.g. 30s or 1m
    #[structopt(long = "query-timeout", parse(try_from_str = parse_duration))]
    pub query_timeout: Option<Duration>,

    /// Log filter directives, e.g. promdoc=debug; defaults to RUST_LOG
    #[structopt(long = "log")]
    pub log: Option<String>,
}
