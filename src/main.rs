use std::sync::Arc;

use structopt::StructOpt;
use tracing::{error, info};

use promdoc::api;
use promdoc::cliopt::CliOpt;
use promdoc::config::load_config;
use promdoc::engine::Engine;
use promdoc::logging;
use promdoc::store::MongoStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = CliOpt::from_args();
    logging::init(opt.log.as_deref())?;

    if let Err(e) = run(opt).await {
        error!(error = %e, "exiting");
        return Err(e.into());
    }
    Ok(())
}

async fn run(opt: CliOpt) -> promdoc::error::Result<()> {
    let mut config = load_config(&opt.config)?;
    if let Some(host) = opt.host {
        config.server.host = host;
    }
    if let Some(port) = opt.port {
        config.server.port = port;
    }
    let deadline = opt.query_timeout.unwrap_or_else(|| config.query.timeout());

    let table = Arc::new(config.mapping_table()?);
    info!(
        config = %opt.config.display(),
        metrics = table.metrics().count(),
        "loaded mapping table"
    );

    let store = MongoStore::connect(
        &config.mongodb.uri,
        &config.mongodb.database,
        config.mongodb.timeout(),
    )
    .await?;

    let engine = Engine::new(table, Arc::new(store)).with_deadline(deadline);
    let app = api::router(engine, &config.server.query_path);

    api::serve(&config.server.addr(), app).await
}
