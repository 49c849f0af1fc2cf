//! azure-paramgen - generate Azure deployment parameters for a CoreOS cluster
//!
//! Reads `cloud-config.yaml.template` and `~/.ssh/id_rsa.pub`, requests an
//! etcd discovery URL and writes `azuredeploy.parameters.json` to the
//! working directory.

use std::path::Path;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use azure_paramgen::config::Cli;
use azure_paramgen::output::OUTPUT_FILE;
use azure_paramgen::{ParamGenError, Resolver, generate};

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

async fn run(cli: &Cli) -> Result<(), ParamGenError> {
    let resolver = Resolver::new()?.with_discovery_endpoint(&cli.discovery_endpoint);

    let doc = generate(cli.parameters(), &resolver, Path::new(OUTPUT_FILE)).await?;
    info!(
        "Generated parameters for {} nodes in {}",
        doc.parameters.number_of_nodes.value, doc.parameters.location.value
    );

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::from_env();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
