use anyhow::Result;
use clap::Parser;
use log::info;

use readset_importer::config::{Args, Config};
use readset_importer::event::notification::EventReader;
use readset_importer::handler::Handler;
use readset_importer::import::api::ImportJobApi;
use readset_importer::import::dry_run::DryRunJobApi;
use readset_importer::import::omics::OmicsClient;
use readset_importer::storage::s3::S3Lister;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    info!("terve! looking for read sets to import :)");

    let config = Config::from_args(Args::parse())?;
    let notification = EventReader::new()?.read(&config.event_path)?;

    let lister = S3Lister::new(config.s3_region.clone());
    let api: Box<dyn ImportJobApi> = match config.dry_run {
        true => {
            info!("--dry-run set, import jobs won't be started");
            Box::new(DryRunJobApi::default())
        }
        false => Box::new(OmicsClient::new(config.omics_region.clone())?),
    };

    let response = Handler::new(&config, &lister, api.as_ref()).handle(&notification).await?;
    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
