//! Main execution logic for the loggrep CLI.

use anyhow::{Context, Result};
use lg_scanner::{
    LineSink, OutputTarget, S3Config, S3Fetcher, S3Lister, ScanConfig, Scanner, StatsSnapshot,
    create_s3_client,
};
use lg_types::ScanTarget;
use std::sync::Arc;
use tracing::info;

use crate::args::Cli;

/// Execute a scan with the provided arguments.
pub async fn execute(args: Cli) -> Result<StatsSnapshot> {
    let target = match args.prefix {
        Some(ref prefix) => ScanTarget::new(&args.bucket).with_prefix(prefix),
        None => ScanTarget::new(&args.bucket),
    };

    let mut config = ScanConfig::new(target, &args.token).with_compression(args.compression.into());
    if let Some(max) = args.max_concurrency {
        config = config.with_max_concurrency(max);
    }
    config.validate()?;

    let client = create_s3_client(&s3_config(&args))
        .await
        .context("failed to create S3 client")?;

    let output = match args.output {
        Some(ref stem) => {
            let target = OutputTarget::from_stem(stem);
            target.prepare().await?;
            info!(path = %target.path().display(), "Writing matches to file");
            Some(target)
        }
        None => None,
    };

    let scanner = Scanner::new(
        config,
        Arc::new(S3Lister::new(client.clone())),
        Arc::new(S3Fetcher::new(client)),
        Arc::new(LineSink::stdout(output)),
    );

    Ok(scanner.run().await?)
}

fn s3_config(args: &Cli) -> S3Config {
    let mut config = S3Config::new()
        .with_region(&args.region)
        .with_timeout(args.timeout_secs);

    if let Some(ref endpoint) = args.s3_endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        config = config.with_credentials(access_key, secret_key);
    }
    if let Some(ref profile) = args.profile {
        config = config.with_profile(profile);
    }
    if let Some(ref role_arn) = args.role_arn {
        config = config.with_role_arn(role_arn);
    }

    config
}
