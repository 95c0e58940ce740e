use miette::{Context, IntoDiagnostic};
use reqwest::blocking::Client;
use url::Url;

use crate::config::Config;

/// Creates the http client used for all downloads. Requests never time out.
pub fn http_client() -> miette::Result<Client> {
    Client::builder()
        .timeout(None)
        .build()
        .into_diagnostic()
        .context("failed to create the http client")
}

/// Fetches and unpacks every url in order. Stops at the first failure and returns an error that
/// names the failing url; the remaining urls are not touched.
pub fn run(config: &Config, client: Client, urls: &[Url]) -> miette::Result<()> {
    for url in urls {
        let result = tzfetch_streaming::reqwest::extract_tar_gz(
            client.clone(),
            url.clone(),
            &config.base_directory,
        )
        .into_diagnostic()
        .with_context(|| format!("failed to unpack {url}"))?;

        tracing::info!(
            "unpacked {url}: {} directories, {} files ({} bytes)",
            result.directories,
            result.files,
            result.total_size
        );
    }

    Ok(())
}
