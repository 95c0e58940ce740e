//! Functionality to stream and extract archives directly from a [`url::Url`] with a blocking
//! client.

use std::path::Path;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use url::Url;

use super::FetchError;
use crate::{ExtractError, ExtractResult};

/// Extracts the contents of a `.tar.gz` archive from the specified remote location.
///
/// Anything but a `200 OK` response fails with [`FetchError::Status`] before the body is read.
/// The response is consumed by the extraction and is released when this function returns,
/// whether the extraction succeeded or not.
///
/// ```rust,no_run
/// # use std::path::Path;
/// use tzfetch_streaming::reqwest::extract_tar_gz;
/// # use reqwest::blocking::Client;
/// let _ = extract_tar_gz(
///     Client::default(),
///     "https://data.iana.org/time-zones/releases/tzdata2024a.tar.gz".parse().unwrap(),
///     Path::new("/tmp/tzdata"))
///     .unwrap();
/// ```
pub fn extract_tar_gz(
    client: Client,
    url: Url,
    destination: &Path,
) -> Result<ExtractResult, ExtractError> {
    tracing::debug!("fetching: {url}");

    // Send the request for the file
    let response = client
        .get(url.clone())
        .send()
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status { url, status }.into());
    }

    // The `response` is used to stream in the archive data
    crate::read::extract_tar_gz(response, destination)
        .map_err(|err| into_transport_error(err, &url))
}

/// A body that fails halfway surfaces from the archive reader as a corrupt archive. Errors that
/// originate from the http client are reported as transport errors instead.
fn into_transport_error(err: ExtractError, url: &Url) -> ExtractError {
    match err {
        ExtractError::CorruptArchive(io_err) => match io_err.downcast::<reqwest::Error>() {
            Ok(source) => FetchError::Transport {
                url: url.clone(),
                source,
            }
            .into(),
            Err(io_err) => ExtractError::CorruptArchive(io_err),
        },
        err => err,
    }
}
