//! Functionality to stream and extract archives directly from a [`url::Url`].

pub mod blocking;
pub use blocking::extract_tar_gz;

use url::Url;

/// An error that can occur while retrieving a remote archive.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The server answered with anything other than `200 OK`.
    #[error("fetch {url} returned status: {status}")]
    Status {
        /// The requested url.
        url: Url,
        /// The status code of the response.
        status: ::reqwest::StatusCode,
    },

    /// The request could not be sent or the response body could not be read.
    #[error("failed to fetch {url}")]
    Transport {
        /// The requested url.
        url: Url,
        /// The error reported by the http client.
        #[source]
        source: ::reqwest::Error,
    },
}

impl FetchError {
    /// Returns the url that failed.
    pub fn url(&self) -> &Url {
        match self {
            FetchError::Status { url, .. } | FetchError::Transport { url, .. } => url,
        }
    }
}
