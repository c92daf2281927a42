pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a report run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GitHub API returned HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render JSON report: {0}")]
    Render(#[from] serde_json::Error),
}

impl Error {
    pub fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => Self::Status {
                status,
                url: url.to_owned(),
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::Transport {
                url: url.to_owned(),
                source: Box::new(transport),
            },
        }
    }
}
