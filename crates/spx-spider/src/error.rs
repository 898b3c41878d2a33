use serde::Deserialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a run can fail. None of these are recovered from; the first one
/// ends the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config file {path}, error({source})")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file {path}, error({source})")]
    Config {
        path: String,
        source: serde_yaml::Error,
    },

    /// The constituents table could not be found where expected.
    #[error("constituents table not found: {0}")]
    Structural(String),

    /// A data row is narrower than the fixed column layout.
    #[error("row {row} has {found} cells, column {index} required")]
    MissingColumn {
        row: usize,
        index: usize,
        found: usize,
    },

    #[error("failed to build http client, error({0})")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed, error({source})")]
    Network { url: String, source: reqwest::Error },

    /// Non-2xx response; `message` is the API's own error text when it sent one.
    #[error("{url} responded {status}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// The response body was not JSON, or did not hold the expected field.
    #[error("{endpoint} response for [{symbol}] has no usable `{field}`")]
    Schema {
        endpoint: &'static str,
        symbol: String,
        field: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

// Finnhub error payload, e.g. `{"error": "API limit reached. Please try again later."}`
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl Error {
    pub(crate) fn api(url: &str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|de| de.error)
            .unwrap_or_else(|| body.trim().to_string());

        Error::Api {
            url: url.to_string(),
            status,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_payload_message() {
        let err = Error::api(
            "https://finnhub.io/api/v1/quote",
            429,
            r#"{"error":"API limit reached. Please try again later."}"#,
        );
        match err {
            Error::Api {
                status, message, ..
            } => {
                assert_eq!(status, 429);
                assert_eq!(message, "API limit reached. Please try again later.");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_body() {
        let err = Error::api("https://example.com", 502, "  Bad Gateway\n");
        assert_eq!(err.to_string(), "https://example.com responded 502: Bad Gateway");
    }
}
