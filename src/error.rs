use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpotHintaError {
    #[error("error occurred while communicating with the API")]
    Connection(#[source] reqwest::Error),
    #[error("timeout occurred while connecting to the API")]
    Timeout(#[source] reqwest::Error),
    #[error("IP address rate limited (HTTP 429)")]
    RateLimited,
    #[error("unexpected content type {content_type:?} in response from the API")]
    Protocol { content_type: String, body: String },
    #[error("api responded with a malformed price list")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("no energy prices found")]
    NoData,
    #[error("unsupported price resolution of {0} minutes")]
    UnsupportedResolution(i64),
    #[error("invalid timestamp {value:?} in price record")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl SpotHintaError {
    /// Returns `true` for failures while talking to the API, rate limiting included.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::RateLimited
        )
    }

    /// Returns `true` when the API answered, but not with a JSON price list.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol { .. } | Self::InvalidPayload(_))
    }
}

impl From<reqwest::Error> for SpotHintaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Connection(err)
        }
    }
}

pub type Result<T, E = SpotHintaError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_connection_error() {
        assert!(SpotHintaError::RateLimited.is_connection_error());
        assert!(!SpotHintaError::RateLimited.is_protocol_error());
    }

    #[test]
    fn test_protocol_error_keeps_diagnostics() {
        let err = SpotHintaError::Protocol {
            content_type: "text/html".to_owned(),
            body: "<html></html>".to_owned(),
        };

        assert!(err.is_protocol_error());
        assert!(!err.is_connection_error());
        assert_eq!(
            err.to_string(),
            "unexpected content type \"text/html\" in response from the API"
        );
    }

    #[test]
    fn test_invalid_payload_is_protocol_error() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = SpotHintaError::InvalidPayload(source);

        assert!(err.is_protocol_error());
    }

    #[test]
    fn test_no_data_and_resolution_are_neither() {
        for err in [
            SpotHintaError::NoData,
            SpotHintaError::UnsupportedResolution(45),
        ] {
            assert!(!err.is_connection_error());
            assert!(!err.is_protocol_error());
        }
        assert_eq!(
            SpotHintaError::UnsupportedResolution(45).to_string(),
            "unsupported price resolution of 45 minutes"
        );
    }
}
