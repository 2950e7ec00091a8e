use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The request to the search backend could not be sent or its body not read
    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The search backend answered with a non-success status
    #[error("Search backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the expected JSON
    #[error("Could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A hit in the response lacks one of product, image or distance
    #[error("Search hit #{index} is missing its {field}")]
    MalformedHit { index: usize, field: &'static str },

    /// A hit carries a distance that cannot be ranked
    #[error("Search hit #{index} has an invalid distance {distance}")]
    InvalidDistance { index: usize, distance: f64 },

    /// An I/O error occurred while reading the image to upload
    #[error("Image I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported image type '{mime}' for {file}")]
    UnsupportedImage { file: String, mime: String },

    #[error("Image {0} is empty")]
    EmptyImage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_hit_message() {
        let err = SearchError::MalformedHit {
            index: 3,
            field: "image",
        };
        assert_eq!(err.to_string(), "Search hit #3 is missing its image");
    }

    #[test]
    fn test_status_message() {
        let err = SearchError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Search backend returned 502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
