use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Please enter a valid 17-digit SteamID64 (got {0:?}).")]
    InvalidIdentifier(String),

    #[error("No usable page size to try. Every configured count is zero or above {max}.")]
    NoPageSizes { max: u32 },

    #[error("Steam kept returning null even with smaller counts ({}). Try again later or reduce request frequency.", join_counts(.tried))]
    SoftBlockExhausted { tried: Vec<u32> },

    #[error("Unexpected response (parse error).\nHTTP {status}\n{url}\n{sample}")]
    MalformedResponse { status: u16, url: String, sample: String },

    #[error("Steam never stopped paginating. Gave up after {max_pages} pages at count={page_size}.")]
    PaginationExhausted { page_size: u32, max_pages: u32 },

    #[error("Failed sending the HTTP request to steam!\n{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed building the inventory url.\n{0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to set the steamLoginSecure cookie.\n{0}")]
    Cookie(String),
}

fn join_counts(counts: &[u32]) -> String {
    counts.iter()
        .map(|c| format!("count={}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Preference database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_block_message_lists_every_count() {
        let err = InventoryError::SoftBlockExhausted { tried: vec![2000, 1500, 500] };
        let msg = err.to_string();
        assert!(msg.starts_with("Steam kept returning null"));
        assert!(msg.contains("count=2000, count=1500, count=500"));
    }

    #[test]
    fn malformed_message_carries_diagnostics() {
        let err = InventoryError::MalformedResponse {
            status: 502,
            url: String::from("https://steamcommunity.com/inventory/76561198000000000/730/2?l=english&count=2000"),
            sample: String::from("<html>Bad gateway"),
        };
        let msg = err.to_string();
        assert!(msg.contains("HTTP 502"));
        assert!(msg.contains("count=2000"));
        assert!(msg.contains("<html>Bad gateway"));
    }
}
