use std::{sync::LazyLock, time::Duration};

use reqwest::header::{self, HeaderMap, HeaderValue};

// CS2 inventory lives in app 730, context 2
pub const APPID: u32 = 730;
pub const CONTEXTID: u32 = 2;
pub const LANGUAGE: &str = "english";

pub const STEAMCOMMUNITY: &str = "https://steamcommunity.com";
pub const INVENTORY_BASE: &str = "https://steamcommunity.com/inventory";
pub const MULTISELL_BASE: &str = "https://steamcommunity.com/market/multisell";
pub const ICON_CDN: &str = "https://community.akamai.steamstatic.com/economy/image";

/// Anything above this and steam answers `null` no matter what (5000 always does).
pub const MAX_SAFE_PAGE_SIZE: u32 = 2000;
pub const DEFAULT_PAGE_SIZES: [u32; 4] = [MAX_SAFE_PAGE_SIZE, 1500, 1000, 500];
pub const DEFAULT_MAX_PAGES: u32 = 60;

pub const PAGE_DELAY: Duration = Duration::from_millis(120);
pub const SOFT_BLOCK_DELAY: Duration = Duration::from_millis(400);

pub const BODY_SAMPLE_CHARS: usize = 200;

pub const STEAMID_PREF_KEY: &str = "steamid64";

pub static STEAM_HEADERS_DEFAULT: LazyLock<HeaderMap> = LazyLock::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.5"));
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0")
    );
    headers.insert(header::REFERER, HeaderValue::from_static("https://steamcommunity.com/"));
    headers
});
