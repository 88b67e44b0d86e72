use std::sync::LazyLock;

use regex::Regex;

use crate::models::inventory::SteamId;

// https://steamcommunity.com/profiles/7656119.../inventory/#730
// https://steamcommunity.com/id/customname/  <- vanity urls don't carry the SteamID64
static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"steamcommunity\.com/profiles/([0-9]{17})").expect("profile url regex is valid")
});

///Pulls the SteamID64 out of a profile or inventory url, None if the url doesn't have one.
pub fn detect_steamid_from_url(url: &str) -> Option<SteamId> {
    PROFILE_URL.captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| SteamId::parse(m.as_str()).ok())
}
