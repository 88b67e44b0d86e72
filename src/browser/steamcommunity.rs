use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::InventoryError,
    models::{
        inventory::{InventoryPage, SteamId},
        web::{APPID, BODY_SAMPLE_CHARS, CONTEXTID, INVENTORY_BASE, LANGUAGE, STEAMCOMMUNITY, STEAM_HEADERS_DEFAULT},
    },
};

/// What one inventory request turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Success(InventoryPage),
    /// Body was the literal `null`. Steam's way of saying "not right now" (or "not at this count").
    SoftBlock { status: u16, url: String },
    /// Neither JSON nor `null`, or JSON without an object at the top.
    Malformed { status: u16, url: String, sample: String },
}

/// Anything that can hand out inventory pages. Only classifies, never retries.
#[async_trait]
pub trait InventoryPageSource: Send + Sync {
    async fn fetch_page(
        &self,
        steamid: &SteamId,
        count: u32,
        start_assetid: Option<&str>,
    ) -> Result<PageOutcome, InventoryError>;
}

#[derive(Debug, Clone)]
pub struct SteamCommunity {
    client: Client,
}

impl SteamCommunity {
    ///Builds the http client. The steamLoginSecure cookie is optional, but private inventories
    /// and heavier rate limits need it.
    pub fn new(login_secure: Option<&str>) -> Result<Self, InventoryError> {
        let mut builder = Client::builder()
            .default_headers( STEAM_HEADERS_DEFAULT.clone() );

        if let Some(cookie) = login_secure.map(str::trim).filter(|c| !c.is_empty()) {
            builder = builder.cookie_provider( login_cookie_jar(cookie)? );
        }

        Ok( SteamCommunity { client: builder.build()? } )
    }
}

#[async_trait]
impl InventoryPageSource for SteamCommunity {
    async fn fetch_page(
        &self,
        steamid: &SteamId,
        count: u32,
        start_assetid: Option<&str>,
    ) -> Result<PageOutcome, InventoryError> {
        let url = inventory_url(steamid, count, start_assetid)?;
        debug!(%url, count, start_assetid, "requesting inventory page");

        let response = self.client.get(url.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok( classify_body(status, url.as_str(), &body) )
    }
}

//                      https://steamcommunity.com/inventory/76561198389123475/730/2?l=english&count=2000&start_assetid=...
pub fn inventory_url(steamid: &SteamId, count: u32, start_assetid: Option<&str>) -> Result<Url, InventoryError> {
    let mut url = Url::parse( &format!("{}/{}/{}/{}", INVENTORY_BASE, steamid, APPID, CONTEXTID) )?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("l", LANGUAGE);
        query.append_pair("count", &count.to_string());
        if let Some(start) = start_assetid.filter(|s| !s.is_empty()) {
            query.append_pair("start_assetid", start);
        }
    }
    Ok(url)
}

///Sorts a raw response body into success, soft block or garbage.
pub fn classify_body(status: u16, url: &str, body: &str) -> PageOutcome {
    if body.trim() == "null" {
        return PageOutcome::SoftBlock { status, url: url.to_string() };
    }

    let malformed = || PageOutcome::Malformed {
        status,
        url: url.to_string(),
        sample: body.chars().take(BODY_SAMPLE_CHARS).collect(),
    };

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return malformed(),
    };

    // Valid json but not an inventory page at all, e.g. an array or a bare string.
    // Inside an object every record is read leniently, odd ones are skipped instead.
    if !value.is_object() {
        return malformed();
    }

    match serde_json::from_value::<InventoryPage>(value) {
        Ok(page) => PageOutcome::Success(page),
        Err(e) => {
            warn!(status, url, error = %e, "inventory page did not have the expected shape");
            malformed()
        }
    }
}

fn login_cookie_jar(login_secure: &str) -> Result<Arc<CookieStoreMutex>, InventoryError> {
    let steam = Url::parse(STEAMCOMMUNITY)?;
    let mut store = CookieStore::default();

    store.parse( &format!("steamLoginSecure={}; Domain=steamcommunity.com; Path=/; Secure", login_secure), &steam )
        .map_err(|e| InventoryError::Cookie(e.to_string()))?;

    Ok( Arc::new(CookieStoreMutex::new(store)) )
}
