// tests/pipeline.rs
//
// Runs the whole flow against a scripted inventory: collect, aggregate, then build a multisell link
// for what came out. Steam itself is never contacted.

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use cs2multisell::{
    browser::{
        collector::{CollectorSettings, InventoryCollector},
        steamcommunity::{classify_body, InventoryPageSource, PageOutcome},
    },
    error::InventoryError,
    models::inventory::SteamId,
    parsing::{
        aggregate::aggregate_retrieval,
        multisell_url::{build_multisell_url, entries_from_selection},
    },
    status::{Severity, Status},
};
use tokio::sync::mpsc;

const STEAMID: &str = "76561198000000000";

/// Serves raw response bodies, the same way steam would hand them to the http client.
struct RawBodies {
    bodies: Mutex<Vec<(u32, Option<&'static str>, &'static str)>>,
}

#[async_trait]
impl InventoryPageSource for RawBodies {
    async fn fetch_page(&self, steamid: &SteamId, count: u32, start_assetid: Option<&str>) -> Result<PageOutcome, InventoryError> {
        let url = format!("https://steamcommunity.com/inventory/{}/730/2?l=english&count={}", steamid, count);
        let mut bodies = self.bodies.lock().unwrap();
        let pos = bodies.iter()
            .position(|(c, cursor, _)| *c == count && *cursor == start_assetid)
            .unwrap_or_else(|| panic!("no body scripted for count={} start={:?}", count, start_assetid));
        let (_, _, body) = bodies.remove(pos);
        Ok( classify_body(200, &url, body) )
    }
}

const FIRST_PAGE_2000: &str = r#"{
    "assets": [ {"assetid": "1", "classid": "100", "instanceid": "0", "amount": "1"} ],
    "descriptions": [ {"classid": "100", "instanceid": "0", "market_hash_name": "Leaked", "tradable": 1, "commodity": 1} ],
    "more_items": 1,
    "last_assetid": "1"
}"#;

const PAGE_ONE: &str = r#"{
    "assets": [
        {"assetid": "11", "classid": "1", "instanceid": "0", "amount": "3"},
        {"assetid": "12", "classid": "2", "instanceid": "0", "amount": "1"},
        {"assetid": "13", "classid": "3", "instanceid": "0", "amount": "1"}
    ],
    "descriptions": [
        {"classid": "1", "instanceid": "0", "market_hash_name": "Kilowatt Case", "icon_url": "kw", "tradable": 1, "marketable": 1, "commodity": 1},
        {"classid": "2", "instanceid": "0", "market_hash_name": "Name Tag", "tradable": 1, "marketable": 1, "commodity": 1},
        {"classid": "3", "instanceid": "0", "market_hash_name": "AK-47 | Slate (Field-Tested)", "tradable": 1, "marketable": 1, "commodity": 0}
    ],
    "more_items": 1,
    "last_assetid": "13",
    "total_inventory_count": 5
}"#;

const PAGE_TWO: &str = r#"{
    "assets": [
        {"assetid": "14", "classid": "2", "instanceid": "0", "amount": 2},
        {"assetid": "15", "classid": "1", "instanceid": "0"}
    ],
    "descriptions": [],
    "more_items": 0,
    "total_inventory_count": 5
}"#;

fn fast_settings() -> CollectorSettings {
    CollectorSettings {
        page_delay: Duration::ZERO,
        soft_block_delay: Duration::ZERO,
        ..CollectorSettings::default()
    }
}

#[tokio::test]
async fn soft_blocked_inventory_recovers_and_links() {
    let source = RawBodies {
        bodies: Mutex::new(vec![
            (2000, None, FIRST_PAGE_2000),
            (2000, Some("1"), "null"),
            (1500, None, PAGE_ONE),
            (1500, Some("13"), PAGE_TWO),
        ]),
    };
    let (tx, mut rx) = mpsc::unbounded_channel::<Status>();
    let collector = InventoryCollector::new(source, tx, fast_settings());

    let result = collector.collect(&SteamId::parse(STEAMID).unwrap()).await.unwrap();
    assert_eq!(result.page_size_used, 1500);
    assert!(!result.partial);
    assert_eq!(result.assets.len(), 5);

    let items = aggregate_retrieval(result);
    let summary: Vec<(&str, u64)> = items.iter().map(|i| (i.name.as_str(), i.total_quantity)).collect();
    assert_eq!(summary, vec![("Kilowatt Case", 4), ("Name Tag", 3)]);
    assert_eq!(items[0].icon_link(), "https://community.akamai.steamstatic.com/economy/image/kw/96fx96f");

    let link = build_multisell_url(&entries_from_selection(items.iter().map(|i| i.name.clone())));
    assert_eq!(
        link,
        "https://steamcommunity.com/market/multisell?appid=730&contextid=2\
         &items%5B%5D=Kilowatt+Case&qty%5B%5D=0&items%5B%5D=Name+Tag&qty%5B%5D=0"
    );

    let mut messages = Vec::new();
    while let Ok(status) = rx.try_recv() {
        assert_eq!(status.severity, Severity::Muted);
        messages.push(status.message);
    }
    assert_eq!(messages, vec![
        "Loading inventory… (count=2000)",
        "Steam returned null at count=2000. Trying smaller count…",
        "Loading inventory… (count=1500)",
    ]);
}

#[tokio::test]
async fn asset_without_classid_is_dropped_not_fatal() {
    let body = r#"{
        "assets": [
            {"assetid": "1", "instanceid": "0", "amount": "1"},
            {"assetid": "2", "classid": "2", "instanceid": "0", "amount": "2"}
        ],
        "descriptions": [
            {"classid": "2", "instanceid": "0", "name": 7, "market_hash_name": "Name Tag", "tradable": 1, "marketable": 1, "commodity": 1}
        ],
        "more_items": 0,
        "total_inventory_count": "2"
    }"#;
    let source = RawBodies { bodies: Mutex::new(vec![(2000, None, body)]) };
    let (tx, _rx) = mpsc::unbounded_channel::<Status>();
    let collector = InventoryCollector::new(source, tx, fast_settings());

    let result = collector.collect(&SteamId::parse(STEAMID).unwrap()).await.unwrap();
    let items = aggregate_retrieval(result);
    let summary: Vec<(&str, u64)> = items.iter().map(|i| (i.name.as_str(), i.total_quantity)).collect();
    assert_eq!(summary, vec![("Name Tag", 2)]);
}

#[tokio::test]
async fn html_error_page_stops_the_load() {
    let source = RawBodies {
        bodies: Mutex::new(vec![(2000, None, "<!DOCTYPE html><html><body>Sorry!</body></html>")]),
    };
    let (tx, _rx) = mpsc::unbounded_channel::<Status>();
    let collector = InventoryCollector::new(source, tx, fast_settings());

    let err = collector.collect(&SteamId::parse(STEAMID).unwrap()).await.unwrap_err();
    let msg = err.to_string();

    assert!(msg.starts_with("Unexpected response (parse error)."));
    assert!(msg.contains("HTTP 200"));
    assert!(msg.contains("<!DOCTYPE html>"));
}

#[test]
fn invalid_steamids_never_reach_the_network() {
    for bad in ["12345", "abcdefghijklmnopq", "", "7656119800000000x"] {
        assert!(matches!(SteamId::parse(bad), Err(InventoryError::InvalidIdentifier(_))));
    }
}
