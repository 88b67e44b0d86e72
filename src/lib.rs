// Steam inventory plumbing: talking to steamcommunity.com and paging through inventories
pub mod browser;

pub mod config;
pub mod error;

// Wire and domain types
pub mod models;

// Index, aggregate, multisell links, steamid detection
pub mod parsing;

pub mod prefs;
pub mod status;
