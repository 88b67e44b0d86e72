use std::{convert::Infallible, str::FromStr};

use url::form_urlencoded;

use crate::models::web::{APPID, CONTEXTID, MULTISELL_BASE};

/// One row of a multisell link. The quantity only pre-fills the market page, 0 when left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisellEntry {
    pub name: String,
    pub qty: Option<u32>,
}

impl MultisellEntry {
    pub fn new(name: impl Into<String>, qty: u32) -> Self {
        MultisellEntry { name: name.into(), qty: Some(qty) }
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        MultisellEntry { name: name.into(), qty: None }
    }
}

/// `Name Tag=3` sets a quantity, anything without a numeric suffix is taken as the whole name.
impl FromStr for MultisellEntry {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((name, qty)) = s.rsplit_once('=')
            && let Ok(qty) = qty.trim().parse::<u32>()
            && !name.trim().is_empty()
        {
            return Ok( MultisellEntry::new(name.trim(), qty) );
        }
        Ok( MultisellEntry::placeholder(s.trim()) )
    }
}

///Selected names go to the market page with a placeholder quantity, same order as given.
pub fn entries_from_selection<I, S>(names: I) -> Vec<MultisellEntry>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(|name| MultisellEntry::placeholder(name)).collect()
}

///https://steamcommunity.com/market/multisell?appid=730&contextid=2&items[]=...&qty[]=...
///
/// Pairs stay in input order, the market page matches names and quantities by position.
pub fn build_multisell_url(entries: &[MultisellEntry]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("appid", &APPID.to_string());
    query.append_pair("contextid", &CONTEXTID.to_string());

    for entry in entries {
        query.append_pair("items[]", &entry.name);
        query.append_pair("qty[]", &entry.qty.unwrap_or(0).to_string());
    }

    format!("{}?{}", MULTISELL_BASE, query.finish())
}
