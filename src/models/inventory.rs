use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::InventoryError, models::web::ICON_CDN};

/// SteamID64 in its 17 digit decimal form. Kept as text so nothing gets lost on the way into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SteamId(String);

impl SteamId {
    ///Validates user input. Surrounding whitespace is ignored, everything else has to be exactly 17 ascii digits.
    pub fn parse(input: &str) -> Result<Self, InventoryError> {
        let trimmed = input.trim();

        if trimmed.len() == 17 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok( SteamId(trimmed.to_string()) )
        } else {
            Err( InventoryError::InvalidIdentifier(input.to_string()) )
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------

/// Join key between assets and descriptions, `classid_instanceid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptionKey {
    classid: String,
    instanceid: String,
}

impl DescriptionKey {
    pub fn new(classid: &str, instanceid: Option<&str>) -> Self {
        let instanceid = instanceid.filter(|i| !i.is_empty()).unwrap_or("0");
        DescriptionKey { classid: classid.to_string(), instanceid: instanceid.to_string() }
    }
}

impl fmt::Display for DescriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.classid, self.instanceid)
    }
}

//--------------------

/// One stack in the inventory as steam reports it. Without a classid it can't be joined and is left out of the list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Asset {
    #[serde(default, deserialize_with = "de::opt_id")]
    pub classid: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub instanceid: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub assetid: Option<String>,
    #[serde(default = "de::one", deserialize_with = "de::amount")]
    pub amount: u64,
}

impl Asset {
    pub fn key(&self) -> Option<DescriptionKey> {
        let classid = self.classid.as_deref()?;
        Some( DescriptionKey::new(classid, self.instanceid.as_deref()) )
    }
}

/// Metadata shared by every asset with the same classid/instanceid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Description {
    #[serde(default, deserialize_with = "de::opt_id")]
    pub classid: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub instanceid: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub market_hash_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub tradable: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub marketable: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub commodity: bool,
    #[serde(default, deserialize_with = "de::text")]
    pub name_color: Option<String>,
}

impl Description {
    pub fn key(&self) -> Option<DescriptionKey> {
        let classid = self.classid.as_deref()?;
        Some( DescriptionKey::new(classid, self.instanceid.as_deref()) )
    }

    ///market_hash_name if steam gave one, the plain name otherwise
    pub fn display_name(&self) -> Option<&str> {
        self.market_hash_name.as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

//--------------------

/// A single page of `/inventory/{steamid}/730/2` as it comes over the wire.
///
/// Every field is read leniently. A record steam mangled is skipped, it never fails the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InventoryPage {
    #[serde(default, deserialize_with = "de::records")]
    pub assets: Vec<Asset>,
    #[serde(default, deserialize_with = "de::records")]
    pub descriptions: Vec<Description>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub more_items: bool,
    #[serde(default, deserialize_with = "de::cursor")]
    pub last_assetid: Option<String>,
    #[serde(default, deserialize_with = "de::cursor")]
    pub more_start: Option<String>,
    #[serde(default, deserialize_with = "de::cursor")]
    pub more_start_assetid: Option<String>,
    #[serde(default, deserialize_with = "de::count")]
    pub total_inventory_count: Option<u64>,
}

impl InventoryPage {
    ///Where the next page starts. Steam is inconsistent about which field it fills in,
    /// so the last assetid of this page is the final fallback.
    pub fn continuation_cursor(&self) -> Option<String> {
        self.last_assetid.clone()
            .or_else(|| self.more_start.clone())
            .or_else(|| self.more_start_assetid.clone())
            .or_else(|| self.assets.last().and_then(|a| a.assetid.clone()))
    }
}

/// Everything one retrieval gathered, tagged with the page size that got through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalResult {
    pub assets: Vec<Asset>,
    pub descriptions: Vec<Description>,
    pub page_size_used: u32,
    /// Steam said there were more items but gave no way to get them.
    pub partial: bool,
}

/// One line in the final list, unique by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedItem {
    pub name: String,
    pub icon_url: String,
    pub total_quantity: u64,
    pub tradable: bool,
    pub marketable: bool,
    pub commodity: bool,
    pub name_color: Option<String>,
}

impl AggregatedItem {
    pub fn icon_link(&self) -> String {
        icon_url(&self.icon_url)
    }

    pub fn flags(&self) -> String {
        let mut flags = Vec::new();
        if !self.tradable { flags.push("not tradable") }
        if !self.marketable { flags.push("not marketable") }

        if flags.is_empty() { String::from("tradable • marketable") } else { flags.join(" • ") }
    }
}

///description.icon_url is only a path segment, this is the usual cdn format for it
pub fn icon_url(icon_path: &str) -> String {
    if icon_path.is_empty() { String::new() }
    else { format!("{}/{}/96fx96f", ICON_CDN, icon_path) }
}

/// Human readable result of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub unique_items: usize,
    pub assets: usize,
    pub page_size_used: u32,
    pub partial: bool,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loaded {} unique marketable items ({} assets) using count={}",
            self.unique_items, self.assets, self.page_size_used
        )?;
        if self.partial {
            write!(f, "\n(Partial: Steam did not provide a next page token.)")?;
        }
        Ok(())
    }
}

// Steam mixes strings, numbers and booleans for the same field depending on the endpoint and the day.
mod de {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::debug;

    pub fn one() -> u64 { 1 }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok( match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok( match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    ///Whole, non negative numbers, given as a number or as text. Fractions are cut off.
    fn whole_number(value: &Value) -> Option<u64> {
        let from_float = |f: f64| (f.is_finite() && f >= 0.0).then_some(f as u64);
        match value {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(from_float)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().and_then(from_float))
            }
            _ => None,
        }
    }

    ///Falls back to 1 when the amount is missing or not a number
    pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok( whole_number(&Value::deserialize(d)?).unwrap_or(1) )
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok( whole_number(&Value::deserialize(d)?) )
    }

    ///0/1 flags. Only an actual 1 (or true) counts
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok( match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => s.trim() == "1",
            _ => false,
        })
    }

    pub fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok( match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Null => false,
            Value::Array(_) | Value::Object(_) => true,
        })
    }

    ///Empty strings, zero and false all mean "no cursor here"
    pub fn cursor<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok( match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
            _ => None,
        })
    }

    ///Anything but an array counts as no records. Entries that aren't records at all are skipped.
    pub fn records<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(values) = Value::deserialize(d)? else { return Ok(Vec::new()) };
        let total = values.len();

        let records: Vec<T> = values.into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();

        if records.len() < total {
            debug!(skipped = total - records.len(), "skipped unreadable inventory records");
        }
        Ok(records)
    }
}
