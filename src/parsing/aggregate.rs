use indexmap::IndexMap;

use crate::{
    models::inventory::{AggregatedItem, Asset, RetrievalResult},
    parsing::description_index::DescriptionIndex,
};

///Groups assets by market hash name and keeps only tradable commodities, most owned first.
///
/// Assets without a classid or a description, or whose description has no name, are skipped.
/// Commodity status sticks once any instance of a name reports it.
pub fn aggregate(assets: &[Asset], index: &DescriptionIndex) -> Vec<AggregatedItem> {
    let mut grouped: IndexMap<&str, AggregatedItem> = IndexMap::new();

    for asset in assets {
        let Some(desc) = asset.key().and_then(|key| index.get(&key)) else { continue };
        let Some(name) = desc.display_name() else { continue };

        let entry = grouped.entry(name)
            .or_insert_with(|| AggregatedItem {
                name: name.to_string(),
                icon_url: desc.icon_url.clone().unwrap_or_default(),
                total_quantity: 0,
                tradable: desc.tradable,
                marketable: desc.marketable,
                commodity: desc.commodity,
                name_color: desc.name_color.clone().filter(|c| !c.is_empty()),
            });

        entry.total_quantity = entry.total_quantity.saturating_add(asset.amount);
        if desc.commodity { entry.commodity = true }
    }

    let mut items: Vec<AggregatedItem> = grouped.into_values()
        .filter(|item| item.commodity && item.tradable && item.total_quantity > 0)
        .collect();

    items.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity).then_with(|| a.name.cmp(&b.name)));
    items
}

///Indexes the descriptions of a finished retrieval and aggregates its assets.
pub fn aggregate_retrieval(result: RetrievalResult) -> Vec<AggregatedItem> {
    let index = DescriptionIndex::build(result.descriptions);
    aggregate(&result.assets, &index)
}

///Case insensitive substring match on the name. An empty query keeps everything.
pub fn filter_by_name<'a>(items: &'a [AggregatedItem], query: &str) -> Vec<&'a AggregatedItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }

    items.iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .collect()
}
