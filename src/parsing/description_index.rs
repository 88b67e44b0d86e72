use ahash::{HashMap, HashMapExt};

use crate::models::inventory::{Description, DescriptionKey};

/// Lookup from `classid_instanceid` to the description steam sent for it.
#[derive(Debug, Clone, Default)]
pub struct DescriptionIndex {
    map: HashMap<DescriptionKey, Description>,
}

impl DescriptionIndex {
    ///Duplicate keys overwrite, last one wins. Steam is not expected to send two different ones.
    /// Descriptions without a classid can't match anything and are left out.
    pub fn build<I: IntoIterator<Item = Description>>(descriptions: I) -> Self {
        let mut map = HashMap::new();
        for desc in descriptions {
            if let Some(key) = desc.key() {
                map.insert(key, desc);
            }
        }
        DescriptionIndex { map }
    }

    pub fn get(&self, key: &DescriptionKey) -> Option<&Description> {
        self.map.get(key)
    }
}
