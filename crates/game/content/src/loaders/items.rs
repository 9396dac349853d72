//! Equipment loader.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::ItemDefinition;
use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Deserialize)]
struct Armory {
    items: Vec<ItemDefinition>,
}

pub struct ItemLoader;

impl ItemLoader {
    /// Reads `items.ron`. Heroes reference equipment by id, so ids must be unique.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let armory: Armory = read_ron(path, "item catalog")?;

        let mut seen = HashSet::with_capacity(armory.items.len());
        for item in &armory.items {
            if !seen.insert(item.id) {
                anyhow::bail!("item {} ({}) is declared twice", item.id.get(), item.name);
            }
        }
        Ok(armory.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                items: [
                    (id: 4, name: "Buckler", bonuses: [(stat: defense, bonus: flat(1))]),
                    (id: 4, name: "Tower Shield"),
                ],
            )"#
        )
        .unwrap();

        let error = ItemLoader::load(file.path()).unwrap_err().to_string();
        assert!(error.contains("item 4 (Tower Shield)"), "{error}");
    }
}
