//! Party combo, boss weakness, and discovery loader.

use std::path::Path;

use game_core::env::{BossWeakness, PartyCombo};
use game_core::state::{ComboId, PlayerId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// A combo a player has already unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub player: PlayerId,
    pub combo: ComboId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboCatalog {
    pub combos: Vec<PartyCombo>,
    #[serde(default)]
    pub weaknesses: Vec<BossWeakness>,
    #[serde(default)]
    pub discoveries: Vec<Discovery>,
}

pub struct ComboLoader;

impl ComboLoader {
    pub fn load(path: &Path) -> LoadResult<ComboCatalog> {
        let catalog: ComboCatalog = read_ron(path, "combo catalog")?;

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use game_core::env::ClassSet;

    #[test]
    fn combo_requirements_parse_from_class_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                combos: [(id: 1, name: "Holy Vanguard", required: "WARRIOR | CLERIC")],
            )"#
        )
        .unwrap();

        let catalog = ComboLoader::load(file.path()).unwrap();
        assert_eq!(catalog.combos[0].required, ClassSet::WARRIOR | ClassSet::CLERIC);
        assert!(catalog.weaknesses.is_empty());

        let written = ron::to_string(&catalog.combos[0].required).unwrap();
        assert_eq!(written, "\"WARRIOR | CLERIC\"");
        let reread: ClassSet = ron::from_str(&written).unwrap();
        assert_eq!(reread, catalog.combos[0].required);
    }
}
