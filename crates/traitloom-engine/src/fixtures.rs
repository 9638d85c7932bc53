//! Shared in-memory catalog for engine tests

use traitloom_catalog::TraitCatalog;
use traitloom_core::{CollectionConfig, Pairing, RarityTier};

pub(crate) fn config() -> CollectionConfig {
    let mut config = CollectionConfig::default();
    for fur in ["brown", "black", "white"] {
        config.constraints.pairings.push(
            Pairing::new(RarityTier::Common, format!("{fur}_fur"))
                .with_hand(format!("{fur}_paw"))
                .with_side_hand(format!("{fur}_side_paw")),
        );
    }
    config
}

pub(crate) fn catalog() -> TraitCatalog {
    use RarityTier::{Common, Legendary};

    let mut catalog = TraitCatalog::new();

    catalog.insert_identifiers(Common, "shared", "background", &["sky", "sea", "forest", "desert"]);
    catalog.insert_identifiers(Common, "bear", "base", &["brown_fur", "black_fur", "white_fur"]);
    catalog.insert_identifiers(Common, "fox", "base", &["red_fur", "arctic_fur"]);
    catalog.insert_identifiers(
        Common,
        "shared",
        "shirt",
        &["tee", "red_hoodie", "astronaut_suit", "flannel"],
    );
    catalog.insert_identifiers(Common, "shared", "eyes", &["round", "sleepy", "wink"]);
    catalog.insert_identifiers(Common, "shared", "eyewear", &["shades", "monocle"]);
    catalog.insert_identifiers(Common, "shared", "necklaces", &["gold_chain", "pearls"]);
    catalog.insert_identifiers(Common, "shared", "head_acc", &["cap", "beanie", "ski_mask"]);
    catalog.insert_identifiers(Common, "bear", "hand", &["brown_paw", "black_paw", "white_paw"]);
    catalog.insert_identifiers(Common, "fox", "hand", &["red_paw"]);
    catalog.insert_identifiers(Common, "shared", "accessory", &["balloon", "sword"]);
    catalog.insert_identifiers(
        Common,
        "bear",
        "side_hand",
        &["brown_side_paw", "black_side_paw", "white_side_paw"],
    );
    catalog.insert_identifiers(Common, "shared", "side_accessory", &["flag", "torch"]);

    catalog.insert_identifiers(Legendary, "shared", "background", &["galaxy", "volcano"]);
    catalog.insert_identifiers(Legendary, "bear", "base", &["gold_fur"]);
    catalog.insert_identifiers(Legendary, "fox", "base", &["nine_tails"]);
    catalog.insert_identifiers(Legendary, "shared", "clothes", &["royal_cape", "silk_tunic"]);
    catalog.insert_identifiers(Legendary, "shared", "eyes", &["laser_eyes", "galaxy_eyes"]);
    catalog.insert_identifiers(Legendary, "shared", "necklaces", &["diamond_chain"]);
    catalog.insert_identifiers(Legendary, "shared", "head_acc", &["crown", "iron_helmet"]);
    catalog.insert_identifiers(Legendary, "shared", "hand", &["gold_paw"]);
    catalog.insert_identifiers(Legendary, "shared", "accessory", &["scepter"]);

    catalog
}
