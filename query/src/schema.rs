//! Fixed index fields outside the dynamically named hierarchy fields.

/// Free-text field matched by `q`
pub const TEXT: &str = "text";
pub const UUID: &str = "uuid";
pub const PERSISTENT_URI: &str = "persistent_uri";
pub const ITEM_TYPE: &str = "item_type";
pub const SLUG_TYPE_URI_LABEL: &str = "slug_type_uri_label";
pub const INTEREST_SCORE: &str = "interest_score";
pub const UPDATED: &str = "updated";
pub const PUBLISHED: &str = "published";
pub const CONTEXT_PATH: &str = "context_path";
pub const CHRONO_TILE: &str = "form_use_life_chrono_tile";
pub const CHRONO_EARLIEST: &str = "form_use_life_chrono_earliest";
pub const CHRONO_LATEST: &str = "form_use_life_chrono_latest";
pub const GEO_TILE: &str = "discovery_geotile";

/// Stored fields returned for every result record.
pub const DEFAULT_RETURN_FIELDS: [&str; 6] = [
    UUID,
    SLUG_TYPE_URI_LABEL,
    ITEM_TYPE,
    PERSISTENT_URI,
    UPDATED,
    PUBLISHED,
];
