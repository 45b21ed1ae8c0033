use std::collections::HashMap;

use serde::Deserialize;

/// Production region as partitioned by the shop's category pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terroir {
    Cubains,
    Dominicains,
    Honduriens,
    Nicaraguayens,
}

impl Terroir {
    pub const ALL: [Terroir; 4] = [
        Terroir::Cubains,
        Terroir::Dominicains,
        Terroir::Honduriens,
        Terroir::Nicaraguayens,
    ];

    /// URL slug, also the raw value written into the origin column.
    pub fn code(self) -> &'static str {
        match self {
            Terroir::Cubains => "cubains",
            Terroir::Dominicains => "dominicains",
            Terroir::Honduriens => "honduriens",
            Terroir::Nicaraguayens => "nicaraguayens",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Terroir::Cubains => "Cuba",
            Terroir::Dominicains => "Dominican Rep.",
            Terroir::Honduriens => "Honduras",
            Terroir::Nicaraguayens => "Nicaragua",
        }
    }
}

/// code → display name, for the origin substitution pass.
pub fn origin_lookup() -> HashMap<String, String> {
    Terroir::ALL
        .iter()
        .map(|t| (t.code().to_string(), t.display_name().to_string()))
        .collect()
}

pub fn display_names() -> Vec<String> {
    Terroir::ALL
        .iter()
        .map(|t| t.display_name().to_string())
        .collect()
}
