use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Print the category line on word cards
    pub show_category: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { show_category: true }
    }
}

impl UiConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let show_category = lookup("NUANCE_SHOW_CATEGORY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self { show_category }
    }
}
