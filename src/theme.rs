use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::store::{DurableStore, THEME_KEY};

/// Colour theme of the control surface, persisted under `theme`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Glyph for the toggle button.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "🌙",
            Self::Light => "☀",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

/// Read the stored theme. Missing or unrecognised values fall back to dark.
pub async fn load_theme(store: &dyn DurableStore) -> Result<Theme> {
    let value = store.get(THEME_KEY).await?;
    Ok(value
        .and_then(|v| serde_json::from_value::<Theme>(v).ok())
        .unwrap_or_default())
}

pub async fn save_theme(store: &dyn DurableStore, theme: Theme) -> Result<()> {
    store
        .set(THEME_KEY, JsonValue::String(theme.to_string()))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_theme_defaults_to_dark() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store).await.unwrap(), Theme::Dark);

        store.set(THEME_KEY, json!("sepia")).await.unwrap();
        assert_eq!(load_theme(&store).await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_theme_persists_lowercase() {
        let store = MemoryStore::new();
        save_theme(&store, Theme::Dark.toggled()).await.unwrap();
        assert_eq!(store.get(THEME_KEY).await.unwrap(), Some(json!("light")));
        assert_eq!(load_theme(&store).await.unwrap(), Theme::Light);
    }
}
