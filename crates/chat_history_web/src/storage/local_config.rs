//! `localStorage`-backed chat-history configuration overrides.

use chat_history_host::{ChatHistoryConfig, CHAT_HISTORY_CONFIG_KEY};

/// Reads the raw JSON override stored under [`CHAT_HISTORY_CONFIG_KEY`].
pub fn load_config_json() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        storage.get_item(CHAT_HISTORY_CONFIG_KEY).ok().flatten()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = CHAT_HISTORY_CONFIG_KEY;
        None
    }
}

/// Loads the effective configuration, falling back to defaults for a missing or malformed
/// override.
pub fn load_chat_history_config() -> ChatHistoryConfig {
    ChatHistoryConfig::from_json_or_default(load_config_json().as_deref())
}

/// Persists a configuration override.
///
/// # Errors
///
/// Returns an error when serialization fails or localStorage is unavailable.
pub fn save_chat_history_config(config: &ChatHistoryConfig) -> Result<(), String> {
    let raw = serde_json::to_string(config).map_err(|e| e.to_string())?;

    #[cfg(target_arch = "wasm32")]
    {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| "localStorage unavailable".to_string())?;
        storage
            .set_item(CHAT_HISTORY_CONFIG_KEY, &raw)
            .map_err(|e| format!("localStorage set_item failed: {e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (CHAT_HISTORY_CONFIG_KEY, raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_config_is_default_and_save_is_noop() {
        assert_eq!(load_config_json(), None);
        assert_eq!(load_chat_history_config(), ChatHistoryConfig::default());
        save_chat_history_config(&ChatHistoryConfig::default()).expect("save");
    }
}
