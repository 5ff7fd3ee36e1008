//! LocalStorage helpers (no-ops natively)

use serde::{Serialize, de::DeserializeOwned};

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

/// Read and decode a JSON value; `None` if missing or unreadable
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok()??;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring malformed {}: {}", key, err);
            None
        }
    }
}

/// Encode and store a JSON value, logging failures
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, {} not saved", key);
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => {
            if storage.set_item(key, &json).is_err() {
                log::warn!("Failed to write {}", key);
            }
        }
        Err(err) => log::error!("Failed to encode {}: {}", key, err),
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(_key: &str, _value: &T) {
    // No-op for native
}
