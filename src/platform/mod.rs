//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time in milliseconds
//! - Persistent key/value storage (LocalStorage on web, none on native)

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Current wall-clock time in milliseconds (`performance.now()` on web)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Current wall-clock time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Unix timestamp (ms) for records such as high scores
#[cfg(target_arch = "wasm32")]
pub fn timestamp_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_ms() -> f64 {
    now_ms()
}

/// Load a JSON value from LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()?;
    let json = storage.get_item(key).ok().flatten()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable '{}' in LocalStorage: {}", key, e);
            None
        }
    }
}

/// Save a JSON value to LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(json) = serde_json::to_string(value) {
            if storage.set_item(key, &json).is_err() {
                log::warn!("LocalStorage rejected '{}'", key);
            }
        }
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
