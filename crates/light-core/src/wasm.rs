//! WebAssembly bindings for the Guiding Light engine.
//!
//! Exposes the rendering-collaborator contract to JavaScript: read the
//! state, dispatch action intents, and shuttle sync projections to whatever
//! peer transport the page uses.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::game::{GameState, GameSync};
#[cfg(feature = "wasm")]
use crate::tile::Coord;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a fresh pre-round game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            state: GameState::new(),
        }
    }

    /// Start or restart a round
    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self) -> Result<(), JsValue> {
        self.state
            .start_game()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Select the tile pending a hint
    #[wasm_bindgen(js_name = selectTile)]
    pub fn select_tile(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.state
            .select_tile(Coord::new(x, y))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record the guide's next hint
    #[wasm_bindgen(js_name = giveHint)]
    pub fn give_hint(&mut self, hint: &str) -> Result<(), JsValue> {
        self.state
            .give_hint(hint)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Place a tile, consuming the current hint
    #[wasm_bindgen(js_name = placeTile)]
    pub fn place_tile(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.state
            .place_tile(Coord::new(x, y))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Flip the guide's local secret visibility
    #[wasm_bindgen(js_name = toggleSecrets)]
    pub fn toggle_secrets(&mut self) {
        self.state.toggle_secrets();
    }

    /// The full state as JSON (for rendering)
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// The current phase as a JSON string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.state.phase).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    /// The restricted projection to broadcast to peers, as JSON
    #[wasm_bindgen(js_name = syncProjection)]
    pub fn sync_projection(&self) -> String {
        serde_json::to_string(&self.state.sync_projection()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Apply an inbound peer projection from JSON
    #[wasm_bindgen(js_name = applySync)]
    pub fn apply_sync(&mut self, sync_json: &str) -> Result<(), JsValue> {
        let sync: GameSync = serde_json::from_str(sync_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid sync JSON: {}", e)))?;
        self.state.apply_sync(sync);
        Ok(())
    }
}

#[cfg(feature = "wasm")]
impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_wasm_module_compiles() {
        // This test just verifies the module compiles
        assert!(true);
    }
}
