//! JavaScript bindings for the causal tree engine
//!
//! Identifiers cross the boundary as JSON strings of the form
//! `{"Timestamp":1,"EntityID":2}`; client ids as plain numbers.

use crate::config::EngineConfig;
use crate::directory::Directory;
use crate::error::EngineError;
use crate::replica::Receipt;
use crate::protocol::serialize;
use crate::tree::Identifier;
use crate::console_log;
use wasm_bindgen::prelude::*;

fn reject(context: &str, err: EngineError) -> JsValue {
    console_log!("{} rejected: {}", context, err);
    JsValue::from_str(&format!("{} failed: {}", context, err))
}

fn encode_id(id: &Identifier) -> Result<String, JsValue> {
    serde_json::to_string(id)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
}

/// JavaScript-friendly wrapper for the replica directory
#[wasm_bindgen]
pub struct WasmCausalTree {
    inner: Directory,
}

#[wasm_bindgen]
impl WasmCausalTree {
    /// Create an engine; pass a JSON `EngineConfig` or nothing for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmCausalTree, JsValue> {
        let config = match config_json {
            Some(json) => {
                EngineConfig::from_json(&json).map_err(|e| reject("Config", e))?
            }
            None => EngineConfig::default(),
        };

        Ok(Self {
            inner: Directory::with_config(config),
        })
    }

    /// Register a new client
    #[wasm_bindgen(js_name = addClient)]
    pub fn add_client(&mut self, client_id: u32) -> Result<(), JsValue> {
        self.inner
            .add_client(client_id.into())
            .map_err(|e| reject("addClient", e))
    }

    /// Insert `value` after `parent_json` (null/undefined = start of document)
    ///
    /// A multi-character value is inserted as a chain.
    ///
    /// # Returns
    /// JSON string of the last created identifier
    #[wasm_bindgen(js_name = onAdd)]
    pub fn on_add(
        &mut self,
        parent_json: Option<String>,
        value: String,
        client_id: u32,
    ) -> Result<String, JsValue> {
        let parent = match parent_json {
            Some(json) => serialize::decode_parent(&json).map_err(|e| reject("onAdd", e))?,
            None => None,
        };

        let id = self
            .inner
            .on_add_str(parent, &value, client_id.into())
            .map_err(|e| reject("onAdd", e))?;
        encode_id(&id)
    }

    /// Remove the node named by `node_id_json`
    #[wasm_bindgen(js_name = onRemove)]
    pub fn on_remove(&mut self, node_id_json: String, client_id: u32) -> Result<(), JsValue> {
        let node_id =
            serialize::decode_identifier(&node_id_json).map_err(|e| reject("onRemove", e))?;

        self.inner
            .on_remove(node_id, client_id.into())
            .map_err(|e| reject("onRemove", e))
    }

    /// Get the client's nodes in document order (JSON array, tombstones included)
    #[wasm_bindgen(js_name = getNodes)]
    pub fn get_nodes(&self, client_id: u32) -> Result<String, JsValue> {
        self.inner
            .get_nodes(client_id.into())
            .map_err(|e| reject("getNodes", e))
    }

    /// Apply a JSON operation produced by `encode_operation` on another engine
    ///
    /// # Returns
    /// true if the client's state changed
    #[wasm_bindgen(js_name = receiveOperation)]
    pub fn receive_operation(&mut self, client_id: u32, op_json: String) -> Result<bool, JsValue> {
        let op = serialize::decode_operation(&op_json).map_err(|e| reject("receiveOperation", e))?;
        let receipt = self
            .inner
            .receive(client_id.into(), op)
            .map_err(|e| reject("receiveOperation", e))?;
        Ok(matches!(receipt, Receipt::Applied { .. }))
    }

    /// Queued operations for a client as a JSON array (deferred delivery only)
    #[wasm_bindgen(js_name = pendingOperations)]
    pub fn pending_operations(&self, client_id: u32) -> Result<String, JsValue> {
        let inbox = self
            .inner
            .inbox(client_id.into())
            .map_err(|e| reject("pendingOperations", e))?;
        let encoded = inbox
            .iter()
            .map(serialize::encode_operation)
            .collect::<crate::error::Result<Vec<_>>>()
            .map_err(|e| reject("pendingOperations", e))?;
        Ok(format!("[{}]", encoded.join(",")))
    }

    /// Get the client's visible text
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self, client_id: u32) -> Result<String, JsValue> {
        self.inner
            .text(client_id.into())
            .map_err(|e| reject("getText", e))
    }

    /// Insert a character at a caret position of the client's visible text
    #[wasm_bindgen(js_name = insertAt)]
    pub fn insert_at(
        &mut self,
        client_id: u32,
        caret: usize,
        value: String,
    ) -> Result<String, JsValue> {
        let ch = serialize::single_char(&value).map_err(|e| reject("insertAt", e))?;
        let id = self
            .inner
            .insert_at(client_id.into(), caret, ch)
            .map_err(|e| reject("insertAt", e))?;
        encode_id(&id)
    }

    /// Delete the visible character at `position`
    #[wasm_bindgen(js_name = deleteAt)]
    pub fn delete_at(&mut self, client_id: u32, position: usize) -> Result<String, JsValue> {
        let id = self
            .inner
            .delete_at(client_id.into(), position)
            .map_err(|e| reject("deleteAt", e))?;
        encode_id(&id)
    }

    /// Deliver every queued operation (deferred delivery only)
    #[wasm_bindgen(js_name = deliverAll)]
    pub fn deliver_all(&mut self) -> Result<usize, JsValue> {
        self.inner
            .deliver_all()
            .map_err(|e| reject("deliverAll", e))
    }

    /// Merge every replica into every other
    #[wasm_bindgen(js_name = syncAll)]
    pub fn sync_all(&mut self) -> Result<usize, JsValue> {
        self.inner.sync_all().map_err(|e| reject("syncAll", e))
    }

    /// Get the number of registered clients
    #[wasm_bindgen(js_name = clientCount)]
    pub fn client_count(&self) -> usize {
        self.inner.clients().count()
    }
}
