//! Module configuration file: selects and configures packer components.
//!
//! ```json
//! {
//!     "modules": [
//!         { "module": "ForceDirName" },
//!         { "module": "SetProperties", "properties": { "product": "dayz", "version": 2 } }
//!     ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use pboforge::prelude::*;

#[derive(Debug, Deserialize)]
pub struct ModuleFile {
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModuleEntry {
    pub module: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl ModuleEntry {
    /// Properties as strings; non-string JSON values keep their JSON text.
    pub fn component_properties(&self) -> ComponentProperties {
        self.properties
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

impl ModuleFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read module configuration {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse module configuration {}", path.display()))
    }

    /// Instantiate every listed module known to `registry`, in file order.
    ///
    /// Unknown modules are skipped with a warning.
    pub fn components(&self, registry: &ComponentRegistry) -> Vec<Box<dyn PackerComponent>> {
        let mut components = Vec::with_capacity(self.modules.len());
        for entry in &self.modules {
            match registry.create(&entry.module, &entry.component_properties()) {
                Some(component) => {
                    info!("Module {} has been loaded", entry.module);
                    components.push(component);
                }
                None => warn!(
                    "Unknown module {} (available: {})",
                    entry.module,
                    registry.names().collect::<Vec<_>>().join(", ")
                ),
            }
        }
        components
    }
}
