//! Packer components: steps run on a descriptor before it is written.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::components::{ForceDirName, SetProperties};
use crate::descriptor::PboDescriptor;
use crate::error::Result;
use crate::properties::Properties;

/// A transformation applied to an archive before it is written.
///
/// Components run in the order they were added to the packer; a later
/// component may overwrite the effects of an earlier one.
pub trait PackerComponent: fmt::Debug {
    /// Name the component is registered under.
    fn name(&self) -> &str;

    /// Apply this component to `descriptor`, optionally adding archive properties.
    fn apply(&self, descriptor: &mut PboDescriptor, properties: &mut Properties) -> Result<()>;
}

/// String settings handed to a component factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentProperties {
    values: BTreeMap<String, String>,
}

impl ComponentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up `key` and parse it as `T`.
    ///
    /// Returns `None` when the key is missing or its value does not parse.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring property {key}: cannot parse '{raw}'");
                None
            }
        }
    }

    /// Like [`get_parsed`](Self::get_parsed), falling back to `default`.
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.get_parsed(key).unwrap_or(default)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ComponentProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

/// Constructor for a registered component.
pub type ComponentFactory = fn(&ComponentProperties) -> Box<dyn PackerComponent>;

/// Name to factory map for the components a caller can select.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    factories: BTreeMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in components.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ForceDirName::NAME, |properties| {
            Box::new(ForceDirName::from_properties(properties))
        });
        registry.register(SetProperties::NAME, |properties| {
            Box::new(SetProperties::from_properties(properties))
        });
        registry
    }

    /// Register `factory` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, factory: ComponentFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Instantiate the component registered under `name`.
    pub fn create(&self, name: &str, properties: &ComponentProperties) -> Option<Box<dyn PackerComponent>> {
        self.factories.get(name).map(|factory| factory(properties))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
