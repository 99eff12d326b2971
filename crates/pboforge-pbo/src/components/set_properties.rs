use crate::component::{ComponentProperties, PackerComponent};
use crate::descriptor::PboDescriptor;
use crate::error::Result;
use crate::properties::Properties;

/// Copies its configured key/value pairs into the archive properties.
#[derive(Debug, Clone, Default)]
pub struct SetProperties {
    values: Vec<(String, String)>,
}

impl SetProperties {
    pub const NAME: &'static str = "SetProperties";

    pub fn from_properties(properties: &ComponentProperties) -> Self {
        Self {
            values: properties
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl PackerComponent for SetProperties {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, _descriptor: &mut PboDescriptor, properties: &mut Properties) -> Result<()> {
        for (key, value) in &self.values {
            properties.insert(key.as_str(), value.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_properties() {
        let settings: ComponentProperties = [("product", "dayz"), ("version", "1.2")].into_iter().collect();
        let mut properties = Properties::new();
        properties.insert("prefix", "mymod");

        SetProperties::from_properties(&settings)
            .apply(&mut PboDescriptor::new("."), &mut properties)
            .unwrap();

        let pairs: Vec<_> = properties.iter().collect();
        assert_eq!(pairs, vec![("prefix", "mymod"), ("product", "dayz"), ("version", "1.2")]);
    }
}
