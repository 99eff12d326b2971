use log::debug;
use pboforge_config::{ConfigValue, Scope};

use crate::component::{ComponentProperties, PackerComponent};
use crate::descriptor::PboDescriptor;
use crate::error::Result;
use crate::properties::Properties;

/// Sets the `dir` variable of every mod class to the class name.
///
/// Mod classes are the classes nested in the root config's `CfgMods` class
/// (configurable through the `class` property). A missing `dir` is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceDirName {
    class: String,
}

impl ForceDirName {
    pub const NAME: &'static str = "ForceDirName";
    pub const DEFAULT_CLASS: &'static str = "CfgMods";
    const VARIABLE: &'static str = "dir";

    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into() }
    }

    pub fn from_properties(properties: &ComponentProperties) -> Self {
        Self::new(properties.get("class").unwrap_or(Self::DEFAULT_CLASS))
    }
}

impl Default for ForceDirName {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CLASS)
    }
}

impl PackerComponent for ForceDirName {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, descriptor: &mut PboDescriptor, _properties: &mut Properties) -> Result<()> {
        let Some(parsed) = descriptor.root_config_mut() else {
            return Ok(());
        };
        let Some(mods) = parsed.config.class_mut(&self.class) else {
            return Ok(());
        };

        for class in mods.classes_mut() {
            let name = class.identifier().to_string();
            debug!("{}: {}.{} = \"{name}\"", Self::NAME, name, Self::VARIABLE);
            class.set_variable(Self::VARIABLE, ConfigValue::String(name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::PboFile;
    use pboforge_config::parse_str;

    fn descriptor(source: &str) -> PboDescriptor {
        let mut descriptor = PboDescriptor::new(".");
        descriptor.files.push(PboFile::config("config.cpp", parse_str(source)));
        descriptor
    }

    fn dir_of(descriptor: &PboDescriptor, class: &str) -> Option<String> {
        descriptor
            .root_config()?
            .config
            .class("CfgMods")?
            .class(class)?
            .variable("dir")?
            .as_str()
            .map(str::to_string)
    }

    #[test]
    fn test_overwrites_and_inserts_dir() {
        let mut descriptor = descriptor(
            r#"class CfgMods { class First { dir = "wrong"; name = "a"; }; class Second { name = "b"; }; };"#,
        );
        ForceDirName::default()
            .apply(&mut descriptor, &mut Properties::new())
            .unwrap();

        assert_eq!(dir_of(&descriptor, "First").as_deref(), Some("First"));
        assert_eq!(dir_of(&descriptor, "Second").as_deref(), Some("Second"));
    }

    #[test]
    fn test_without_config_is_noop() {
        let mut descriptor = PboDescriptor::new(".");
        ForceDirName::default()
            .apply(&mut descriptor, &mut Properties::new())
            .unwrap();
        assert!(descriptor.files.is_empty());
    }

    #[test]
    fn test_custom_class() {
        let properties: ComponentProperties = [("class", "CfgAddons")].into_iter().collect();
        let component = ForceDirName::from_properties(&properties);
        assert_eq!(component, ForceDirName::new("CfgAddons"));
    }
}
