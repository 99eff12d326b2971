//! Built-in packer components.

mod force_dir;
mod set_properties;

pub use force_dir::ForceDirName;
pub use set_properties::SetProperties;
