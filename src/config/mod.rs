pub mod settings;

pub use settings::{ClusterSettings, ProvisionSettings, Settings};
