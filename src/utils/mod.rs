pub mod os;

pub use os::{current_platform, host_memory_gb, Platform};
