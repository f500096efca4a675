//! Configuration module

mod platform;

pub use platform::DocumentSpec;
pub use platform::FooterConfig;
pub use platform::HeaderConfig;
pub use platform::Layout;
pub use platform::MetricConfig;
pub use platform::PanelConfig;
pub use platform::PlatformConfig;
pub use platform::CONFIG_FILE;
