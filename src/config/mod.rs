mod env_provider;
mod logging;
mod settings;

pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use logging::init_logging;
pub use settings::Settings;

#[cfg(test)]
pub use env_provider::MockEnvironment;
