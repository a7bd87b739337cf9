pub mod container;
pub mod external_services;
pub mod settings;
pub mod telemetry;

// Re-export commonly used items
pub use container::AppContainer;
pub use settings::HandlerSettings;
