pub mod bubbles;
pub mod event_bus;
pub mod export;

pub use event_bus::EventBus;
