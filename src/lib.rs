pub mod client;
pub mod color;
pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod payload;
pub mod template;

pub use client::{DeliveryClient, Transport};
pub use config::{DeliveryConfig, Identity};
pub use context::Context;
pub use error::{NotifyError, Result};
pub use notifier::{Notifier, RunReport, Stage};
pub use payload::{Embed, Payload};
