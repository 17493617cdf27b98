mod client;
mod endpoint;

pub use client::{ClientStats, ConnectionMode, PixelClient};
pub use endpoint::Endpoint;
