pub mod coordinator;
pub mod events;
pub mod fanout;
pub mod log;
pub mod registry;
pub mod server;
pub mod session;

pub use coordinator::{ConnectionState, Coordinator};
pub use fanout::{Audience, GatewayBroadcast, Transport};
