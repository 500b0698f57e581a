mod durable_storage_port;
mod http_transport_port;
mod notification_sink_port;

pub use durable_storage_port::DurableStoragePort;
pub use http_transport_port::HttpTransportPort;
pub use notification_sink_port::{NotificationSink, NullNotificationSink};
