//! Business logic services
//!
//! Device workflows separated from HTTP concerns, generic over the
//! [`DeviceClient`](crate::device_client::DeviceClient) so they can be
//! tested against a mock.

pub mod settings;
pub mod wifi;
