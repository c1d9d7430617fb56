pub mod api;
pub mod config;
pub mod device_client;
pub mod http_client;
pub mod markup;
pub mod page;
pub mod services;
pub mod settings;
pub mod wifi;
