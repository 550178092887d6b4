pub mod logging;
pub mod passthrough;
pub mod window_host;
