pub mod config;
pub mod logging;

pub mod checksum;
pub mod paths;
pub mod probe;
pub mod scheduler;
pub mod storage;
pub mod targets;
pub mod transport;
pub mod url_model;
