pub mod config;
pub mod intent;
pub mod machine;
pub mod payload;
pub mod ports;
pub mod widget;
