pub mod clipboard;
pub mod http;
pub mod registry;
pub mod save;
