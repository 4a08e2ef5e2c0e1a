pub mod content_disposition;
pub mod controller;
pub mod download;
pub mod events;
pub mod format;
pub mod model;
pub mod notifier;
pub mod paste;
pub mod search;
pub mod view;
pub mod watcher;
