pub mod builtin;
pub mod host;
pub mod profile;
pub mod settings;
pub mod store;
