pub mod commands;
mod context;

pub use context::AppContext;
