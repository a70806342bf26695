pub mod classify;
pub mod fetcher;
pub mod render;
pub mod session;
pub mod source;
pub mod terminal;
pub mod view;
