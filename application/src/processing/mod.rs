pub mod background;
pub mod commands;
pub mod naming;
pub mod payload;
pub mod service;
