//! Demo scenarios exercising the engine end to end.

pub mod rows;
pub mod server;
