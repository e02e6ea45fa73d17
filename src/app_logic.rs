pub mod handler;
pub mod ui_constants;

#[cfg(test)]
mod handler_tests;

pub use handler::MyAppLogic;
