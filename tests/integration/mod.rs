//! Integration tests for the plinth command dispatcher

mod cli_binary;
mod discovery;
mod dispatch;
mod load_application;
mod test_utils;
