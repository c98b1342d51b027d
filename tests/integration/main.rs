//! Integration tests for the hookable engine.

mod helpers;

mod config_test;
mod extender_test;
mod object_store_test;
mod rows_test;
