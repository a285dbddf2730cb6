//! Integration tests for the pagesmith site generator

mod config_integration;
mod end_to_end;
mod run_retries;
mod support;
