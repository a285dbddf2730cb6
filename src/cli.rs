//! CLI domain: parse, route, output, and presentation only.
//! Generation itself lives in [`crate::generator`]; the route table only wires it up.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_config_toml, format_generation_report, format_usage_summary};
pub use route::RunContext;
