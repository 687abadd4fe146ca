//! CLI domain: parse, route and output only.
//! The route builds configuration and hands off to the combine operation.

mod output;
mod parse;
mod route;

pub use output::{format_report_json, format_report_text, map_error};
pub use parse::Cli;
pub use route::RunContext;
