pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;

pub use context::KinweaveCliContext;
pub use output::{
    CliColors, error_code, format_error, format_flag, format_info, format_success,
    format_warning, output_error, output_error_json, print_json,
};
