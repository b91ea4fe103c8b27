pub mod file;
pub mod http;
pub mod parse;

pub use file::{read_file, write_file};
pub use http::{agent, post_json};
pub use parse::strip_code_fences;
