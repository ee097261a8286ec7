pub mod cli;
pub mod node;
pub mod parser;
pub mod report;

pub fn get_version() -> String {
    "0.1.0".to_string()
}
