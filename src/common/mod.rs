pub mod parser;
pub mod time;
