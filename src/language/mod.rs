#[macro_use]
pub mod errors;
pub mod ast;
pub mod kinds;
pub mod lexer;
pub mod parser;
