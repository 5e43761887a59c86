//! Tokenizing of Envoy access log templates.

pub mod parse;
pub mod token;

pub use parse::tokenize;
pub use token::Token;
