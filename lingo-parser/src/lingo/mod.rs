//! Main module for lingo library functionality

pub mod ast;
pub mod decoding;
pub mod dex;
pub mod error;
pub mod init;
pub mod level;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;

pub use ast::Node;
pub use error::{DecodeError, InitError, LevelError, ParseError, RegistryError};
pub use parsing::parse;
