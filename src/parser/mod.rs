// Parser module for extracting the Java syntax model from source files

pub mod ast;
mod java;

pub use ast::*;
pub use java::{collapse_whitespace, normalize_type, JavaParser};
