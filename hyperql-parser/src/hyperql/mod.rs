//! Main module for hyperql library functionality

pub mod ffi;
pub mod formats;
pub mod language;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod syntax;
pub mod testing;
