#[macro_use]
extern crate lazy_static;

#[macro_use]
mod macros;

pub mod binding;
pub mod cli;
pub mod collections;
pub mod component;
pub mod driver;
pub mod errors;
pub mod graph;
pub mod key;
pub mod manifest;
pub mod resolve;
pub mod scope;
pub mod ty;
pub mod utils;
pub mod validation;
