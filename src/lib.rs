//! Fim - a vim-like text editor built around a stack of contexts
//! with first-class support for alternative keyboard layouts

pub mod command;
pub mod config;
pub mod constants;
pub mod context;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod key;
pub mod layout;
pub mod logging;
pub mod render;
pub mod state;
pub mod term;

#[cfg(test)]
pub mod test_utils;
