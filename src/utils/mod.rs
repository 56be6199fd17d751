//! Utility modules for the nugraph CLI

pub mod terminal;
