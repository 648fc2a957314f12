pub mod config;
pub mod db;
pub mod deck;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod render;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;
