pub mod app;
pub mod articles;
pub mod config;
pub mod db;
pub mod error;
pub mod session;
pub mod state;
pub mod users;
pub mod web;

#[cfg(test)]
mod testing;
