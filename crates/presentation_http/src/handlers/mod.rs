//! HTTP request handlers

pub mod health;
pub mod locations;
pub mod weather;
