pub mod auth;
pub mod config;
pub mod directory;
pub mod documents;
pub mod error;
pub mod mailbox;
pub mod state;
pub mod web;
pub mod workflow;
