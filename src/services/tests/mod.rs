mod auth;
mod common;
mod directory;
