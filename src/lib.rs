// Allow dead code for features under development
#![allow(dead_code)]

pub mod api;
pub mod application;
pub mod client;
pub mod domain;
pub mod infrastructure;
