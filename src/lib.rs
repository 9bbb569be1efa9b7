#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

extern crate simplelog;

//Application Imports/Exports
#[macro_use]
mod async_helper;
pub mod config;
pub mod connection;
pub mod query;
pub mod server;
