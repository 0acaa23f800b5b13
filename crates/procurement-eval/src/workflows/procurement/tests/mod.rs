mod apportionment;
mod common;
mod service;
