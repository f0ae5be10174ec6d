pub mod common;

mod router_test;
