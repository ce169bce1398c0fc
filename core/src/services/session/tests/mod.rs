//! Session service test modules

mod redirect_tests;
mod service_tests;
