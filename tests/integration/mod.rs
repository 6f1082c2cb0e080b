pub mod concurrency_tests;
pub mod session_tests;
