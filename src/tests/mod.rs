pub mod api_tests;
