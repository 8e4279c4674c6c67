mod api_tests;
mod chart_tests;
mod push_tests;
mod state_tests;
mod views_tests;
