mod key_tests;
mod tamper_tests;
