mod common;
mod directory_tests;
