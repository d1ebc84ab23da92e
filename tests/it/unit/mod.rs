//! Unit tests for inkbook.

mod coords_tests;
mod geometry_tests;
mod settings_tests;
