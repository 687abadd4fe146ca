//! Property-based tests for path math and tree splicing

mod path_math;
