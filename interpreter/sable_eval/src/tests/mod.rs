//! Evaluator test suites.
//!
//! Inline `#[cfg(test)]` modules next to each unit cover the small pieces;
//! the end-to-end suites over whole programs live here. Programs are built
//! with the `sable_ir` node builders (the parser is an external
//! collaborator).
