/// State management module
///
/// This module handles all application state, including:
/// - The persisted analysis history (history.rs)
/// - Shared data structures (data.rs)
/// - Selection, result, in-flight request and modal (session.rs)

pub mod data;
pub mod history;
pub mod session;
