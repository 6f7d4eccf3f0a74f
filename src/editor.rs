//! Modal editing for the commit buffer

pub mod mode;

pub use mode::EditorMode;
