//! # Paper Assembly
//!
//! Renders a selection of questions into a formatted `.docx` exam paper.
//! [`assemble_paper`] is pure and synchronous: it receives the header fields, the
//! ordered questions and an [`ImageSource`] and returns the document bytes.

pub mod assembler;
pub mod docx;
pub mod images;

pub use assembler::{assemble_paper, total_marks, PaperHeader, PaperQuestion};
pub use images::{FsImageSource, ImageSource, InMemoryImageSource};
