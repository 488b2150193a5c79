mod line_index;
mod lines_count;
mod mapped_writer;

pub use crate::{line_index::LineIndex, lines_count::lines_count, mapped_writer::MappedWriter};
pub use oxc_sourcemap::{SourceMap, SourceMapBuilder};
