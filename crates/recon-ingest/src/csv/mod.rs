//! Delimited text loading.

mod decode;
mod reader;

pub(crate) use reader::read_delimited;
