pub mod matcher;
pub mod source;
