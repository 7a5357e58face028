pub mod format;
pub mod hijri;
