pub mod binary;
pub mod codec;
pub mod gap;
pub mod vbyte;
