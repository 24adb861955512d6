pub mod block;
pub mod buffer;
pub mod error;
pub mod method;
pub mod process;
pub mod rewrite;
pub mod scan;
pub mod signature;
