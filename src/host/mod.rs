//! Host-function seam: the callable type behind imported function addresses.

pub mod func;

pub use func::HostFunc;
