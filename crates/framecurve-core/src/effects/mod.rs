//! Small frame effects sharing the [`Filter`](crate::Filter) contract.
//!
//! - **Delay**: outputs the oldest buffered frame within a time window
//! - **Scanline**: blanks three out of every four rows

pub mod delay;
pub mod scanline;

pub use delay::DelayFilter;
pub use scanline::ScanlineFilter;
