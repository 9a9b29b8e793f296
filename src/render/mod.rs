//! Pure display helpers: quota/number formatting, model colors, and
//! markdown-to-HTML conversion for operator-supplied content.

mod colors;
mod markdown;
mod quota;

pub use colors::*;
pub use markdown::*;
pub use quota::*;
