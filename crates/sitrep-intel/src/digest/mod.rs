//! The daily digest: a markdown document of posts grouped by author.
//!
//! ```text
//! ## [x] @username — Display Name
//!
//! > post text
//! >
//! > ❤️ 1,234  🔁 56  💬 7 🔥  ·  🕐 08:15 UTC  ·  [View post](https://...)
//! ```
//!
//! [`render_digest`] writes it, [`extract_posts`] reads it back, and
//! [`truncate_digest`] caps how many posts reach the report pipeline.

mod parse;
mod render;
mod truncate;

pub use parse::extract_posts;
pub use render::{render_digest, FIRE_THRESHOLD};
pub use truncate::truncate_digest;
