//! Port traits: the narrow interfaces external collaborators implement.

pub mod config_port;
pub mod price_feed_port;
pub mod swap_port;
pub mod yield_source_port;
