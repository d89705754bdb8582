pub mod challenge;
pub mod dining;
