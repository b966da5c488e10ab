pub mod admin_artists;
pub mod artist_galleries;
pub mod artist_prints;
pub mod public;
