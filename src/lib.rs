//! Command line client for a personal time tracking service. Start named
//! trackers, stop them, rename or delete them, and list them filtered by
//! day, week or month. The service owns all the state, the client only keeps
//! a refreshed-on-demand snapshot.

pub mod cli;
pub mod client;
pub mod utils;
