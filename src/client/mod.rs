//! Everything needed to talk to the tracker service: the record model, the
//! time window used for listings, the service contract with its HTTP
//! implementation, and the session that keeps a consistent local snapshot.

pub mod api;
pub mod entities;
pub mod http;
pub mod session;
pub mod window;
