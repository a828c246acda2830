//! Access token records issued by the server's token endpoint.

pub mod record;
