//! Types shared between the server and the browser page.

pub mod model;
pub mod responses;
