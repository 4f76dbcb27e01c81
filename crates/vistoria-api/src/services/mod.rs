//! Request-scoped services: artifact uploads, mail delivery, and the
//! submission pipeline that ties them together.

pub mod artifacts;
pub mod email;
pub mod pipeline;
