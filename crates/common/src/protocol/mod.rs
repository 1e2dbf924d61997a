// Wire protocols spoken between the core and its editing surfaces.

pub mod session;
