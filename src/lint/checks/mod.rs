//! Individual lint checks

pub mod flow;
pub mod quality;
pub mod references;
