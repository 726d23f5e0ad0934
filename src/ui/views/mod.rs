pub mod converge;
pub mod plan;
pub mod status;
