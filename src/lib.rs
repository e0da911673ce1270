pub mod animate;
pub mod app;
pub mod error;
pub mod generators;
pub mod maze;
pub mod session;
pub mod solvers;

pub use error::Error;
