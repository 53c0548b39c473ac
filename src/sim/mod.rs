pub mod event;
pub mod frame;
pub mod level;
pub mod maze;
pub mod session;
pub mod surface;
