pub mod playlist;
pub mod process;
pub mod session;
