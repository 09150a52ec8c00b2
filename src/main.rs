use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod metadata;
pub mod player;
pub mod storage;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
