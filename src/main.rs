mod app;
mod audio;
mod config;
mod engine;
mod library;
mod mpris;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
