pub mod snapshot;
mod world;
