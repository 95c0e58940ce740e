//! Helpers shared by the tests of the tzfetch crates.

mod archive;
mod server;

pub use archive::TarGzBuilder;
pub use server::StaticServer;
