//! NetBox provider binary.
//!
//! Spawned by the Hemmer core. Prints the handshake line to stdout and
//! serves the provider protocol until shutdown.

use hemmer_provider_netbox::{init_logging, serve, NetboxProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    serve(NetboxProvider::new()).await
}
