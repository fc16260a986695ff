//! Replays a transaction given on the command line.
//!
//! ```sh
//! cargo run -p ohio-sim --example replay_transaction -- <TX_HASH> [WS_URL]
//! ```

use ohio_sim::{Network, OhioWrapper};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut args = std::env::args().skip(1);
    let tx_hash = args.next().ok_or("usage: replay_transaction <TX_HASH> [WS_URL]")?;
    let ws_url = args.next().unwrap_or_else(|| Network::Mantle.default_ws_url().to_string());

    let wrapper = OhioWrapper::new(ws_url);
    wrapper.async_init().await?;

    let response = wrapper.replay_transaction(&tx_hash).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
