//! Order Example
//!
//! Prices the sample orders of a fixture set and prints a receipt for each.
//!
//! Use `-f` to load a fixture set by name
//! Use `-o` to price a single order from the set
//! Use `-c` to replace the coupon stored with the order
//!
//! Set `RUST_LOG=tiffin=debug` to see each pricing stage.

use std::io::{self, Write};

use anyhow::Result;

use clap::Parser;
use tiffin::{fixtures::Fixture, utils::ExampleOrderArgs};
use tracing_subscriber::EnvFilter;

/// Order Example
pub fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = ExampleOrderArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;

    let keys = match args.order.as_deref() {
        Some(key) => vec![key],
        None => fixture.order_keys(),
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for key in keys {
        writeln!(handle, "\n{key}")?;

        let summary = fixture.compute(key, args.coupon.as_deref())?;

        summary.write_to(&mut handle)?;
    }

    Ok(())
}
