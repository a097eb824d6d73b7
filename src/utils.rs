//! Utils

use clap::Parser;

/// Arguments for the order example
#[derive(Debug, Parser)]
pub struct ExampleOrderArgs {
    /// Fixture set to load orders and the pricing policy from
    #[clap(short, long, default_value = "restaurant")]
    pub fixture: String,

    /// Order to price; every order in the set is priced when omitted
    #[clap(short, long)]
    pub order: Option<String>,

    /// Coupon code, replacing the one stored with the order
    #[clap(short, long)]
    pub coupon: Option<String>,
}
