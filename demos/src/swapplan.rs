use bnscodec::swap::{ChainView, SwapLeg, SwapPlan, DEFAULT_MARGIN_SECS};
use clap::Parser;

/// Checks the timeouts of a cross chain swap, or suggests the latest safe counter timeout.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Timeout height of the first offer.
    #[clap(long)]
    offer_timeout: u64,
    /// Current height of the offer chain.
    #[clap(long)]
    offer_height: u64,
    /// Block interval of the offer chain in seconds.
    #[clap(long)]
    offer_block_time: u64,
    /// Current height of the counter chain.
    #[clap(long)]
    counter_height: u64,
    /// Block interval of the counter chain in seconds.
    #[clap(long)]
    counter_block_time: u64,
    /// Timeout height of the counter offer. Omit to get a suggestion.
    #[clap(long)]
    counter_timeout: Option<u64>,
    /// Minimum time between the expiry of the counter offer and the offer.
    #[clap(long, default_value_t = DEFAULT_MARGIN_SECS)]
    margin_secs: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = Args::parse();
    let offer = SwapLeg {
        timeout_height: args.offer_timeout,
        chain: ChainView {
            current_height: args.offer_height,
            block_time_secs: args.offer_block_time,
        },
    };
    let counter_chain = ChainView {
        current_height: args.counter_height,
        block_time_secs: args.counter_block_time,
    };
    println!("offer expires in ~{}s", offer.secs_to_expiry());
    match args.counter_timeout {
        Some(timeout_height) => {
            let plan = SwapPlan {
                offer,
                counter: SwapLeg {
                    timeout_height,
                    chain: counter_chain,
                },
                min_margin_secs: args.margin_secs,
            };
            println!("counter expires in ~{}s", plan.counter.secs_to_expiry());
            plan.validate()?;
            println!("timeouts are safe");
        }
        None => match SwapPlan::max_counter_timeout(&offer, counter_chain, args.margin_secs) {
            Some(height) => println!("latest safe counter timeout: {}", height),
            None => println!("no safe counter timeout, the offer expires too soon"),
        },
    }
    Ok(())
}
