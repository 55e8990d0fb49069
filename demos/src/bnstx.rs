use bnscodec::bns::BnsCodec;
use clap::Parser;
use log::info;

/// Decodes a posted BNS transaction and checks its signatures.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The chain the transaction was posted to.
    #[clap(index = 1)]
    chain_id: String,
    /// The transaction bytes, hex encoded.
    #[clap(index = 2)]
    tx: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = Args::parse();
    let bytes = hex::decode(args.tx.trim())?;
    let codec = BnsCodec::for_chain(&args.chain_id);
    let tx = codec.parse_bytes(&bytes, &args.chain_id)?;
    info!("decoded {} byte transaction", bytes.len());
    println!("id:         {}", codec.identifier(&tx)?);
    println!("kind:       {}", tx.transaction.kind_name());
    println!("signer:     {}", codec.identity_to_address(tx.transaction.signer())?);
    println!("signatures: {}", tx.signatures().count());
    println!("valid:      {}", codec.verify_all(&tx)?);
    println!("{:#?}", tx.transaction);
    Ok(())
}
