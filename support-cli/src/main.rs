use clap::Parser;
use support_cli::{run, Args};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    support_logging::init(&args.logger_config())?;

    let output = run(&args)?;
    println!("{output}");
    Ok(())
}
