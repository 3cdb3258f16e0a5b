//! Headless match-three runner (default binary).
//!
//! Deals a board from the resolved configuration, plays random productive
//! swaps until the move budget is spent, and prints the summary on stdout.

use anyhow::Result;

use match_three::cli::{parse_args, USAGE};
use match_three::session::Session;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = cli.resolve_config()?;
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut session = Session::new(&config)?;
    let summary = session.run()?;
    println!("{}", summary);
    Ok(())
}
