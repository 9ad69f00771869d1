use clap::Parser;
use colored::Colorize;

use anvil_update::config::UpdateConfig;
use anvil_update::run::{run, Outcome};

#[derive(Parser, Debug)]
#[command(name = "anvil-update")]
#[command(about = "Self-update client for the anvil toolchain", version)]
struct Cli {
    /// Update even when this build is not a published release
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = UpdateConfig::new(cli.force);

    match run(&config) {
        Ok(Outcome::Updated) => {
            println!("{} anvil update complete", "✓".green());
        }
        Ok(Outcome::UpToDate) => {}
        Err(e) => {
            eprintln!("{} {:#}", "anvil update failed:".red(), e);
            std::process::exit(1);
        }
    }
}
