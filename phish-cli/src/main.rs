use anyhow::Context;

fn main() -> anyhow::Result<()> {
  let args: Vec<String> = std::env::args().collect();

  if args.iter().any(|a| a == "--version") {
    println!("{}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  let cli = phish_cli::CliArgs::parse(&args[1..])?;
  phish_cli::run(cli).context("phish-check run")
}
