mod render;

use phish_core::config::{validate_remote_config, Config};
use phish_core::logging::LogOutput;
use phish_core::{features, normalize, scorer, CheckSession, ScorerKind, UrlScorer};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
  pub urls: Vec<String>,
  pub json: bool,
  pub verbose: bool,
  pub interactive: bool,
  pub features: bool,
  pub help: bool,
  pub scorer: Option<ScorerKind>,
}

impl CliArgs {
  pub fn parse(args: &[String]) -> anyhow::Result<Self> {
    let mut out = CliArgs::default();
    for arg in args {
      match arg.as_str() {
        "--json" => out.json = true,
        "--verbose" | "-v" => out.verbose = true,
        "--interactive" | "-i" => out.interactive = true,
        "--features" => out.features = true,
        "--help" | "-h" => out.help = true,
        "--remote" => out.scorer = Some(pick(out.scorer, ScorerKind::Remote)?),
        "--heuristic" => out.scorer = Some(pick(out.scorer, ScorerKind::Heuristic)?),
        flag if flag.starts_with("--") => anyhow::bail!("unknown option `{flag}`"),
        url => out.urls.push(url.to_string()),
      }
    }

    if out.features && out.urls.is_empty() && !out.help {
      anyhow::bail!("expected: --features <url>...");
    }
    Ok(out)
  }
}

fn pick(current: Option<ScorerKind>, wanted: ScorerKind) -> anyhow::Result<ScorerKind> {
  match current {
    Some(k) if k != wanted => anyhow::bail!("`--remote` and `--heuristic` are mutually exclusive"),
    _ => Ok(wanted),
  }
}

pub fn run(args: CliArgs) -> anyhow::Result<()> {
  if args.help {
    print_help();
    return Ok(());
  }

  let output = if args.verbose {
    LogOutput::FileAndStderr
  } else {
    LogOutput::File
  };
  let mut cfg = phish_core::init_from_env(output)?;
  apply_scorer_override(&mut cfg, args.scorer)?;

  if args.features {
    for raw in &args.urls {
      println!("{}", features_report(raw, args.json));
    }
    return Ok(());
  }

  let scorer = scorer::build(&cfg)?;

  if args.interactive || args.urls.is_empty() {
    return run_interactive(scorer.as_ref(), args.json);
  }

  let mut session = CheckSession::new();
  for raw in &args.urls {
    println!("{}", check_line(&mut session, scorer.as_ref(), raw, args.json, false));
  }
  Ok(())
}

fn apply_scorer_override(cfg: &mut Config, kind: Option<ScorerKind>) -> anyhow::Result<()> {
  let Some(kind) = kind else {
    return Ok(());
  };
  if kind == ScorerKind::Remote {
    if let Some(reason) = validate_remote_config(&cfg.remote) {
      anyhow::bail!("remote scorer requested but config is invalid: {reason}");
    }
  }
  cfg.scorer = kind;
  Ok(())
}

/// Runs one submission through the session and renders whatever state it ends in.
pub fn check_line(
  session: &mut CheckSession,
  scorer: &dyn UrlScorer,
  raw: &str,
  as_json: bool,
  show_progress: bool,
) -> String {
  session.set_input(raw);
  if let Some(pending) = session.begin() {
    if show_progress {
      eprintln!("Checking {} ...", pending.url.as_str());
    }
    let outcome = scorer.score(&pending.url);
    session.complete(pending, outcome);
  }
  render::session(session, as_json)
}

pub fn features_report(raw: &str, as_json: bool) -> String {
  let url = match normalize(raw) {
    Ok(u) => u,
    Err(e) => return render::error_line(e.user_message(), as_json),
  };
  match features::extract(&url) {
    Ok(f) if as_json => render::features_json(url.as_str(), &f),
    Ok(f) => render::features_text(url.as_str(), &f),
    Err(e) => {
      tracing::info!(reason = %e, "feature extraction rejected input");
      render::error_line(e.user_message(), as_json)
    }
  }
}

fn run_interactive(scorer: &dyn UrlScorer, as_json: bool) -> anyhow::Result<()> {
  let (stop_tx, stop_rx) = mpsc::channel::<()>();
  ctrlc::set_handler(move || {
    let _ = stop_tx.send(());
  })?;

  let (line_tx, line_rx) = mpsc::channel::<String>();
  std::thread::spawn(move || {
    for line in io::stdin().lock().lines() {
      let Ok(line) = line else { break };
      if line_tx.send(line).is_err() {
        break;
      }
    }
  });

  tracing::info!(scorer = scorer.name(), "interactive session started");
  eprintln!("Enter a URL to check (`reset` clears, `quit` exits).");
  prompt();

  let mut session = CheckSession::new();
  loop {
    if stop_rx.try_recv().is_ok() {
      break;
    }

    let line = match line_rx.recv_timeout(TICK) {
      Ok(l) => l,
      Err(RecvTimeoutError::Timeout) => continue,
      Err(RecvTimeoutError::Disconnected) => break,
    };

    match line.trim() {
      "quit" | "exit" => break,
      "reset" => {
        session.reset();
        eprintln!("Cleared.");
      }
      _ => println!("{}", check_line(&mut session, scorer, &line, as_json, true)),
    }
    prompt();
  }

  tracing::info!("interactive session ended");
  Ok(())
}

fn prompt() {
  eprint!("> ");
  let _ = io::stderr().flush();
}

fn print_help() {
  println!(
    "phish-check {}\n\
     \n\
     USAGE:\n\
     \x20 phish-check [OPTIONS] [URL]...\n\
     \n\
     With no URL, reads one URL per line from stdin.\n\
     \n\
     OPTIONS:\n\
     \x20 --json           print results as JSON\n\
     \x20 --remote         use the remote scoring service\n\
     \x20 --heuristic      use the built-in heuristic scorer\n\
     \x20 --features       print the URL feature vector instead of a verdict\n\
     \x20 -i, --interactive  read URLs from stdin even when URLs are given\n\
     \x20 -v, --verbose    mirror logs to stderr\n\
     \x20 --version        print version\n\
     \x20 -h, --help       print this help\n\
     \n\
     Config: $PHISH_GUARD_HOME/config.toml (default ~/.phish-guard)",
    env!("CARGO_PKG_VERSION")
  );
}
