use anyhow::{Context, bail};
use bracket_engine::SeedingMode;

/// Overrides given on the command line. `None` keeps the environment value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub participants: Option<usize>,
    pub mode: Option<SeedingMode>,
    pub name: Option<String>,
    pub simulate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Help,
    Version,
    Run(CliArgs),
}

pub fn parse_args<I>(args: I) -> anyhow::Result<CliAction>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "--simulate" => parsed.simulate = true,
            "-n" | "--participants" => {
                let value = args.next().context("--participants needs a value")?;
                let count = value
                    .parse::<usize>()
                    .with_context(|| format!("invalid participant count: {value}"))?;
                parsed.participants = Some(count);
            }
            "-m" | "--mode" => {
                let value = args.next().context("--mode needs a value")?;
                parsed.mode = Some(value.parse()?);
            }
            "--name" => {
                parsed.name = Some(args.next().context("--name needs a value")?);
            }
            other => bail!("Unknown argument: {other}"),
        }
    }

    Ok(CliAction::Run(parsed))
}

pub fn usage_text() -> &'static str {
    "bracket-tui - single-elimination tournament bracket in your terminal

Usage:
  bracket-tui [options]
  bracket-tui --simulate [options]
  bracket-tui --help
  bracket-tui --version

Options:
  -n, --participants <N>   Number of players (default 8)
  -m, --mode <MODE>        Seeding: standard or random (default standard)
      --name <TEXT>        Tournament name
      --simulate           Play the whole bracket and print it as JSON

Environment:
  BRACKET_PARTICIPANTS     Default number of players
  BRACKET_MODE             Default seeding mode
  BRACKET_NAME             Default tournament name
  BRACKET_STRICT           Only allow 2, 4, 8 or 16 players (1/0)
  BRACKET_AUTO_BYES        Advance first-round byes automatically (default 1)
  BRACKET_LOG              Log level: off, error, warn, info, debug, trace"
}
