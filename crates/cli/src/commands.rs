use drypowder_core::models::duration::HoldDuration;

/// One line typed at the interactive prompt.
///
/// Rows are shown and typed 1-based; the parsed value is 0-based.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Show,
    Editors,
    Duration { row: usize, duration: HoldDuration },
    Target { row: usize, price: f64 },
    StopLoss { row: usize, price: f64 },
    Save,
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  show                      performance table
  editors                   hold duration / target / stop-loss per row
  duration <row> <choice>   set hold duration (1-4 or label, e.g. \"3-5 years\")
  target <row> <price>      set target price
  stop <row> <price>        set stop-loss price
  save                      write the table to the output CSV
  reload                    drop the cached load and read everything again
  help                      this text
  quit                      leave (unsaved edits are lost)";

pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".into());
    };
    let rest: Vec<&str> = parts.collect();

    match verb.to_lowercase().as_str() {
        "show" | "ls" => no_args(&rest, ReplCommand::Show),
        "editors" | "edit" => no_args(&rest, ReplCommand::Editors),
        "save" | "w" => no_args(&rest, ReplCommand::Save),
        "reload" => no_args(&rest, ReplCommand::Reload),
        "help" | "?" => no_args(&rest, ReplCommand::Help),
        "quit" | "exit" | "q" => no_args(&rest, ReplCommand::Quit),
        "duration" | "d" => {
            let (row, value) = row_and_value(&rest, "duration <row> <choice>")?;
            let duration = value.parse::<HoldDuration>().map_err(|e| e.to_string())?;
            Ok(ReplCommand::Duration { row, duration })
        }
        "target" | "t" => {
            let (row, value) = row_and_value(&rest, "target <row> <price>")?;
            Ok(ReplCommand::Target { row, price: parse_price(&value)? })
        }
        "stop" | "s" => {
            let (row, value) = row_and_value(&rest, "stop <row> <price>")?;
            Ok(ReplCommand::StopLoss { row, price: parse_price(&value)? })
        }
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn no_args(rest: &[&str], cmd: ReplCommand) -> Result<ReplCommand, String> {
    if rest.is_empty() {
        Ok(cmd)
    } else {
        Err(format!("unexpected arguments: {}", rest.join(" ")))
    }
}

/// Split `<row> <value...>`. The value may contain spaces (duration labels do).
fn row_and_value(rest: &[&str], usage: &str) -> Result<(usize, String), String> {
    let (row, value) = match rest {
        [row, value @ ..] if !value.is_empty() => (row, value.join(" ")),
        _ => return Err(format!("usage: {usage}")),
    };
    let row: usize = row
        .parse()
        .map_err(|_| format!("row must be a number, got '{row}'"))?;
    let row = row
        .checked_sub(1)
        .ok_or_else(|| "rows are numbered from 1".to_string())?;
    Ok((row, value))
}

fn parse_price(text: &str) -> Result<f64, String> {
    let cleaned = text.trim().trim_start_matches('$').replace(',', "");
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| format!("not a price: '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_verbs() {
        assert_eq!(parse("show"), Ok(ReplCommand::Show));
        assert_eq!(parse("  SAVE "), Ok(ReplCommand::Save));
        assert_eq!(parse("q"), Ok(ReplCommand::Quit));
        assert!(parse("show extra").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn rows_are_one_based() {
        assert_eq!(
            parse("target 1 150.5"),
            Ok(ReplCommand::Target { row: 0, price: 150.5 })
        );
        assert!(parse("target 0 150").is_err());
        assert!(parse("target x 150").is_err());
    }

    #[test]
    fn prices_accept_currency_formatting() {
        assert_eq!(
            parse("stop 3 $1,250.75"),
            Ok(ReplCommand::StopLoss { row: 2, price: 1250.75 })
        );
        assert!(parse("stop 3 cheap").is_err());
        assert!(parse("stop 3 inf").is_err());
    }

    #[test]
    fn duration_by_number_or_label() {
        assert_eq!(
            parse("duration 2 3"),
            Ok(ReplCommand::Duration { row: 1, duration: HoldDuration::ThreeToFiveYears })
        );
        assert_eq!(
            parse("duration 2 1-3 years"),
            Ok(ReplCommand::Duration { row: 1, duration: HoldDuration::OneToThreeYears })
        );
        assert_eq!(
            parse("d 1 5+ years"),
            Ok(ReplCommand::Duration { row: 0, duration: HoldDuration::FivePlusYears })
        );
        assert!(parse("duration 1 forever").is_err());
        assert!(parse("duration 1").is_err());
    }
}
