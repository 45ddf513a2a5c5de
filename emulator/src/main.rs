mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use eventline_core::Millis;
use session::{Session, SessionOptions};

const USAGE: &str =
    "Usage: eventline-emulator [--poll <ms>] [--debounce <ms>] [--hold <ms>] [--repeat <ms>]";

fn main() -> io::Result<()> {
    let options = parse_options(env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("{USAGE}");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(options);
    let mut line = String::new();

    writeln!(
        writer,
        "Eventline bench emulator ready (button, toggle, timer, interval). Type `help` for commands or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "[t={}ms]> ", session.now())?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_options<I>(mut args: I) -> Result<SessionOptions, String>
where
    I: Iterator<Item = String>,
{
    let mut options = SessionOptions::default();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        let value = match inline.or_else(|| args.next()) {
            Some(value) => value,
            None => return Err(format!("Expected value after {flag}")),
        };
        match flag.as_str() {
            "--poll" => {
                let poll: Millis = parse_millis(&flag, &value)?;
                if poll == 0 {
                    return Err("--poll must be at least 1 ms".to_string());
                }
                options.poll_ms = poll;
            }
            "--debounce" => options.timing.debounce_ms = parse_millis(&flag, &value)?,
            "--hold" => options.timing.long_hold_ms = parse_millis(&flag, &value)?,
            "--repeat" => options.timing.repeat_ms = parse_millis(&flag, &value)?,
            _ => return Err(format!("Unknown option `{flag}`")),
        }
    }
    Ok(options)
}

fn parse_millis<T>(flag: &str, value: &str) -> Result<T, String>
where
    T: std::str::FromStr,
{
    value
        .parse()
        .map_err(|_| format!("Invalid milliseconds `{value}` for {flag}"))
}

#[cfg(test)]
mod tests {
    use eventline_core::PinTiming;

    use super::*;

    fn parse(args: &[&str]) -> Result<SessionOptions, String> {
        parse_options(args.iter().map(ToString::to_string))
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse(&[]), Ok(SessionOptions::default()));
    }

    #[test]
    fn accepts_separate_and_inline_values() {
        let options = parse(&["--poll", "5", "--debounce=20", "--hold", "600", "--repeat=50"])
            .expect("valid flags");
        assert_eq!(options.poll_ms, 5);
        assert_eq!(options.timing, PinTiming::new(20, 600, 50));
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(parse(&["--poll", "0"]).is_err());
        assert!(parse(&["--hold", "70000"]).is_err());
        assert!(parse(&["--debounce"]).is_err());
        assert!(parse(&["--speed", "3"]).is_err());
    }
}
