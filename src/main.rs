mod lib;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use clap::{Parser, error::ErrorKind};
use log::{error, warn};

use crate::lib::{
    input::{InputEvent, listen_stdin},
    receiver::{HexReceiver, ReadOutcome},
    report,
};

fn main() {
    pretty_env_logger::init();

    let mut stdout = std::io::stdout();
    match run(std::env::args_os(), listen_stdin, &mut stdout) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Could not write to stdout: {}", e);
            std::process::exit(1);
        }
    }
}

/// One receive run. Returns the process exit status. `listen` is only
/// called once the arguments are valid, so a usage error never reads input.
fn run<I, T, F, W>(args: I, listen: F, out: &mut W) -> anyhow::Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce() -> Receiver<InputEvent>,
    W: Write,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                write!(out, "{}", e.render())?;
                return Ok(0);
            }
            _ => {
                report::write_usage(out)?;
                return Ok(1);
            }
        },
    };
    let output_file = args.output_path();

    report::write_prompt(out)?;
    let events = listen();
    let mut receiver = HexReceiver::new();
    if receiver.consume(&events) == ReadOutcome::Interrupted {
        report::write_interrupted(out)?;
    }

    match receiver.save(&output_file) {
        Ok(size) => {
            let expected = receiver.size_mismatch(size);
            if let Some(expected) = expected {
                warn!(
                    "Device announced {} bytes but {} were received",
                    expected, size
                );
            }
            report::write_saved(out, &output_file, size, expected)?;
        }
        Err(e) => report::write_error(out, &e)?,
    }
    Ok(0)
}

/// Rebuilds a file from the hex dump printed by the device's `transfer` command.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Destination file, created or overwritten
    #[arg(allow_hyphen_values = true, value_parser = clap::value_parser!(OsString))]
    output_file: OsString,
}

impl Args {
    fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn events(lines: &[&str], last: InputEvent) -> Receiver<InputEvent> {
        let (tx, rx) = mpsc::channel();
        for line in lines {
            tx.send(InputEvent::Line(format!("{}\n", line))).unwrap();
        }
        tx.send(last).unwrap();
        rx
    }

    fn run_with(args: &[&str], lines: &[&str], last: InputEvent) -> (i32, String) {
        let mut out = Vec::new();
        let code = run(args.iter().copied(), || events(lines, last), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    const PROMPT: &str = "Paste the hex data from ESP32 (press Ctrl+D when done):\n";
    const USAGE: &str = "Usage: hexrecv <output_file>\nExample: hexrecv 0000.vid\n";

    #[test]
    fn test_args_single_output_file() {
        let args = Args::try_parse_from(["hexrecv", "0000.vid"]).unwrap();
        assert_eq!(args.output_path(), PathBuf::from("0000.vid"));
    }

    #[test]
    fn test_args_hyphen_and_empty_paths() {
        let args = Args::try_parse_from(["hexrecv", "-out.bin"]).unwrap();
        assert_eq!(args.output_path(), PathBuf::from("-out.bin"));
        let args = Args::try_parse_from(["hexrecv", "-"]).unwrap();
        assert_eq!(args.output_path(), PathBuf::from("-"));
        let args = Args::try_parse_from(["hexrecv", ""]).unwrap();
        assert_eq!(args.output_path(), PathBuf::new());
    }

    #[test]
    fn test_run_wrong_arg_count_prints_usage() {
        for args in [&["hexrecv"][..], &["hexrecv", "a.bin", "b.bin"][..]] {
            let mut out = Vec::new();
            let code = run(
                args.iter().copied(),
                || panic!("input read after usage error"),
                &mut out,
            )
            .unwrap();
            assert_eq!(code, 1);
            assert_eq!(String::from_utf8(out).unwrap(), USAGE);
        }
    }

    #[test]
    fn test_run_saves_hello() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.bin");
        let path_str = path.to_str().unwrap();

        let (code, text) = run_with(&["hexrecv", path_str], &["48656c6c6f"], InputEvent::End);
        assert_eq!(code, 0);
        assert_eq!(
            text,
            format!("{}\nFile saved as: {}\nSize: 5 bytes\n", PROMPT, path_str)
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"Hello");
    }

    #[test]
    fn test_run_interrupt_keeps_partial_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.bin");
        let path_str = path.to_str().unwrap();

        let (code, text) = run_with(
            &["hexrecv", path_str],
            &["Transferred: 100%", "deadbeef"],
            InputEvent::Interrupted,
        );
        assert_eq!(code, 0);
        assert!(text.contains("\nInput terminated by user\n"));
        assert!(text.ends_with("Size: 4 bytes\n"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_run_odd_digits_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.bin");

        let (code, text) = run_with(
            &["hexrecv", path.to_str().unwrap()],
            &["abc"],
            InputEvent::End,
        );
        assert_eq!(code, 0);
        assert_eq!(text, format!("{}Error: Odd number of digits\n", PROMPT));
        assert!(!path.exists());
    }

    #[test]
    fn test_run_empty_path_reports_write_error() {
        let (code, text) = run_with(&["hexrecv", ""], &["00ff"], InputEvent::End);
        assert_eq!(code, 0);
        let report = text.strip_prefix(PROMPT).unwrap();
        assert!(report.starts_with("Error: could not write"));
        assert_eq!(report.lines().count(), 1);
    }
}
