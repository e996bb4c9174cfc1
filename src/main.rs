//! Command-line front end: `urlencoder [-e|-d] <text>`.

use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage : urlencoder [-ed] text
Encode and decode URL parameters.
  -e  encode (default)
  -d  decode";

/// Exit status of a malformed escape reaching the top level.
const STATUS_MALFORMED: u8 = 2;

/// Exit status of an argument-shape error.
const STATUS_USAGE: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "urlencoder", disable_help_flag = true, disable_version_flag = true)]
struct Args {
	/// Encode the text (default).
	#[arg(short = 'e', conflicts_with = "decode")]
	encode: bool,

	/// Decode the text.
	#[arg(short = 'd')]
	decode: bool,

	text: String,
}

/// Text to print and the process exit status.
///
/// A zero status goes to stdout, anything else to stderr.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
	output: String,
	status: u8,
}

impl Outcome {
	fn success(output: impl Into<String>) -> Self {
		Self {
			output: output.into(),
			status: 0,
		}
	}

	fn usage() -> Self {
		Self {
			output: USAGE.to_owned(),
			status: STATUS_USAGE,
		}
	}
}

/// Checks the raw argument shape and rewrites it for clap.
///
/// Accepted shapes are `<text>` where the text does not start with `-`, and
/// `-e <text>` or `-d <text>` where the text is anything. A `--` is inserted
/// ahead of the text so clap never reads it as a flag.
fn normalize(args: Vec<OsString>) -> Option<Vec<OsString>> {
	let mut args = args.into_iter();
	let bin = args.next()?;
	let rest: Vec<OsString> = args.collect();

	match rest.as_slice() {
		[text] if !text.to_string_lossy().starts_with('-') => {
			Some(vec![bin, "--".into(), text.clone()])
		}
		[flag, text] if flag.as_os_str() == "-e" || flag.as_os_str() == "-d" => {
			Some(vec![bin, flag.clone(), "--".into(), text.clone()])
		}
		_ => None,
	}
}

fn run<I, T>(args: I) -> Outcome
where
	I: IntoIterator<Item = T>,
	T: Into<OsString>,
{
	let Some(args) = normalize(args.into_iter().map(Into::into).collect()) else {
		debug!("rejected argument shape");
		return Outcome::usage();
	};

	let args = match Args::try_parse_from(args) {
		Ok(args) => args,
		Err(e) => {
			debug!(kind = ?e.kind(), "rejected arguments");
			return Outcome::usage();
		}
	};

	if args.decode {
		debug!(len = args.text.len(), "decoding");
		match urlencoder::decode(&args.text) {
			Ok(decoded) => Outcome::success(decoded),
			Err(e) => {
				warn!(offset = e.offset(), "malformed escape");
				Outcome {
					output: format!("error: {e}"),
					status: STATUS_MALFORMED,
				}
			}
		}
	} else {
		debug!(len = args.text.len(), "encoding");
		Outcome::success(urlencoder::encode(&args.text))
	}
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.compact()
		.init();
}

fn main() -> ExitCode {
	init_tracing();

	let outcome = run(std::env::args_os());
	if outcome.status == 0 {
		println!("{}", outcome.output);
	} else {
		eprintln!("{}", outcome.output);
	}

	ExitCode::from(outcome.status)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run_args(args: &[&str]) -> Outcome {
		run(std::iter::once("urlencoder").chain(args.iter().copied()))
	}

	#[test]
	fn encode_by_default() {
		assert_eq!(run_args(&["a test &"]), Outcome::success("a%20test%20%26"));
	}

	#[test]
	fn encode_flag() {
		assert_eq!(run_args(&["-e", "a test &"]), Outcome::success("a%20test%20%26"));
	}

	#[test]
	fn decode_flag() {
		assert_eq!(run_args(&["-d", "a%20test%20%26"]), Outcome::success("a test &"));
	}

	#[test]
	fn flag_takes_hyphen_text() {
		assert_eq!(run_args(&["-e", "-5"]), Outcome::success("-5"));
		assert_eq!(run_args(&["-d", "-e"]), Outcome::success("-e"));
		assert_eq!(run_args(&["-e", "-e x"]), Outcome::success("-e%20x"));
	}

	#[test]
	fn usage_errors() {
		for args in [
			&[][..],
			&["-x", "text"][..],
			&["-e"][..],
			&["-e", "-d", "text"][..],
			&["-ed", "text"][..],
			&["one", "two"][..],
			&["-d", "one", "two"][..],
			&["-h"][..],
			&["-d"][..],
			&["-"][..],
			&["-5"][..],
			&["--", "x"][..],
			&["a%20b", "-d"][..],
			&["-e", "--", "x"][..],
		] {
			assert_eq!(run_args(args), Outcome::usage(), "{args:?}");
		}
	}

	#[test]
	fn malformed_escape_status() {
		let outcome = run_args(&["-d", "sdkjfh%xx"]);
		assert_eq!(outcome.status, STATUS_MALFORMED);
		assert_eq!(
			outcome.output,
			"error: illegal characters in escape sequence at offset 6"
		);
	}
}
