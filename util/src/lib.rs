use std::{
    fs,
    path::{Path, PathBuf},
    process,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use miette::GraphicalReportHandler;
use nom::{
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    error::{ErrorKind, FromExternalError, ParseError},
    sequence::tuple,
    IResult,
};
use nom_locate::LocatedSpan;
use nom_supreme::{
    error::{BaseErrorKind, ErrorTree, GenericErrorTree},
    final_parser::final_parser,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Thanks to FasterThanLime! https://fasterthanli.me/series/advent-of-code-2022/part-11

pub type Span<'a> = LocatedSpan<&'a str>;

type BaseKind = BaseErrorKind<&'static str, Box<dyn std::error::Error + Send + Sync + 'static>>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("bad input")]
struct BadInput<'a> {
    #[source_code]
    src: &'a str,

    #[label("{kind}")]
    bad_bit: miette::SourceSpan,

    kind: BaseKind,
}

/// Which half of the puzzle to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    First,
    Second,
}

#[derive(thiserror::Error, Debug)]
#[error("Invalid part number: {0}")]
pub struct InvalidPart(String);

impl FromStr for Part {
    type Err = InvalidPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Part::First),
            "1" => Ok(Part::Second),
            other => Err(InvalidPart(other.to_string())),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Solve one part of a daily puzzle")]
pub struct Args {
    /// Puzzle input file
    pub input: PathBuf,

    /// 0 for the first part, 1 for the second
    #[arg(default_value = "0")]
    pub part: Part,
}

/// Initialize tracing for diagnostics.
///
/// Reads `RUST_LOG`, defaults to `warn`. Output goes to stderr so that
/// stdout only carries answers.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Could not find {}", path.display()))
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        // help and version go to stdout and are not failures
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    }
}

/// Entry point shared by every day: parse arguments, read the input file,
/// solve the requested part and print the answer line.
///
/// Any failure is printed to stderr and the process exits with code 1.
pub fn run<F>(solve: F)
where
    F: FnOnce(&str, Part) -> Result<String>,
{
    let args = parse_args();
    init_tracing();

    tracing::debug!(input = %args.input.display(), part = ?args.part, "solving");

    match read_input(&args.input).and_then(|input| solve(&input, args.part)) {
        Ok(answer) => println!("{answer}"),
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    }
}

pub fn parse_number<'a, T, E>(i: Span<'a>) -> IResult<Span<'a>, T, E>
where
    T: FromStr,
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, T::Err>,
{
    map_res(recognize(tuple((opt(char('-')), digit1))), |i: Span<'a>| {
        i.fragment().parse::<T>()
    })(i)
}

fn furthest_base(err: ErrorTree<Span<'_>>) -> (usize, BaseKind) {
    match err {
        GenericErrorTree::Base { location, kind } => (location.location_offset(), kind),
        GenericErrorTree::Stack { base, .. } => furthest_base(*base),
        GenericErrorTree::Alt(alternatives) => alternatives
            .into_iter()
            .map(furthest_base)
            .max_by_key(|(offset, _)| *offset)
            .unwrap_or((0, BaseErrorKind::Kind(ErrorKind::Alt))),
    }
}

/// Run `parse_fun` over the whole of `input`.
///
/// On failure the error carries a rendered report pointing at the offending
/// part of the input.
pub fn parse_with_report<'a, T, F>(input: &'a str, parse_fun: F) -> Result<T>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, T, ErrorTree<Span<'a>>>,
{
    let parsed: Result<T, ErrorTree<Span<'a>>> = final_parser(parse_fun)(Span::new(input));

    parsed.map_err(|e| {
        let (offset, kind) = furthest_base(e);
        let err = BadInput {
            src: input,
            bad_bit: miette::SourceSpan::new(offset.into(), 0.into()),
            kind,
        };

        let mut s = String::new();
        match GraphicalReportHandler::new().render_report(&mut s, &err) {
            Ok(()) => anyhow::Error::msg(s),
            Err(_) => anyhow::anyhow!("bad input at offset {offset}: {}", err.kind),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::{bytes::complete::tag, sequence::preceded};
    use rstest::rstest;

    fn parse_reading(i: Span) -> IResult<Span, i32, ErrorTree<Span>> {
        preceded(tag("value "), parse_number)(i)
    }

    #[rstest]
    #[case("0", Part::First)]
    #[case("1", Part::Second)]
    #[case(" 1 ", Part::Second)]
    fn part_from_str(#[case] input: &str, #[case] expected: Part) {
        let res = input.parse::<Part>();
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), expected);
    }

    #[rstest]
    #[case("2")]
    #[case("-1")]
    #[case("first")]
    fn part_from_str_invalid(#[case] input: &str) {
        let res = input.parse::<Part>();
        assert!(res.is_err());
        assert_eq!(
            res.unwrap_err().to_string(),
            format!("Invalid part number: {input}")
        );
    }

    #[test]
    fn parse_with_report_ok() {
        let res = parse_with_report("value -42", parse_reading);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), -42);
    }

    #[test]
    fn parse_with_report_rejects_trailing_input() {
        let res = parse_with_report("value 7 and more", parse_reading);
        assert!(res.is_err());
    }

    #[test]
    fn parse_with_report_renders_source() {
        let res = parse_with_report("value x", parse_reading);
        let message = res.unwrap_err().to_string();
        assert!(message.contains("bad input"));
        assert!(message.contains("value x"));
    }

    #[test]
    fn read_input_missing_file() {
        let res = read_input(Path::new("does/not/exist.txt"));
        assert!(res.is_err());
        assert!(res
            .unwrap_err()
            .to_string()
            .starts_with("Could not find does/not/exist.txt"));
    }
}
