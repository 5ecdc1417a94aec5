pub mod logging;

use crate::screens::ScreenKind;
use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        PossibleValuesParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

pub const ARG_SCREEN: &str = "screen";
pub const ARG_FIELD: &str = "field";
pub const ARG_CONFIG: &str = "config";
pub const ARG_LATENCY: &str = "latency";

fn screen_arg() -> Arg {
    Arg::new(ARG_SCREEN)
        .short('s')
        .long("screen")
        .help("Built-in screen to use")
        .required(true)
        .value_parser(PossibleValuesParser::new(
            ScreenKind::ALL.map(ScreenKind::as_str),
        ))
}

fn config_arg() -> Arg {
    Arg::new(ARG_CONFIG)
        .short('c')
        .long("config")
        .help("YAML screen definition replacing the built-in one")
        .env("AUTHFORMS_CONFIG")
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("authforms")
        .about("Validate and submit storefront auth forms against a mock backend")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("submit")
                .about("Fill a screen's fields, submit it and print the resulting view as JSON")
                .arg(screen_arg())
                .arg(config_arg())
                .arg(
                    Arg::new(ARG_FIELD)
                        .short('f')
                        .long("field")
                        .help("Field value as name=value; toggles take true or false")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new(ARG_LATENCY)
                        .long("latency")
                        .help("Simulated backend latency in milliseconds")
                        .default_value("500")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Print a screen definition as YAML")
                .arg(screen_arg())
                .arg(config_arg()),
        );

    logging::with_args(command)
}
