use crate::cli::actions::{Action, rules, submit};
use crate::cli::commands::{ARG_CONFIG, ARG_FIELD, ARG_LATENCY, ARG_SCREEN};
use crate::core::value::Value;
use crate::screens::{FieldKind, ScreenConfig, ScreenKind};
use anyhow::{Context, Result, anyhow, bail};
use std::time::Duration;

/// # Errors
/// Returns an error if the screen, its config file or a field argument is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("submit", sub)) => {
            let (kind, config) = screen(sub)?;
            let fields = sub
                .get_many::<String>(ARG_FIELD)
                .into_iter()
                .flatten()
                .map(|raw| parse_field(&config, raw))
                .collect::<Result<Vec<_>>>()?;
            let latency = sub.get_one::<u64>(ARG_LATENCY).copied().unwrap_or(500);
            Ok(Action::Submit(submit::Args {
                kind,
                config,
                fields,
                latency: Duration::from_millis(latency),
            }))
        }
        Some(("rules", sub)) => {
            let (kind, config) = screen(sub)?;
            Ok(Action::Rules(rules::Args { kind, config }))
        }
        _ => bail!("missing subcommand"),
    }
}

fn screen(matches: &clap::ArgMatches) -> Result<(ScreenKind, ScreenConfig)> {
    let kind: ScreenKind = matches
        .get_one::<String>(ARG_SCREEN)
        .context("missing required argument: --screen")?
        .parse::<ScreenKind>()
        .map_err(|e| anyhow!(e))?;

    let config = match matches.get_one::<String>(ARG_CONFIG) {
        Some(path) => ScreenConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => kind.config(),
    };
    Ok((kind, config))
}

fn parse_field(config: &ScreenConfig, raw: &str) -> Result<(String, Value)> {
    let (id, value) = raw
        .split_once('=')
        .with_context(|| format!("field `{raw}` is not name=value"))?;
    let field = config
        .fields
        .get(id)
        .with_context(|| format!("unknown field `{id}`"))?;

    let value = match field.kind {
        FieldKind::Text => Value::from(value),
        FieldKind::Toggle => Value::Bool(
            value
                .parse::<bool>()
                .with_context(|| format!("field `{id}` expects true or false"))?,
        ),
    };
    Ok((id.to_string(), value))
}
