use crate::screens::{ScreenConfig, ScreenKind};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub kind: ScreenKind,
    pub config: ScreenConfig,
}

/// # Errors
/// Returns an error if the definition cannot be serialized.
pub fn execute(args: &Args) -> Result<String> {
    tracing::debug!(screen = %args.kind, "printing screen definition");
    Ok(args.config.to_yaml()?)
}
