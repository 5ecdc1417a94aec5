use crate::cli::actions::{Action, rules, submit};
use anyhow::Result;

pub(super) async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Submit(args) => {
            let view = submit::execute(args).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Action::Rules(args) => print!("{}", rules::execute(&args)?),
    }
    Ok(())
}
