pub mod rules;
pub mod submit;

mod run;

#[derive(Debug)]
pub enum Action {
    Submit(submit::Args),
    Rules(rules::Args),
}

impl Action {
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
