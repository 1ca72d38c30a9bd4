use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use gqlengine::indexmap::IndexMap;
use gqlengine::Engine;
use gqlengine::FieldValue;
use gqlengine::Value;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct ExecuteCmd {
    #[arg(
        help="Path to the schema SDL file.",
        long,
    )]
    schema: PathBuf,

    #[arg(
        help="Path to a JSON file holding the root value. Fields read the \
             same-named properties; a `__typename` property names the \
             concrete type of an object.",
        long,
    )]
    data: PathBuf,

    #[arg(
        help="Path to the executable GraphQL document.",
        long,
    )]
    query: PathBuf,

    #[arg(
        help="Name of the operation to execute when the document has several.",
        long,
    )]
    operation: Option<String>,

    #[arg(
        help="Variable values as a JSON object.",
        long,
    )]
    variables: Option<String>,

    #[arg(
        help="Path to a JSON engine configuration file.",
        long,
    )]
    config: Option<PathBuf>,
}

#[inherent::inherent]
impl RunnableCommand for ExecuteCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        match self.execute().await {
            Ok(result) => result,
            Err(err) => CommandResult::from_error(err),
        }
    }
}

impl ExecuteCmd {
    async fn execute(&self) -> anyhow::Result<CommandResult> {
        let schema = super::load_schema(&self.schema)?;
        let config = super::load_config(self.config.as_deref())?;

        let data = super::read_file(&self.data)?;
        let root: serde_json::Value = serde_json::from_str(&data)
            .with_context(|| format!("{:#?} is not valid JSON", self.data))?;

        let variables: IndexMap<String, Value> = match &self.variables {
            Some(json) => serde_json::from_str(json)
                .context("--variables must be a JSON object")?,
            None => IndexMap::new(),
        };

        let source = super::read_file(&self.query)?;
        let document = match gqlengine::parse(&source) {
            Ok(document) => document,
            Err(err) => {
                let err = gqlengine::LocatedError::from(&err);
                return Ok(CommandResult::failure(format_args!(
                    "{} {}",
                    output_utils::RED_X,
                    output_utils::format_located_error(&self.query, &err),
                )));
            },
        };

        log::debug!(
            "Executing {:#?} (operation: {:?}).",
            self.query,
            self.operation,
        );
        let response = Engine::new(schema)
            .with_config(config)
            .execute(
                &document,
                self.operation.as_deref(),
                &variables,
                FieldValue::from_json(root),
            )
            .await?;

        let rendered = serde_json::to_string_pretty(&response)?;
        Ok(if response.is_ok() {
            CommandResult::success(format_args!("{rendered}"))
        } else {
            CommandResult {
                exit_code: std::process::ExitCode::FAILURE,
                stderr: None,
                stdout: Some(rendered),
            }
        })
    }
}
