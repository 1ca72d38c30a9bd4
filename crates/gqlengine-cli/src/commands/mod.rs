mod execute;
mod validate;

use crate::Cli;
use crate::CommandResult;
use anyhow::Context;
use execute::ExecuteCmd;
use gqlengine::EngineConfig;
use gqlengine::Schema;
use gqlengine::SchemaBuilder;
use std::path::Path;
use validate::ValidateCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "gqlengine")]
pub(crate) enum CommandEnum {
    /// Executes an operation against a JSON root value.
    Execute(Box<ExecuteCmd>),

    /// Validates executable documents against a schema.
    Validate(Box<ValidateCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Execute(cmd) => cmd.run(cli).await,
            Self::Validate(cmd) => cmd.run(cli).await,
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:#?}"))
}

/// Loads and builds a schema from an SDL file. Fields resolve from the root
/// value's properties since no resolvers are bound.
fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    let sdl = read_file(path)?;
    let builder = SchemaBuilder::from_str(&sdl)
        .with_context(|| format!("Failed to parse schema {path:#?}"))?;
    builder.build().map_err(|errors| {
        let rendered = errors
            .iter()
            .map(|err| format!("  * {err}"))
            .collect::<Vec<_>>()
            .join("\n");
        anyhow::anyhow!("Schema {path:#?} is invalid:\n{rendered}")
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = read_file(path)?;
            EngineConfig::from_json_str(&json)
                .with_context(|| format!("Invalid engine configuration in {path:#?}"))
        },
        None => Ok(EngineConfig::default()),
    }
}
