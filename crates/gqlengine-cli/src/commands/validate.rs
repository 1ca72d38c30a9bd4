use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use gqlengine::validation::Validator;
use gqlengine::LocatedError;
use gqlengine::Schema;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct ValidateCmd {
    #[arg(
        help="Path to the schema SDL file to validate documents against.",
        long,
    )]
    schema: PathBuf,

    #[arg(
        help="Path to a JSON engine configuration file.",
        long,
    )]
    config: Option<PathBuf>,

    #[arg(
        default_values_t=[
            "graphql".to_string(),
            "gql".to_string(),
        ],
        help="Set of file extensions to filter to when searching for files \
             within a directory.",
        long,
        value_delimiter = ',',
    )]
    graphql_file_exts: Vec<String>,

    #[arg(
        help="Paths to one or more executable GraphQL documents or \
             directories containing them.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}

#[inherent::inherent]
impl RunnableCommand for ValidateCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        match self.validate_all() {
            Ok(report) => report,
            Err(err) => CommandResult::from_error(err),
        }
    }
}

impl ValidateCmd {
    fn validate_all(&self) -> anyhow::Result<CommandResult> {
        let schema = super::load_schema(&self.schema)?;
        let config = super::load_config(self.config.as_deref())?;
        let file_paths = self.find_document_paths()?;
        log::debug!("Found {} GraphQL documents to be validated.", file_paths.len());

        let mut failures = vec![];
        let mut num_operations = 0;
        for path in &file_paths {
            match validate_file(&schema, &config.validation, path)? {
                Ok(operations) => num_operations += operations,
                Err(errors) => failures.extend(
                    errors
                        .iter()
                        .map(|err| output_utils::format_located_error(path, err)),
                ),
            }
        }

        if !failures.is_empty() {
            return Ok(CommandResult::failure(format_args!(
                "{} {} GraphQL validation errors:\n{}",
                output_utils::RED_X,
                failures.len(),
                failures.join("\n"),
            )));
        }

        Ok(CommandResult::success(format_args!(
            concat!(
                "{} All GraphQL validated successfully:\n",
                "  * Analyzed {} files.\n",
                "  * Validated {} operations.",
            ),
            output_utils::GREEN_CHECK,
            file_paths.len(),
            num_operations,
        )))
    }

    fn find_document_paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        let graphql_file_exts: HashSet<String> = self
            .graphql_file_exts
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        log::debug!("Scanning {} input paths...", self.file_or_dir_paths.len());
        let mut file_paths = vec![];
        for root in &self.file_or_dir_paths {
            for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to scan files under {root:#?}"))?;
                let path = entry.path();
                if !entry.file_type().is_file() {
                    log::trace!("Skipping non-file: {path:#?}.");
                    continue;
                }
                if path
                    .extension()
                    .is_some_and(|ext| graphql_file_exts.contains(&*ext.to_string_lossy()))
                {
                    file_paths.push(path.to_path_buf());
                }
            }
        }

        // A single file named explicitly is validated whatever its extension.
        if file_paths.is_empty()
            && let [only_path] = self.file_or_dir_paths.as_slice()
            && only_path.is_file()
        {
            log::warn!(
                "Proceeding to validate {only_path:#?} even though it doesn't \
                match any of the --graphql-file-exts.",
            );
            file_paths.push(only_path.clone());
        }

        Ok(file_paths)
    }
}

/// Parses and validates one document. The outer error is an I/O failure; the
/// inner one carries the document's located errors.
fn validate_file(
    schema: &Schema,
    options: &gqlengine::config::ValidationOptions,
    path: &Path,
) -> anyhow::Result<Result<usize, Vec<LocatedError>>> {
    let source = super::read_file(path)?;
    let document = match gqlengine::parse(&source) {
        Ok(document) => document,
        Err(err) => return Ok(Err(vec![LocatedError::from(&err)])),
    };
    let errors = Validator::new(schema, &document)
        .with_options(options.clone())
        .validate();
    log::trace!("Validated {path:#?}: {} errors.", errors.len());
    if errors.is_empty() {
        Ok(Ok(document.operations().count()))
    } else {
        Ok(Err(errors))
    }
}
