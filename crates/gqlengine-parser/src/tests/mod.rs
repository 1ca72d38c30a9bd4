mod graphql_parser_operation_tests;
mod graphql_parser_schema_tests;
mod str_to_graphql_token_source_tests;
mod utils;
