use crate::{
    commands::{Commands, PageArgs},
    env::{DATABASE_URL_VAR, EnvManager},
    error::CliError,
    settings::Settings,
};
use clap::Parser;
use connectors::sql::{page_query::SqlPageQuery, postgres::adapter::PgAdapter};
use engine::paginator::Paginator;
use model::pagination::{
    cursor::Cursor,
    request::{PageRequest, PaginationKeys},
};
use planner::query::{ast::common::TableRef, builder::select::SelectBuilder};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;
mod settings;

#[derive(Parser)]
#[command(name = "keyset", version = "0.1.0", about = "Keyset pagination over SQL tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Page(args) => run_page(args).await?,
        Commands::Decode {
            keys,
            cursor,
            loose,
            settings,
        } => {
            let settings = Settings::load(settings.as_deref()).await?;
            let keys = settings.keys(keys.as_deref())?.unwrap_or_default();
            let values = settings
                .cursor_codec(loose)?
                .decode(&keys, &Cursor::new(cursor))?;
            output::emit(&output::cursor_values_json(&values), None).await?;
        }
    }

    Ok(())
}

async fn run_page(args: PageArgs) -> Result<(), CliError> {
    let settings = Settings::load(args.settings.as_deref()).await?;
    let request = build_request(&args, &settings)?;
    let paginator = Paginator::new(settings.cursor_codec(args.loose)?);

    let url = resolve_database_url(&args)?;
    let adapter = PgAdapter::connect(&url).await?;

    let table = TableRef {
        schema: args.schema.clone(),
        name: args.table.clone(),
    };
    let select = SelectBuilder::new()
        .select(vec![])
        .from(table, args.alias.as_deref())
        .build();

    info!(table = %args.table, "Fetching page");
    let page = paginator
        .paginate(&request, SqlPageQuery::new(&adapter, select))
        .await?;
    info!(rows = page.len(), "Page fetched");

    output::emit(&output::page_json(&page), args.output.as_deref()).await
}

fn build_request(args: &PageArgs, settings: &Settings) -> Result<PageRequest, CliError> {
    let mut builder = PageRequest::builder()
        .keys(
            settings
                .keys(args.keys.as_deref())?
                .unwrap_or_default(),
        )
        .after(args.after.clone().map(Cursor::new))
        .before(args.before.clone().map(Cursor::new))
        .with_count(args.count);

    if let Some(limit) = settings.limit(args.limit) {
        builder = builder.limit(limit);
    }
    if let Some(order) = settings.order(args.order.as_deref())? {
        builder = builder.order(order);
    }
    if let Some(alias) = &args.alias {
        builder = builder.alias(alias.clone());
    }

    Ok(builder.build()?)
}

fn resolve_database_url(args: &PageArgs) -> Result<String, CliError> {
    if let Some(url) = &args.conn_str {
        return Ok(url.clone());
    }

    let mut env = EnvManager::new();
    match &args.env_file {
        Some(path) => env.load_from_file(path)?,
        None if Path::new(".env").exists() => env.load_from_file(".env")?,
        None => {}
    }

    env.database_url()
        .map(str::to_string)
        .ok_or(CliError::MissingDatabaseUrl(DATABASE_URL_VAR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::pagination::request::{BaseOrder, Direction};

    fn args() -> PageArgs {
        PageArgs {
            table: "users".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_defaults() {
        let request = build_request(&args(), &Settings::default()).unwrap();
        assert_eq!(request.limit(), 100);
        assert_eq!(request.order(), BaseOrder::Descending);
        assert_eq!(request.keys(), &PaginationKeys::default());
        assert_eq!(request.direction(), Direction::None);
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings::from_json(r#"{"default_limit": 10, "default_order": "asc"}"#).unwrap();
        let args = PageArgs {
            limit: Some(3),
            before: Some("aWQ6Mw==".to_string()),
            alias: Some("u".to_string()),
            ..args()
        };

        let request = build_request(&args, &settings).unwrap();
        assert_eq!(request.limit(), 3);
        assert_eq!(request.order(), BaseOrder::Ascending);
        assert_eq!(request.alias(), Some("u"));
        assert_eq!(request.direction(), Direction::Backward);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let args = PageArgs {
            limit: Some(0),
            ..args()
        };
        assert!(matches!(
            build_request(&args, &Settings::default()),
            Err(CliError::Pagination(_))
        ));
    }

    #[test]
    fn test_conn_str_flag_wins() {
        let args = PageArgs {
            conn_str: Some("postgres://flag/db".to_string()),
            ..args()
        };
        assert_eq!(resolve_database_url(&args).unwrap(), "postgres://flag/db");
    }
}
