use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one page of a Postgres table and print it as JSON
    Page(PageArgs),

    /// Decode a cursor under a key spec and print its values
    Decode {
        #[arg(long, help = "Key spec, e.g. `created_at:date,id:number`")]
        keys: Option<String>,

        #[arg(long, help = "Cursor token to decode")]
        cursor: String,

        #[arg(long, help = "Read `unknown` key columns with loose typing")]
        loose: bool,

        #[arg(long, help = "JSON settings file")]
        settings: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    #[arg(long, help = "Postgres connection string; defaults to KEYSET_DATABASE_URL")]
    pub conn_str: Option<String>,

    #[arg(long, help = ".env file to load before resolving the connection string")]
    pub env_file: Option<PathBuf>,

    #[arg(long, help = "JSON settings file")]
    pub settings: Option<PathBuf>,

    #[arg(long, help = "Table to paginate")]
    pub table: String,

    #[arg(long, help = "Schema of the table")]
    pub schema: Option<String>,

    #[arg(long, help = "Alias used to qualify key columns")]
    pub alias: Option<String>,

    #[arg(long, help = "Key spec, e.g. `created_at:date,id:number`")]
    pub keys: Option<String>,

    #[arg(long, help = "Page size")]
    pub limit: Option<usize>,

    #[arg(long, help = "`asc` or `desc`")]
    pub order: Option<String>,

    #[arg(long, help = "Continue after this cursor")]
    pub after: Option<String>,

    #[arg(long, help = "Continue before this cursor; ignored with --after")]
    pub before: Option<String>,

    #[arg(long, help = "Also report the number of matching rows")]
    pub count: bool,

    #[arg(long, help = "Read `unknown` key columns with loose typing")]
    pub loose: bool,

    #[arg(long, help = "Write the page to this file instead of stdout")]
    pub output: Option<PathBuf>,
}
