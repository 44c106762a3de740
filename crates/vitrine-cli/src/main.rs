mod browse;
mod render;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrine_core::PAGE_SIZE_OPTIONS;

#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(about = "Browse and filter the remote product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show one page of the unfiltered catalog
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    /// List the fields that can be filtered on
    Fields,
    /// Show the distinct values of a field
    Values {
        /// Field name (e.g. brand, price, product)
        field: String,
    },
    /// Show products where FIELD equals VALUE
    Filter {
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1, value_parser = parse_page_number)]
    page: usize,
    /// Items per page (5, 10, 20 or 50); defaults to `VITRINE_PAGE_SIZE`
    #[arg(long, value_parser = parse_page_size)]
    page_size: Option<usize>,
}

fn parse_page_number(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("page numbers start at 1".to_owned()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size = raw.parse::<usize>().map_err(|e| e.to_string())?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = vitrine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let api = browse::connect(&config)?;

    match cli.command {
        Commands::List { paging } => {
            browse::run_list(api, &config, paging.page, paging.page_size).await?;
        }
        Commands::Fields => browse::run_fields(api.as_ref()).await?,
        Commands::Values { field } => browse::run_values(api.as_ref(), &field).await?,
        Commands::Filter {
            field,
            value,
            paging,
        } => {
            browse::run_filter(
                api,
                &config,
                &field,
                &value,
                paging.page,
                paging.page_size,
            )
            .await?;
        }
    }

    Ok(())
}
