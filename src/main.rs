use clap::Parser;
use docindex_mcp::cli::{Cli, Commands};
use docindex_mcp::config::Config;
use docindex_mcp::server::IndexServer;
use docindex_mcp::state::IndexState;
use docindex_mcp::tools::{
    DiscoverIndexesRequest, ExportIndexRequest, GetEntryRequest, ListEntriesRequest,
    ListPagesRequest, LoadIndexRequest, ValidateIndexRequest, handle_discover_indexes,
    handle_export_index, handle_get_entry, handle_list_entries, handle_list_pages,
    handle_load_index, run_validate_index,
};
use rmcp::{ServiceExt, transport::stdio};
use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let (config, warnings) = Config::load()?;
    docindex_mcp::tracing::init(config.log_format);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let state = Arc::new(IndexState::new(config));

    let output = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            serve(state).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Validate { path, strict } => {
            let request = ValidateIndexRequest {
                path,
                strict: strict.then_some(true),
            };
            let (report, output) = run_validate_index(&state, &request).await?;
            print(&output)?;
            return Ok(if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Commands::Stats { path } => handle_load_index(&state, LoadIndexRequest { path }).await?,
        Commands::Pages { path } => handle_list_pages(&state, ListPagesRequest { path }).await?,
        Commands::List {
            path,
            category,
            page,
            limit,
        } => {
            let request = ListEntriesRequest {
                path,
                category,
                page,
                limit,
            };
            handle_list_entries(&state, request).await?
        }
        Commands::Show { path, location } => {
            handle_get_entry(&state, GetEntryRequest { path, location }).await?
        }
        Commands::Export { path, format } => {
            handle_export_index(&state, ExportIndexRequest { path, format }).await?
        }
        Commands::Discover { root } => {
            handle_discover_indexes(DiscoverIndexesRequest { root }).await?
        }
    };

    print(&output)?;
    Ok(ExitCode::SUCCESS)
}

async fn serve(state: Arc<IndexState>) -> anyhow::Result<()> {
    tracing::info!("Starting docindex-mcp MCP server");

    // Create and serve the MCP server over stdio
    let server = IndexServer::with_state(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}

fn print(output: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
