//! MCP server exposing search index operations as tools.

use crate::config::Config;
use crate::state::IndexState;
use crate::tools::{
    DiscoverIndexesRequest, ExportIndexRequest, GetEntryRequest, ListEntriesRequest,
    ListPagesRequest, LoadIndexRequest, ValidateIndexRequest, handle_discover_indexes,
    handle_export_index, handle_get_entry, handle_list_entries, handle_list_pages,
    handle_load_index, handle_validate_index,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for documentation search index queries
#[derive(Clone)]
pub struct IndexServer {
    /// Shared index state (LRU of loaded indexes, configuration)
    state: Arc<IndexState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for IndexServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl IndexServer {
    pub fn new(config: Config) -> Self {
        Self::with_state(Arc::new(IndexState::new(config)))
    }

    pub fn with_state(state: Arc<IndexState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Load a documentation search index (search_index.js) and summarize it: entry count, pages, and entries per category.",
        input_schema = inline_schema_for_type::<LoadIndexRequest>()
    )]
    async fn load_index(
        &self,
        Parameters(request): Parameters<LoadIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_load_index(&self.state, request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "List the pages of a documentation search index in order, with the number of entries on each page.",
        input_schema = inline_schema_for_type::<ListPagesRequest>()
    )]
    async fn list_pages(
        &self,
        Parameters(request): Parameters<ListPagesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_pages(&self.state, request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "List entries of a documentation search index in generation order. Filter by exact category (page, section, method, ...) and/or page name.",
        input_schema = inline_schema_for_type::<ListEntriesRequest>()
    )]
    async fn list_entries(
        &self,
        Parameters(request): Parameters<ListEntriesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_entries(&self.state, request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Show the full text of every entry at an exact location (anchor) in a documentation search index. Suggests similar locations when nothing matches.",
        input_schema = inline_schema_for_type::<GetEntryRequest>()
    )]
    async fn get_entry(
        &self,
        Parameters(request): Parameters<GetEntryRequest>,
    ) -> std::result::Result<String, String> {
        handle_get_entry(&self.state, request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Check the structure of a documentation search index: empty index, unknown or missing categories, empty pages or titles, duplicate records.",
        input_schema = inline_schema_for_type::<ValidateIndexRequest>()
    )]
    async fn validate_index(
        &self,
        Parameters(request): Parameters<ValidateIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_validate_index(&self.state, request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Find search_index.js files below a directory, such as a documentation build output folder.",
        input_schema = inline_schema_for_type::<DiscoverIndexesRequest>()
    )]
    async fn discover_indexes(
        &self,
        Parameters(request): Parameters<DiscoverIndexesRequest>,
    ) -> std::result::Result<String, String> {
        handle_discover_indexes(request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Re-serialize a documentation search index as JavaScript (generator layout) or JSON.",
        input_schema = inline_schema_for_type::<ExportIndexRequest>()
    )]
    async fn export_index(
        &self,
        Parameters(request): Parameters<ExportIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_export_index(&self.state, request)
            .await
            .map_err(|e| e.to_string())
    }
}

#[tool_handler]
impl ServerHandler for IndexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docindex-mcp: Browse static documentation search indexes (search_index.js). \
                 Use discover_indexes to find index files, load_index for an overview, \
                 then list_pages, list_entries and get_entry to read entries.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline enum definitions instead of $ref patterns. This ensures MCP Inspector
/// displays enums as dropdown widgets rather than raw JSON input fields.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let serde_json::Value::Object(json_object) = object else {
        panic!("Schema serialization produced non-object value");
    };

    Arc::new(json_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn schema_inlines_export_format_enum() {
        let schema = inline_schema_for_type::<ExportIndexRequest>();
        let_assert!(Some(properties) = schema.get("properties").and_then(|p| p.as_object()));
        check!(properties.contains_key("path"));
        check!(properties.contains_key("format"));
        check!(!serde_json::to_string(&*schema).unwrap().contains("$ref"));
    }

    #[test]
    fn server_lists_tools() {
        let server = IndexServer::new(Config {
            cache_dir: None,
            ..Config::default()
        });
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        for expected in [
            "load_index",
            "list_pages",
            "list_entries",
            "get_entry",
            "validate_index",
            "discover_indexes",
            "export_index",
        ] {
            check!(names.iter().any(|n| n == expected), "missing tool {}", expected);
        }
    }
}
