//! MCP server exposing fastener search over stdio.

use crate::tools::catalog_info::handle_catalog_info;
use crate::tools::search::{SearchEngine, SearchReply, handle_search};
use crate::types::SearchRequest;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for fastener catalog search
#[derive(Clone)]
pub struct FastenerServer {
    /// Store plus retrieval and scoring settings, shared across requests
    engine: Arc<SearchEngine>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for FastenerServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastenerServer")
            .field("engine", &self.engine)
            .finish()
    }
}

#[tool_router]
impl FastenerServer {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            tool_router: Self::tool_router(),
        }
    }

    /// The engine every tool delegates to.
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    #[tool(
        description = "Search the fastener catalog. Takes the free-text query and the structured intent extracted from it (type, standard, diameter, length, coating, material, grade) and returns candidates ranked by match probability, each with the reason, matched tokens and a score explanation.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search_fasteners(
        &self,
        Parameters(request): Parameters<SearchRequest>,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<String, String> {
        let reply = match handle_search(&self.engine, request, &context.ct).await {
            Ok(response) => SearchReply::ok(&response),
            Err(e) => {
                tracing::error!("search_fasteners failed: {e}");
                SearchReply::internal_error(&e)
            }
        };

        let text = reply.body.to_string();
        if reply.is_success() { Ok(text) } else { Err(text) }
    }

    #[tool(
        description = "Show the loaded catalog size and the search settings in effect: row limit per query, text-search language and scoring weights."
    )]
    async fn catalog_info(&self) -> std::result::Result<String, String> {
        let info = handle_catalog_info(&self.engine);
        serde_json::to_string_pretty(&info).map_err(|e| e.to_string())
    }
}

#[tool_handler]
impl ServerHandler for FastenerServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.protocol_version = ProtocolVersion::V_2024_11_05;
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(
            "fastener-search: ranks catalog fasteners (bolts, nuts, screws, washers) against a parsed request. \
             Call search_fasteners with the user's query and the extracted intent; sizes may use M-prefixes, \
             Latin or Cyrillic 'x', decimal commas and 'мм' suffixes."
                .to_string(),
        );
        info
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Sets `inline_subschemas = true` so nested types such as the intent are
/// rendered in place instead of as `$ref` definitions.
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
