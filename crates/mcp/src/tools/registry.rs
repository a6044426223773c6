// MCP tool trait and registry

use crate::context::RequestContext;
use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use serpbridge_core::ToolCategory;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments on behalf of one request
    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &RequestContext,
    ) -> Result<CallToolResult, ToolError>;

    /// Catalog group the tool belongs to
    fn category(&self) -> ToolCategory;
}

/// Tool registry for managing available tools.
///
/// `tools/list` returns tools in registration order.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        match self.by_name.get(&name) {
            Some(&idx) => self.tools[idx] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.by_name.get(name).map(|&idx| self.tools[idx].clone())
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    struct Named(&'static str, &'static str);

    #[async_trait::async_trait]
    impl Tool for Named {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.0.to_string(),
                title: None,
                description: self.1.to_string(),
                input_schema: json!({ "type": "object" }),
                annotations: None,
            }
        }

        async fn execute(
            &self,
            _arguments: Value,
            _ctx: &RequestContext,
        ) -> Result<CallToolResult, ToolError> {
            Ok(CallToolResult::text(self.1))
        }

        fn category(&self) -> ToolCategory {
            ToolCategory::Account
        }
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Arc::new(Named(name, "")));
        }
        let names: Vec<String> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Named("a", "first")));
        registry.register(Arc::new(Named("b", "")));
        registry.register(Arc::new(Named("a", "second")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list_schemas()[0].description, "second");
        assert!(registry.contains("b"));
        assert!(registry.get("c").is_none());
    }
}
