use crate::{load_manifest, not_found};
use scanscope_api::{CacheOwner, ResourcePath, ScopeContext};
use scanscope_core::{BuildModel, ContextResolver};
use std::path::Path;
use tabled::{Table, Tabled};

/// Scope named the way a user types it.
#[derive(Debug, Clone, Default)]
pub struct ScopeArgs {
    pub configuration: String,
    pub resource: Option<String>,
    pub tool: Option<String>,
    pub input: Option<String>,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn render(manifest: &Path, args: &ScopeArgs) -> Result<String, Box<dyn std::error::Error>> {
    let (manifest, model) = load_manifest(manifest)?;
    let scope = scope_from_args(&model, args)?;
    let resolved = ContextResolver::new(&model, &manifest.discovery).resolve(&scope);

    let rows = vec![
        FieldRow {
            field: "Scope",
            value: describe_scope(&model, &scope),
        },
        FieldRow {
            field: "Canonical",
            value: describe_scope(&model, &resolved.canonical),
        },
        FieldRow {
            field: "Owner",
            value: describe_owner(&model, resolved.owner()),
        },
        FieldRow {
            field: "Profile",
            value: resolved.profile_id.clone().unwrap_or_else(|| "<none>".to_string()),
        },
        FieldRow {
            field: "Strategy",
            value: format!("{:?}", resolved.strategy),
        },
    ];
    Ok(Table::new(rows).to_string())
}

pub fn scope_from_args(model: &BuildModel, args: &ScopeArgs) -> scanscope_core::Result<ScopeContext> {
    let cfg = model
        .configuration_by_name(&args.configuration)
        .ok_or_else(|| not_found("configuration", &args.configuration))?;
    let mut scope = ScopeContext::configuration(cfg.id);

    if let Some(path) = &args.resource {
        let rc = model
            .resource_info_by_path(cfg.id, &ResourcePath::parse(path))
            .ok_or_else(|| not_found("resource", path))?;
        scope = scope.with_resource(rc.id);
    }

    if let Some(name) = &args.tool {
        let tool = model.tool_by_name(name).ok_or_else(|| not_found("tool", name))?;
        let input = match &args.input {
            Some(input) => Some(
                model
                    .input_type_by_name(tool.id, input)
                    .ok_or_else(|| not_found("input type", input))?
                    .id,
            ),
            None => None,
        };
        scope = scope.with_tool(tool.id, input);
    }
    Ok(scope)
}

fn describe_scope(model: &BuildModel, scope: &ScopeContext) -> String {
    let mut parts = vec![model[scope.configuration].name.clone()];
    if let Some(rc) = scope.resource_info {
        let path = &model[rc].path;
        parts.push(if path.is_root() { "/".to_string() } else { path.to_string() });
    }
    if let Some(tool) = scope.tool {
        parts.push(model[tool].name.clone());
    }
    if let Some(input) = scope.input_type {
        parts.push(model[input].name.clone());
    }
    parts.join(" > ")
}

fn describe_owner(model: &BuildModel, owner: CacheOwner) -> String {
    match owner {
        CacheOwner::Configuration(id) => format!("configuration {}", model[id].name),
        CacheOwner::Resource(id) => format!("resource {}", model[id].path),
        CacheOwner::ToolInput(tool, Some(input)) => {
            format!("tool {} / {}", model[tool].name, model[input].name)
        }
        CacheOwner::ToolInput(tool, None) => format!("tool {}", model[tool].name),
    }
}
