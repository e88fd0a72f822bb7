use crate::{load_manifest, not_found};
use scanscope_core::{BuildModel, ContextResolver, ModelElement};
use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Profile")]
    profile: String,
    #[tabled(rename = "Per file")]
    per_file: String,
}

pub fn render(
    manifest: &Path,
    toolchain: Option<&str>,
    tool: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let (manifest, model) = load_manifest(manifest)?;
    let resolver = ContextResolver::new(&model, &manifest.discovery);

    let owners: Vec<(String, ModelElement)> = match (toolchain, tool) {
        (Some(name), _) => {
            let tc = model
                .toolchain_by_name(name)
                .ok_or_else(|| not_found("toolchain", name))?;
            vec![(format!("toolchain {}", tc.name), ModelElement::ToolChain(tc.id))]
        }
        (None, Some(name)) => {
            let tool = model.tool_by_name(name).ok_or_else(|| not_found("tool", name))?;
            vec![(format!("tool {}", tool.name), ModelElement::Tool(tool.id))]
        }
        (None, None) => model
            .toolchains()
            .iter()
            .map(|tc| (format!("toolchain {}", tc.name), ModelElement::ToolChain(tc.id)))
            .collect(),
    };

    let mut rows = Vec::new();
    for (owner, element) in owners {
        for id in resolver.all_profile_ids(element)? {
            rows.push(ProfileRow {
                owner: owner.clone(),
                per_file: per_file_label(&model, &id).to_string(),
                profile: id,
            });
        }
    }

    if rows.is_empty() {
        return Ok("No discovery profiles declared.".to_string());
    }
    Ok(Table::new(rows).to_string())
}

fn per_file_label(model: &BuildModel, id: &str) -> &'static str {
    match model.profile(id) {
        Some(profile) if profile.per_file => "yes",
        Some(_) => "no",
        None => "unregistered",
    }
}
