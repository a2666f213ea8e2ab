use seodeck_types::{AgentListing, AgentStatus, Catalog, Category, HttpMethod, OperationDescriptor, PanelId};
use serde_json::Map;

/// Build the agents panel catalog from a backend `/agents` listing.
///
/// Each agent becomes one operation posting `{url?}` to
/// `/trigger_agent/{name}`, categorized by its current status. Agents appear
/// in backend execution order when one is reported.
pub fn agents_catalog(listing: &AgentListing) -> Catalog {
    let mut agents: Vec<_> = listing.agents.iter().collect();
    if !listing.execution_order.is_empty() {
        agents.sort_by_key(|agent| {
            listing
                .execution_order
                .iter()
                .position(|name| name == &agent.name)
                .unwrap_or(usize::MAX)
        });
    }

    let operations = agents
        .into_iter()
        .map(|agent| {
            let description = if agent.dependencies.is_empty() {
                format!("Status: {}", agent.status.as_str())
            } else {
                format!("Status: {}; depends on {}", agent.status.as_str(), agent.dependencies.join(", "))
            };
            OperationDescriptor {
                id: agent.name.clone(),
                label: humanize(&agent.name),
                description,
                category: agent.status.as_str().to_string(),
                endpoint: format!("/trigger_agent/{}", agent.name),
                method: HttpMethod::Post,
                input_fields: Vec::new(),
                manual_url: false,
                groups: Vec::new(),
                defaults: Map::new(),
                send_body: true,
            }
        })
        .collect::<Vec<_>>();

    let categories = [AgentStatus::Success, AgentStatus::Failed, AgentStatus::NotRun, AgentStatus::Unknown]
        .into_iter()
        .filter(|status| operations.iter().any(|operation| operation.category == status.as_str()))
        .map(|status| Category {
            id: status.as_str().to_string(),
            label: humanize(status.as_str()),
        })
        .collect();

    Catalog {
        panel: PanelId::Agents,
        title: "Agents".into(),
        description: "Trigger individual agents registered with the backend".into(),
        categories,
        operations,
    }
}

/// `technical_seo_agent` -> `Technical Seo Agent`
fn humanize(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use seodeck_types::AgentSummary;

    use super::*;

    fn agent(name: &str, status: AgentStatus, dependencies: &[&str]) -> AgentSummary {
        AgentSummary {
            name: name.into(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            status,
            last_run: None,
        }
    }

    #[test]
    fn follows_execution_order_and_status_categories() {
        let listing = AgentListing {
            agents: vec![
                agent("off_page_seo_agent", AgentStatus::NotRun, &["on_page_seo_agent"]),
                agent("on_page_seo_agent", AgentStatus::Success, &[]),
            ],
            total_agents: 2,
            execution_order: vec!["on_page_seo_agent".into(), "off_page_seo_agent".into()],
            agents_with_dependencies: 1,
        };

        let catalog = agents_catalog(&listing);

        let ids: Vec<_> = catalog.operations.iter().map(|op| op.id.as_str()).collect();
        assert_eq!(ids, vec!["on_page_seo_agent", "off_page_seo_agent"]);
        assert_eq!(catalog.operations[1].endpoint, "/trigger_agent/off_page_seo_agent");
        assert_eq!(catalog.operations[1].label, "Off Page Seo Agent");
        assert!(catalog.operations[1].description.contains("depends on on_page_seo_agent"));
        let categories: Vec<_> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(categories, vec!["success", "not_run"]);
    }
}
