//! Links into the sharing web app and parsing of its return query

use url::form_urlencoded;

fn trim_trailing_slash(base: &str) -> &str {
    base.strip_suffix('/').unwrap_or(base)
}

/// Parameters of the publish page link
#[derive(Debug, Clone, Default)]
pub struct PublishLink<'a> {
    pub app_base_url: &'a str,
    pub title: &'a str,
    pub payload_json: &'a str,
    pub description: Option<&'a str>,
    pub return_to: Option<&'a str>,
}

/// `{app}/ui/publish?title=…&payload_json=…[&description=…][&return_to=…]`
pub fn build_share_publish_url(link: &PublishLink<'_>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("title", link.title);
    query.append_pair("payload_json", link.payload_json);
    if let Some(description) = link.description.filter(|d| !d.trim().is_empty()) {
        query.append_pair("description", description);
    }
    if let Some(return_to) = link.return_to {
        query.append_pair("return_to", return_to);
    }

    format!(
        "{}/ui/publish?{}",
        trim_trailing_slash(link.app_base_url),
        query.finish()
    )
}

/// `{app}/ui/search[?return_to=…]`
pub fn build_share_search_url(app_base_url: &str, return_to: Option<&str>) -> String {
    let base = format!("{}/ui/search", trim_trailing_slash(app_base_url));
    match return_to {
        Some(return_to) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("return_to", return_to)
                .finish();
            format!("{}?{}", base, query)
        }
        None => base,
    }
}

fn query_pairs(query: &str) -> form_urlencoded::Parse<'_> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
}

/// True when the web app reports a completed import (`imported=1`)
pub fn should_show_import_success(query: &str) -> bool {
    query_pairs(query).any(|(key, value)| key == "imported" && value == "1")
}

/// Shared list id carried back by the web app, if any
pub fn resolve_imported_list_id(query: &str) -> Option<String> {
    const KEYS: [&str; 3] = ["list_id", "listId", "share_list_id"];

    let pairs: Vec<(String, String)> = query_pairs(query).into_owned().collect();
    KEYS.iter().find_map(|wanted| {
        pairs
            .iter()
            .filter(|(key, _)| key == wanted)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    })
}
