//! Share CLI commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use super::backup::report_merge;
use super::list::resolve_list;
use super::output::Output;
use crate::domain::{current_timestamp, merge_imported_state};
use crate::share::{
    build_share_payload, build_share_publish_url, build_share_search_url, resolve_imported_list_id,
    should_show_import_success, shared_document, HttpTransport, PublishLink, SearchQuery,
    ShareApiClient, ShareOptions,
};
use crate::storage::{Config, Session};

#[derive(Subcommand)]
pub enum ShareCommands {
    /// Publish a list to the sharing service
    ///
    /// With --link, prints the web app's publish page instead of posting.
    Publish {
        /// List id or name (defaults to the current list)
        #[arg(long, short)]
        list: Option<String>,

        /// Public title (defaults to the list name)
        #[arg(long)]
        title: Option<String>,

        /// Game key
        #[arg(long)]
        game: Option<String>,

        /// Character key
        #[arg(long)]
        character: Option<String>,

        /// Game version label
        #[arg(long = "version-text")]
        version_text: Option<String>,

        /// Public description (defaults to the list description)
        #[arg(long)]
        description: Option<String>,

        /// Id of the shared list this one is derived from
        #[arg(long)]
        parent: Option<String>,

        /// Anti-abuse token required by the service
        #[arg(long, env = "TALLY_TURNSTILE_TOKEN", hide_env_values = true)]
        turnstile_token: Option<String>,

        /// Print the publish page URL instead of posting
        #[arg(long)]
        link: bool,

        /// Where the web app should send the user afterwards
        #[arg(long)]
        return_to: Option<String>,
    },

    /// List games known to the sharing service
    Games,

    /// List characters of a game
    Characters {
        /// Game key
        game: String,
    },

    /// Search shared lists
    Search {
        /// Game key
        #[arg(long, required_unless_present = "link")]
        game: Option<String>,

        /// Character key
        #[arg(long, required_unless_present = "link")]
        character: Option<String>,

        /// Sort order
        #[arg(long)]
        sort: Option<String>,

        /// Only lists derived from this shared list
        #[arg(long)]
        parent: Option<String>,

        /// Print the search page URL instead of querying
        #[arg(long)]
        link: bool,

        /// Where the web app should send the user afterwards
        #[arg(long)]
        return_to: Option<String>,
    },

    /// Import a shared list into the local document
    ///
    /// Accepts a shared list id or the query string the web app returns
    /// (for example `?imported=1&list_id=abc-123`).
    Import {
        /// Shared list id or return query
        source: String,
    },
}

pub fn run(cmd: ShareCommands, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        ShareCommands::Publish {
            list,
            title,
            game,
            character,
            version_text,
            description,
            parent,
            turnstile_token,
            link,
            return_to,
        } => {
            let request = PublishRequest {
                list,
                title,
                game,
                character,
                version_text,
                description,
                parent,
                turnstile_token,
            };
            if link {
                publish_link(config, output, request, return_to.as_deref())
            } else {
                publish(config, output, request)
            }
        }
        ShareCommands::Games => games(config, output),
        ShareCommands::Characters { game } => characters(config, output, &game),
        ShareCommands::Search {
            game,
            character,
            sort,
            parent,
            link,
            return_to,
        } => {
            if link {
                let url = build_share_search_url(&config.share_app_base_url(), return_to.as_deref());
                print_url(output, &url);
                Ok(())
            } else {
                let query = SearchQuery {
                    game_key: game.unwrap_or_default(),
                    character_key: character.unwrap_or_default(),
                    sort,
                    parent_id: parent,
                };
                search(config, output, &query)
            }
        }
        ShareCommands::Import { source } => import(config, output, &source),
    }
}

struct PublishRequest {
    list: Option<String>,
    title: Option<String>,
    game: Option<String>,
    character: Option<String>,
    version_text: Option<String>,
    description: Option<String>,
    parent: Option<String>,
    turnstile_token: Option<String>,
}

fn client(config: &Config) -> ShareApiClient<HttpTransport> {
    ShareApiClient::http(&config.share_api_base_url())
}

fn print_url(output: &Output, url: &str) {
    if output.is_json() {
        output.data(&serde_json::json!({ "url": url }));
    } else {
        println!("{}", url);
    }
}

fn publish(config: &Config, output: &Output, request: PublishRequest) -> Result<()> {
    let session = Session::from_config(config)?;
    let doc = session.document();
    let list_id = resolve_list(doc, request.list.as_deref())?;
    let Some(list) = doc.list(&list_id) else {
        bail!("List not found: {}", list_id);
    };

    let (Some(game_key), Some(character_key)) = (request.game, request.character) else {
        bail!("--game and --character are required to publish");
    };
    let Some(turnstile_token) = request.turnstile_token else {
        bail!("A turnstile token is required to publish (use --turnstile-token or --link)");
    };

    let options = ShareOptions {
        list_id: list_id.clone(),
        title: request.title.unwrap_or_else(|| list.name.clone()),
        game_key,
        character_key,
        version_text: request.version_text,
        description: request.description.or_else(|| Some(list.description.clone())),
        turnstile_token,
        parent_id: request.parent,
    };
    let payload = build_share_payload(doc, &options)?;

    let created = client(config)
        .create_list(&payload)
        .context("Failed to publish list")?;

    if output.is_json() {
        output.data(&created);
    } else {
        output.success(&format!("Published {}: {}", created.id, created.share_url));
    }
    Ok(())
}

fn publish_link(
    config: &Config,
    output: &Output,
    request: PublishRequest,
    return_to: Option<&str>,
) -> Result<()> {
    let session = Session::from_config(config)?;
    let doc = session.document();
    let list_id = resolve_list(doc, request.list.as_deref())?;
    let Some(list) = doc.list(&list_id) else {
        bail!("List not found: {}", list_id);
    };

    let title = request.title.unwrap_or_else(|| list.name.clone());
    let description = request.description.unwrap_or_else(|| list.description.clone());
    let Some(shared) = shared_document(doc, &list_id, &title, current_timestamp()) else {
        bail!("List not found: {}", list_id);
    };
    let payload_json = serde_json::to_string(&shared)?;

    let app_base_url = config.share_app_base_url();
    let url = build_share_publish_url(&PublishLink {
        app_base_url: &app_base_url,
        title: &title,
        payload_json: &payload_json,
        description: Some(&description),
        return_to,
    });
    print_url(output, &url);
    Ok(())
}

fn games(config: &Config, output: &Output) -> Result<()> {
    let games = client(config).list_games().context("Failed to load games")?;

    if output.is_json() {
        output.data(&games);
    } else if games.is_empty() {
        println!("No games");
    } else {
        println!("{:<16} NAME", "KEY");
        println!("{}", "-".repeat(40));
        for game in &games {
            println!("{:<16} {}", game.game_key, game.game_name);
        }
    }
    Ok(())
}

fn characters(config: &Config, output: &Output, game_key: &str) -> Result<()> {
    let characters = client(config)
        .list_characters(game_key)
        .context("Failed to load characters")?;

    if output.is_json() {
        output.data(&characters);
    } else if characters.is_empty() {
        println!("No characters for {}", game_key);
    } else {
        println!("{:<16} NAME", "KEY");
        println!("{}", "-".repeat(40));
        for character in &characters {
            println!("{:<16} {}", character.character_key, character.character_name);
        }
    }
    Ok(())
}

fn search(config: &Config, output: &Output, query: &SearchQuery) -> Result<()> {
    let lists = client(config)
        .search_lists(query)
        .context("Failed to search shared lists")?;

    if output.is_json() {
        output.data(&lists);
    } else if lists.is_empty() {
        println!("No shared lists found");
    } else {
        println!("{:<38} {:>7}  TITLE", "ID", "IMPORTS");
        println!("{}", "-".repeat(70));
        for list in &lists {
            println!("{:<38} {:>7}  {}", list.id, list.imports_count, list.title);
        }
    }
    Ok(())
}

/// Shared list id from a bare id or a web app return query
fn import_target(source: &str) -> Result<(String, bool)> {
    let source = source.trim();
    if source.starts_with('?') || source.contains('=') {
        let already_counted = should_show_import_success(source);
        return match resolve_imported_list_id(source) {
            Some(id) => Ok((id, already_counted)),
            None => bail!("No shared list id in query: {}", source),
        };
    }
    if source.is_empty() {
        bail!("Shared list id must not be empty");
    }
    Ok((source.to_string(), false))
}

fn import(config: &Config, output: &Output, source: &str) -> Result<()> {
    let (id, already_counted) = import_target(source)?;
    let client = client(config);

    let shared = client
        .get_list(&id)
        .with_context(|| format!("Failed to fetch shared list {}", id))?;
    let imported = shared
        .document()
        .with_context(|| format!("Shared list {} is not a valid backup", id))?;

    let mut session = Session::from_config(config)?;
    let merged = merge_imported_state(session.document(), &imported);
    session.replace(merged.document.clone())?;
    report_merge(output, &merged);

    if !already_counted {
        if let Err(e) = client.mark_imported(&id) {
            log::warn!("Could not record import of {}: {}", id, e);
        }
    }
    Ok(())
}
