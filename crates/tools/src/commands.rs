//! Command handlers. Each one works on an already loaded [`Session`]; saving
//! is left to the sync worker listening on the session's change channel.

use std::fs;
use std::path::Path;

use catalog::CountryCatalog;
use formats::FeatureCollection;
use identity::{GeometryIndex, IdentityResolver};
use share::{ShareableState, Utm, decode, encode, share_link, token_from_link};
use tracing::info;
use viewport::ViewTransform;
use visits::{Action, NaiveDate, Rating, Session, TagDefinition, VisitRecord};

use crate::cli::{Command, TagCommand};
use crate::config::Config;
use crate::error::CliError;

/// What a command produced: lines for stdout, and whether the caller should
/// push the whole session to storage even if nothing changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub push_sync: bool,
}

impl Outcome {
    fn lines(lines: Vec<String>) -> Self {
        Outcome {
            lines,
            push_sync: false,
        }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

pub fn run_command(
    command: &Command,
    session: &mut Session,
    config: &Config,
) -> Result<Outcome, CliError> {
    let catalog = CountryCatalog::global();
    match command {
        Command::Resolve { geojson } => cmd_resolve(geojson),
        Command::Visit { countries } => cmd_mark(session, catalog, countries, Some(true)),
        Command::Unvisit { countries } => cmd_mark(session, catalog, countries, Some(false)),
        Command::Toggle { countries } => cmd_mark(session, catalog, countries, None),
        Command::Note { country, text } => {
            let id = country_id(catalog, country)?;
            let note = Some(text.join(" "));
            session.dispatch(Action::SetNote {
                id: id.clone(),
                note,
            });
            Ok(Outcome::line(describe(session, catalog, &id)))
        }
        Command::Rate { country, stars } => {
            let id = country_id(catalog, country)?;
            let rating = match stars {
                Some(s) => Some(Rating::new(*s).ok_or(CliError::InvalidRating(*s))?),
                None => None,
            };
            session.dispatch(Action::SetRating {
                id: id.clone(),
                rating,
            });
            Ok(Outcome::line(describe(session, catalog, &id)))
        }
        Command::Date { country, date } => {
            let id = country_id(catalog, country)?;
            let date = match date {
                Some(raw) => Some(
                    raw.trim()
                        .parse::<NaiveDate>()
                        .map_err(|_| CliError::InvalidDate(raw.clone()))?,
                ),
                None => None,
            };
            session.dispatch(Action::SetVisitedAt {
                id: id.clone(),
                date,
            });
            Ok(Outcome::line(describe(session, catalog, &id)))
        }
        Command::Tag { action } => cmd_tag(session, catalog, action),
        Command::List { all } => Ok(cmd_list(session, catalog, *all)),
        Command::Share {
            select,
            utm_source,
            utm_medium,
            utm_campaign,
        } => {
            let mut state = ShareableState::from_session_in(session, catalog);
            if let Some(sel) = select {
                state.s = Some(country_id(catalog, sel)?);
            }
            let utm = Utm {
                source: utm_source.clone(),
                medium: utm_medium.clone(),
                campaign: utm_campaign.clone(),
            };
            let token = encode(&state);
            Ok(Outcome::line(share_link(
                &config.share_base,
                &token,
                Some(&utm),
            )))
        }
        Command::Open { link } => cmd_open(catalog, link),
        Command::Sync => Ok(Outcome {
            lines: vec![format!(
                "synced {} countries, {} tags",
                session.visits().len(),
                session.tags().len()
            )],
            push_sync: true,
        }),
        Command::Fly { country, geojson } => {
            let id = catalog
                .lookup(country)
                .map(|e| e.id.clone())
                .unwrap_or_else(|| country.trim().to_string());
            let collection = read_collection(geojson)?;
            let mut resolver = IdentityResolver::new(catalog);
            let index = GeometryIndex::build(&mut resolver, &collection);
            let mut view = ViewTransform::new();
            let center = view
                .fly_to_country(&id, &index)
                .ok_or_else(|| CliError::NoGeometry(id.clone()))?;
            Ok(Outcome::line(format!(
                "{id}: zoom {} center ({:.3}, {:.3})",
                view.zoom(),
                center.lon,
                center.lat
            )))
        }
    }
}

fn country_id(catalog: &CountryCatalog, input: &str) -> Result<String, CliError> {
    catalog
        .lookup(input)
        .map(|entry| entry.id.clone())
        .ok_or_else(|| CliError::UnknownCountry(input.to_string()))
}

fn country_ids(catalog: &CountryCatalog, inputs: &[String]) -> Result<Vec<String>, CliError> {
    inputs.iter().map(|c| country_id(catalog, c)).collect()
}

fn cmd_resolve(path: &Path) -> Result<Outcome, CliError> {
    let collection = read_collection(path)?;
    let mut resolver = IdentityResolver::builtin();
    let resolved = resolver.resolve_collection(&collection);
    let catalog_hits = resolved.iter().filter(|r| r.source.is_catalog()).count();
    info!(
        features = resolved.len(),
        catalog = catalog_hits,
        "resolved feature collection"
    );
    let lines = resolved
        .into_iter()
        .enumerate()
        .map(|(i, r)| format!("{i}\t{}\t{:?}\t{}", r.id, r.source, r.display_name))
        .collect();
    Ok(Outcome::lines(lines))
}

fn cmd_mark(
    session: &mut Session,
    catalog: &CountryCatalog,
    countries: &[String],
    visited: Option<bool>,
) -> Result<Outcome, CliError> {
    let ids = country_ids(catalog, countries)?;
    let action = match visited {
        Some(visited) => Action::MarkMany {
            ids: ids.clone(),
            visited,
        },
        None => Action::ToggleMany(ids.clone()),
    };
    session.dispatch(action);
    let mut lines: Vec<String> = ids.iter().map(|id| describe(session, catalog, id)).collect();
    lines.push(summary(session, catalog));
    Ok(Outcome::lines(lines))
}

fn cmd_tag(
    session: &mut Session,
    catalog: &CountryCatalog,
    action: &TagCommand,
) -> Result<Outcome, CliError> {
    match action {
        TagCommand::Define {
            id,
            name,
            color,
            emoji,
        } => {
            let mut def = TagDefinition::new(id.clone(), name.clone(), color.clone());
            if let Some(e) = emoji {
                def = def.with_emoji(e.clone());
            }
            let changed = session.dispatch(Action::DefineTag(def));
            Ok(Outcome::line(if changed {
                format!("tag {id} saved")
            } else {
                format!("tag {id} unchanged")
            }))
        }
        TagCommand::Add { country, tag } => {
            if !session.tags().contains(tag) {
                return Err(CliError::UnknownTag(tag.clone()));
            }
            let id = country_id(catalog, country)?;
            session.dispatch(Action::AddTag {
                id: id.clone(),
                tag: tag.clone(),
            });
            Ok(Outcome::line(describe(session, catalog, &id)))
        }
        TagCommand::Remove { country, tag } => {
            let id = country_id(catalog, country)?;
            session.dispatch(Action::RemoveTag {
                id: id.clone(),
                tag: tag.clone(),
            });
            Ok(Outcome::line(describe(session, catalog, &id)))
        }
        TagCommand::Delete { tag } => {
            if !session.delete_tag(tag.clone()) {
                return Err(CliError::UnknownTag(tag.clone()));
            }
            Ok(Outcome::line(format!("tag {tag} deleted")))
        }
    }
}

fn cmd_list(session: &Session, catalog: &CountryCatalog, all: bool) -> Outcome {
    let mut lines: Vec<String> = session
        .visits()
        .catalog_view(catalog)
        .filter(|r| all || r.visited)
        .map(|r| format_record(session, catalog, r))
        .collect();
    lines.push(summary(session, catalog));
    Outcome::lines(lines)
}

fn cmd_open(catalog: &CountryCatalog, link: &str) -> Result<Outcome, CliError> {
    let token = token_from_link(link).ok_or(share::DecodeError::Empty)?;
    let state = decode(token)?;
    let preview = state.preview_session();

    let mut lines = vec![format!("{} countries visited", state.v.len())];
    lines.extend(state.v.iter().map(|id| {
        let name = catalog.get(id).map_or(id.as_str(), |e| e.name.as_str());
        format!("  {id}\t{name}")
    }));
    if let Some(sel) = preview.selected() {
        lines.push(format!("selected: {sel}"));
    }
    if let Some(color) = preview.settings().custom_visited_color() {
        lines.push(format!("color: {color}"));
    }
    Ok(Outcome::lines(lines))
}

fn read_collection(path: &Path) -> Result<FeatureCollection, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FeatureCollection::from_geojson_str(&raw)?)
}

fn describe(session: &Session, catalog: &CountryCatalog, id: &str) -> String {
    match session.visits().get(id) {
        Some(rec) => format_record(session, catalog, rec),
        None => format!("{id}\t{}\t-", display_name(catalog, id)),
    }
}

fn format_record(session: &Session, catalog: &CountryCatalog, rec: &VisitRecord) -> String {
    let mut out = format!(
        "{}\t{}\t{}",
        rec.id,
        display_name(catalog, &rec.id),
        if rec.visited { "visited" } else { "-" }
    );
    if let Some(r) = rec.rating {
        out.push_str(&format!("\t{}", "*".repeat(usize::from(r.get()))));
    }
    if let Some(d) = rec.visited_at {
        out.push_str(&format!("\t{d}"));
    }
    if !rec.tags.is_empty() {
        let tags: Vec<String> = rec
            .tags
            .iter()
            .map(|t| match session.tags().get(t).and_then(|d| d.emoji.as_deref()) {
                Some(emoji) => format!("{emoji}{t}"),
                None => t.clone(),
            })
            .collect();
        out.push_str(&format!("\t[{}]", tags.join(", ")));
    }
    if let Some(note) = &rec.note {
        out.push_str(&format!("\t{note}"));
    }
    out
}

fn display_name<'a>(catalog: &'a CountryCatalog, id: &'a str) -> &'a str {
    catalog.get(id).map_or(id, |e| e.name.as_str())
}

fn summary(session: &Session, catalog: &CountryCatalog) -> String {
    let visited = session
        .visits()
        .catalog_view(catalog)
        .filter(|r| r.visited)
        .count();
    format!("{visited}/{} countries visited", catalog.len())
}
