use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Track, sync and share the countries you have visited")]
pub struct Args {
    /// Directory holding the local snapshot (env: PASSPORT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory standing in for the remote store (env: PASSPORT_REMOTE_DIR)
    #[arg(long, global = true)]
    pub remote_dir: Option<PathBuf>,

    /// User id for the remote store (env: PASSPORT_USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Quiet period before a remote save, in milliseconds (env: PASSPORT_SYNC_DEBOUNCE_MS)
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    /// Base URL for share links (env: PASSPORT_SHARE_BASE)
    #[arg(long, global = true)]
    pub share_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Resolve every feature of a GeoJSON FeatureCollection to a country id
    Resolve {
        geojson: PathBuf,
    },

    /// Mark countries as visited (names, ids or ISO codes)
    Visit {
        #[arg(required = true)]
        countries: Vec<String>,
    },

    /// Mark countries as not visited
    Unvisit {
        #[arg(required = true)]
        countries: Vec<String>,
    },

    /// Flip the visited flag of each country in turn
    Toggle {
        #[arg(required = true)]
        countries: Vec<String>,
    },

    /// Set a note; no text clears it
    Note {
        country: String,
        text: Vec<String>,
    },

    /// Set a 1-5 star rating; no value clears it
    Rate {
        country: String,
        stars: Option<u8>,
    },

    /// Set the visit date (YYYY-MM-DD); no value clears it
    Date {
        country: String,
        date: Option<String>,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        action: TagCommand,
    },

    /// List tracked countries
    List {
        /// Include countries that carry metadata but are not visited
        #[arg(long)]
        all: bool,
    },

    /// Print a share link for the visited set
    Share {
        /// Country to highlight in the shared view
        #[arg(long)]
        select: Option<String>,

        #[arg(long)]
        utm_source: Option<String>,

        #[arg(long)]
        utm_medium: Option<String>,

        #[arg(long)]
        utm_campaign: Option<String>,
    },

    /// Show what a share link or token contains
    Open {
        link: String,
    },

    /// Reconcile local and remote snapshots and save the result to both
    Sync,

    /// Compute the view a fly-to would commit for a country
    Fly {
        country: String,

        /// GeoJSON FeatureCollection with country geometries
        #[arg(long)]
        geojson: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TagCommand {
    /// Create or update a tag definition
    Define {
        id: String,
        name: String,

        #[arg(long, default_value = "#6366f1")]
        color: String,

        #[arg(long)]
        emoji: Option<String>,
    },

    /// Attach a tag to a country
    Add { country: String, tag: String },

    /// Detach a tag from a country
    Remove { country: String, tag: String },

    /// Delete a tag definition and remove it from every country
    Delete { tag: String },
}
