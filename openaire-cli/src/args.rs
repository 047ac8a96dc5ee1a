//! Command-line arguments.

use std::fmt;

use clap::Parser;
use clap::ValueEnum;

#[derive(Parser, Debug)]
#[command(name = "openaire")]
#[command(about = "Search the OpenAIRE Graph from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// OpenAIRE API key
    #[arg(short = 'k', long, env = "OPENAIRE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Custom base URL for the Graph API
    #[arg(short = 'u', long, env = "OPENAIRE_BASE_URL")]
    pub base_url: Option<String>,

    /// Entity type to search
    #[arg(short = 'e', long, default_value = "researchProducts", ignore_case = true)]
    pub entity: Entity,

    /// Output format
    #[arg(short = 'f', long = "output-format", default_value = "json", ignore_case = true)]
    pub format: OutputFormat,

    /// General search query string
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Filter by title (legal name for organizations, official name for data sources)
    #[arg(long)]
    pub title: Option<String>,

    /// Filter research products by author full name or ORCID
    #[arg(long)]
    pub author: Option<String>,

    /// Filter by persistent identifier (DOI, ROR, grant code for projects)
    #[arg(long)]
    pub pid: Option<String>,

    /// Filter projects by funder short name
    #[arg(long)]
    pub funder: Option<String>,

    /// Filter research products or organizations by country code
    #[arg(long)]
    pub country: Option<String>,

    /// Sort criterion, e.g. 'popularity DESC' or 'startDate ASC'
    #[arg(long)]
    pub sort: Option<String>,

    /// Number of results per page (1-100)
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Maximum total results to print
    #[arg(long, default_value_t = 100)]
    pub max_results: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Entity-specific flags that were given but do not apply to `--entity`.
    pub fn ignored_flags(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.author.is_some() && self.entity != Entity::ResearchProducts {
            ignored.push("--author");
        }
        if self.country.is_some()
            && !matches!(self.entity, Entity::ResearchProducts | Entity::Organizations)
        {
            ignored.push("--country");
        }
        if self.funder.is_some() && self.entity != Entity::Projects {
            ignored.push("--funder");
        }
        ignored
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    #[value(name = "researchProducts")]
    ResearchProducts,
    #[value(name = "organizations")]
    Organizations,
    #[value(name = "dataSources")]
    DataSources,
    #[value(name = "projects")]
    Projects,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::ResearchProducts => write!(f, "researchProducts"),
            Entity::Organizations => write!(f, "organizations"),
            Entity::DataSources => write!(f, "dataSources"),
            Entity::Projects => write!(f, "projects"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Jsonl,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// A parsed `--sort` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub field: String,
    pub ascending: bool,
    /// Whether the direction was given explicitly.
    pub explicit: bool,
}

impl SortArg {
    /// Parses `"field"` or `"field ASC|DESC"`. Anything other than `ASC`
    /// sorts descending.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let field = parts.next()?.to_string();
        match (parts.next(), parts.next()) {
            (Some(direction), None) => Some(Self {
                field,
                ascending: direction.eq_ignore_ascii_case("ASC"),
                explicit: true,
            }),
            _ => Some(Self {
                field,
                ascending: false,
                explicit: false,
            }),
        }
    }
}
