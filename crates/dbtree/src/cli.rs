use crate::output::{self, PrintingController};
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dbtree_core::{
    EntityFilter, ExpansionPath, GroupingMode, NavigationDelays, NavigationTarget, Navigator,
    ObjectReference, ObjectTarget, PageDescriptor, PageKind, Snapshot, TreeConfig,
    TreeConfigStore, TreeState, build_root_nodes, classify, resolve_expansion_path,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "dbtree")]
#[command(author, version, about = "Group databases and locate objects in a resource tree")]
pub struct Cli {
    /// Config file (defaults to dbtree/config.json in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resource tree for a grouping mode
    Groups {
        /// Snapshot file with `dataSources` and `entities`
        snapshot: PathBuf,

        /// Grouping mode (none, project, dataSource, environment, connectType, cluster, tenant)
        #[arg(short, long)]
        mode: Option<GroupingMode>,

        /// Fuzzy match on database names
        #[arg(short, long)]
        filter: Option<String>,

        /// Only databases in these environments
        #[arg(long = "env")]
        environments: Vec<i64>,

        /// Only databases on these data sources
        #[arg(long = "data-source")]
        data_sources: Vec<i64>,

        #[arg(long)]
        json: bool,
    },

    /// Print the keys to expand to reveal a database, an object, or a page
    Locate {
        /// Snapshot file with `dataSources` and `entities`
        snapshot: PathBuf,

        /// Database id
        #[arg(short, long, required_unless_present = "page")]
        entity: Option<i64>,

        #[arg(short, long)]
        mode: Option<GroupingMode>,

        #[command(flatten)]
        object: ObjectArgs,

        /// Column of the table given with --table
        #[arg(long, requires = "table")]
        column: Option<String>,

        /// Data-source page to position instead of a database
        #[arg(long, value_enum, conflicts_with = "entity")]
        page: Option<PageArg>,

        #[arg(long, requires = "page")]
        data_source: Option<i64>,

        #[arg(long)]
        json: bool,

        /// Replay the expansion step by step with the configured delays
        #[arg(long)]
        follow: bool,
    },
}

#[derive(Args)]
#[group(multiple = false)]
struct ObjectArgs {
    #[arg(long)]
    table: Option<String>,

    #[arg(long)]
    external_table: Option<String>,

    #[arg(long)]
    view: Option<String>,

    #[arg(long)]
    materialized_view: Option<String>,

    #[arg(long)]
    function: Option<String>,

    #[arg(long)]
    procedure: Option<String>,

    #[arg(long)]
    package: Option<String>,

    #[arg(long)]
    trigger: Option<String>,

    #[arg(long = "type")]
    type_name: Option<String>,

    #[arg(long)]
    sequence: Option<String>,

    #[arg(long)]
    synonym: Option<String>,

    #[arg(long)]
    public_synonym: Option<String>,
}

impl ObjectArgs {
    fn into_target(self, column: Option<String>) -> Option<ObjectTarget> {
        if let Some(table) = self.table {
            return Some(match column {
                Some(column) => ObjectTarget::Column { table, column },
                None => ObjectTarget::Table { name: table },
            });
        }

        let target = if let Some(name) = self.external_table {
            ObjectTarget::ExternalTable { name }
        } else if let Some(name) = self.view {
            ObjectTarget::View { name }
        } else if let Some(name) = self.materialized_view {
            ObjectTarget::MaterializedView { name }
        } else if let Some(name) = self.function {
            ObjectTarget::Function { name }
        } else if let Some(name) = self.procedure {
            ObjectTarget::Procedure { name }
        } else if let Some(name) = self.package {
            ObjectTarget::Package { name }
        } else if let Some(name) = self.trigger {
            ObjectTarget::Trigger { name }
        } else if let Some(name) = self.type_name {
            ObjectTarget::Type { name }
        } else if let Some(name) = self.sequence {
            ObjectTarget::Sequence { name }
        } else if let Some(name) = self.synonym {
            ObjectTarget::Synonym {
                name,
                public: false,
            }
        } else if let Some(name) = self.public_synonym {
            ObjectTarget::Synonym { name, public: true }
        } else {
            return None;
        };

        Some(target)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PageArg {
    SessionManagement,
    RecycleBin,
}

impl From<PageArg> for PageKind {
    fn from(page: PageArg) -> Self {
        match page {
            PageArg::SessionManagement => PageKind::SessionManagement,
            PageArg::RecycleBin => PageKind::RecycleBin,
        }
    }
}

pub fn run(cli: Cli) -> i32 {
    match execute(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = load_config(cli.config)?;

    match cli.command {
        Command::Groups {
            snapshot,
            mode,
            filter,
            environments,
            data_sources,
            json,
        } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let mode = mode.unwrap_or(config.grouping_mode);

            let mut entity_filter = EntityFilter::new()
                .with_environments(environments)
                .with_data_sources(data_sources);
            if let Some(query) = filter {
                entity_filter = entity_filter.with_name_query(query);
            }

            let grouped = classify(&snapshot.entities, &snapshot.data_sources, |e| {
                entity_filter.matches(e)
            });
            let nodes = build_root_nodes(&grouped, mode);

            if json {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                output::print_tree(&nodes);
            }
        }

        Command::Locate {
            snapshot,
            entity,
            mode,
            object,
            column,
            page,
            data_source,
            json,
            follow,
        } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let mode = mode.unwrap_or(config.grouping_mode);
            let target = build_target(entity, object, column, page, data_source)?;

            let resolved =
                resolve_expansion_path(&target, mode, &snapshot.entities, &TreeState::new());
            if resolved.is_empty() {
                bail!("nothing to reveal when grouping by {}", mode);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                output::print_path(&resolved);
            }

            if follow {
                replay(resolved, config.navigation)?;
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<TreeConfig> {
    let store = match path {
        Some(path) => TreeConfigStore::from_path(path),
        None => TreeConfigStore::new()?,
    };

    let config = store
        .load()
        .with_context(|| format!("reading {}", store.path().display()))?;
    log::debug!("Loaded config from {}", store.path().display());

    Ok(config)
}

fn build_target(
    entity: Option<i64>,
    object: ObjectArgs,
    column: Option<String>,
    page: Option<PageArg>,
    data_source: Option<i64>,
) -> Result<NavigationTarget> {
    if let Some(page) = page {
        return Ok(NavigationTarget::Page(PageDescriptor {
            kind: page.into(),
            data_source_id: data_source,
        }));
    }

    let Some(entity_id) = entity else {
        bail!("--entity is required unless --page is given");
    };

    Ok(match object.into_target(column) {
        Some(object) => NavigationTarget::Object(ObjectReference { entity_id, object }),
        None => NavigationTarget::Entity { entity_id },
    })
}

/// Drives the navigator against stdout until the path is fully revealed.
fn replay(resolved: ExpansionPath, delays: NavigationDelays) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async move {
        let navigator = Navigator::new(Arc::new(PrintingController), delays);
        navigator.navigate(resolved, HashSet::new());

        while navigator.has_pending() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    });

    Ok(())
}
