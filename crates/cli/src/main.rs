use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rackdiff::commands::{
    compare_command, diff_json_command, list_servers_command, show_component_command,
    show_server_command, validate_command, GlobalOptions, RowExpansion,
};
use rackdiff::init_logging;
use rackdiff_core::diff::{DiffMode, ViewMode};

/// Server inventory comparison CLI.
///
/// This CLI is a thin wrapper around `rackdiff-core` (exposed in code as
/// `rackdiff_core`). It owns per-invocation view state such as expanded rows
/// and output modes; all comparison logic lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "rackdiff",
    version,
    about = "Compare server component inventories",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Config file. Defaults to rackdiff.json/.yaml/.yml in the current directory.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Inventory file (.json, .yaml or .yml). Overrides the config.
    #[arg(long, global = true)]
    inventory: Option<String>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List servers in the inventory.
    ListServers {
        /// Case-insensitive name fragment.
        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show one server: component table, then the document view.
    ShowServer {
        #[arg(long)]
        server: String,

        /// Document view mode (interactive or text). Defaults to the config.
        #[arg(long)]
        view: Option<ViewMode>,

        /// Expand a node of the document tree, e.g. /components/0. Repeatable.
        #[arg(long)]
        expand: Vec<String>,

        /// Expand every node of the document tree.
        #[arg(long)]
        expand_all: bool,
    },

    /// Show one component with its dependencies and file contents.
    ShowComponent {
        #[arg(long)]
        server: String,

        #[arg(long)]
        component: String,

        /// Directory holding file contents. Defaults to the config, then to
        /// placeholder content.
        #[arg(long)]
        files_dir: Option<String>,

        /// File content view mode (interactive or text).
        #[arg(long)]
        view: Option<ViewMode>,
    },

    /// Compare the shared components of two servers.
    ///
    /// Prints one row per shared component. Expanded rows also show the field
    /// and dependency diff.
    Compare {
        #[arg(long)]
        left: String,

        #[arg(long)]
        right: String,

        /// Case-insensitive component name fragment.
        #[arg(long)]
        filter: Option<String>,

        /// Expand the row of this component. Repeatable.
        #[arg(long)]
        expand: Vec<String>,

        /// Expand every row.
        #[arg(long)]
        expand_all: bool,

        /// Emit a JSON report with a diff for every shared component.
        #[arg(long)]
        json: bool,
    },

    /// Line diff of the two servers' full JSON documents.
    DiffJson {
        #[arg(long)]
        left: String,

        #[arg(long)]
        right: String,

        /// split or unified. Defaults to the config.
        #[arg(long)]
        mode: Option<DiffMode>,

        /// Report changed paths instead of changed lines.
        #[arg(long)]
        structural: bool,
    },

    /// Report duplicate names in the inventory.
    Validate {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let options = GlobalOptions { config: cli.global.config, inventory: cli.global.inventory };

    match cli.command {
        Command::ListServers { filter, json } => {
            list_servers_command(&options, filter.as_deref(), json)?
        }
        Command::ShowServer { server, view, expand, expand_all } => {
            show_server_command(&options, &server, view, &expand, expand_all)?
        }
        Command::ShowComponent { server, component, files_dir, view } => {
            show_component_command(&options, &server, &component, files_dir.as_deref(), view)?
        }
        Command::Compare { left, right, filter, expand, expand_all, json } => {
            let expansion = RowExpansion { names: expand, all: expand_all };
            compare_command(&options, &left, &right, filter.as_deref(), &expansion, json)?
        }
        Command::DiffJson { left, right, mode, structural } => {
            diff_json_command(&options, &left, &right, mode, structural)?
        }
        Command::Validate { json } => validate_command(&options, json)?,
    }

    Ok(())
}
