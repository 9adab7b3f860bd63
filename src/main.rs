use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vbakit::cli;
use vbakit::error::KitResult;

#[derive(Parser)]
#[command(name = "vbakit")]
#[command(about = "Excel billing workflow toolkit: batch VBA import and template packaging.")]
#[command(long_about = "vbakit - Excel billing workflow toolkit

COMMANDS:
  import    - Batch-import .bas modules into an .xlsm workbook (Windows)
  detect    - Report the text encoding of module files
  convert   - Normalize module files from UTF-8 to Shift-JIS
  template  - Build the clean billing template, or strip formulas
  package   - Embed a binary file as a Base64 JS fragment
  config    - Manage the JSON import descriptor

EXAMPLES:
  vbakit import modules/*.bas --workbook billing.xlsm
  vbakit import --config vba_import_config.json
  vbakit convert modules/ExcelDocumentModule.bas
  vbakit template template-clean.xlsx
  vbakit package template-clean.xlsx template-data.js")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Batch-import VBA modules into an Excel workbook.

Two phases per run:
  1. Encoding normalization - UTF-8 module files are rewritten as
     Shift-JIS so the VBA editor reads them correctly. Files with an
     unknown encoding are imported as-is.
  2. Import via Excel COM automation - each module replaces any existing
     module of the same name, then the workbook is saved. One failing
     module does not abort its siblings.

A timestamped backup of the workbook is created first unless disabled.
The exit status is non-zero unless every module imported.

CONFIG:
  Without --config, vba_import_config.json in the working directory is
  loaded when present. Explicit FILES override the config module list;
  --workbook overrides the config workbook.

NOTE: The import phase needs Excel on Windows, with 'Trust access to
the VBA project object model' enabled.")]
    /// Batch-import VBA modules into an Excel workbook
    Import {
        /// Module files (.bas); defaults to the config module list
        files: Vec<PathBuf>,

        /// Target .xlsm workbook
        #[arg(short, long)]
        workbook: Option<PathBuf>,

        /// JSON import descriptor
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the config's module files
        #[arg(long)]
        modules_dir: Option<String>,

        /// Skip the timestamped workbook backup
        #[arg(long)]
        no_backup: bool,

        /// Show verbose progress
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report the detected text encoding of each file
    Detect {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    #[command(long_about = "Normalize module files from UTF-8 to Shift-JIS.

Runs the encoding phase of an import on its own. UTF-8 files are
rewritten in place (unmappable characters become '?'); files already in
Shift-JIS are left untouched; files with an unknown encoding are
reported but not modified.")]
    /// Normalize module files from UTF-8 to Shift-JIS
    Convert {
        /// Files to convert in place
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    #[command(long_about = "Build the clean billing template workbook.

Without --from, a minimal header-only template is created: title row,
billing month and pharmacy fields, and an empty table region for the
downstream generator.

With --from, the given workbook is loaded and every formula cell in the
table data region (rows 6-1000, columns A-T) is blanked, producing a
clean template from an existing file.")]
    /// Build the clean billing template workbook
    Template {
        /// Output .xlsx path
        output: PathBuf,

        /// Existing workbook to strip formulas from
        #[arg(long)]
        from: Option<PathBuf>,

        /// Billing month label for B3 (default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    #[command(long_about = "Embed a binary file as a Base64 string in a JS fragment.

The fragment defines TEMPLATE_BASE64 and exposes it to both browser
(window) and Node.js (module.exports) consumers, for distribution of
the template inside a script file.")]
    /// Embed a binary file as a Base64 JS fragment
    Package {
        /// Binary input file (typically the .xlsx template)
        input: PathBuf,

        /// Output JavaScript file
        output: PathBuf,
    },

    /// Manage the JSON import descriptor
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default descriptor
    Init {
        /// Destination (default: vba_import_config.json)
        path: Option<PathBuf>,
    },

    /// Display a descriptor
    Show {
        /// Descriptor path (default: vba_import_config.json)
        path: Option<PathBuf>,
    },
}

fn main() -> KitResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            files,
            workbook,
            config,
            modules_dir,
            no_backup,
            verbose,
        } => cli::import(files, workbook, config, modules_dir, no_backup, verbose),

        Commands::Detect { files } => cli::detect(files),

        Commands::Convert { files } => cli::convert(files),

        Commands::Template {
            output,
            from,
            month,
        } => cli::template(output, from, month),

        Commands::Package { input, output } => cli::package(input, output),

        Commands::Config { action } => match action {
            ConfigAction::Init { path } => cli::config_init(path),
            ConfigAction::Show { path } => cli::config_show(path),
        },
    }
}
