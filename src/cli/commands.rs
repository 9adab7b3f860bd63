use crate::automation::ExcelHost;
use crate::config::{self, ImportConfig};
use crate::encoding;
use crate::error::{KitError, KitResult};
use crate::import::{self, ImportExecutor, ImportRequest};
use crate::registry::{AddOutcome, FileRegistry, ModuleStatus};
use crate::template;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute the import command: two-phase batch import of VBA modules.
pub fn import(
    files: Vec<PathBuf>,
    workbook: Option<PathBuf>,
    config_path: Option<PathBuf>,
    modules_dir: Option<String>,
    no_backup: bool,
    verbose: bool,
) -> KitResult<()> {
    println!("{}", "📦 vbakit - Batch VBA module import".bold().green());

    let root = std::env::current_dir()?;
    let mut config = load_or_default_config(&root, config_path.as_deref(), verbose)?;

    if let Some(dir) = modules_dir {
        config.modules_dir = dir;
    }

    let workbook = workbook
        .or_else(|| config.workbook_path(&root))
        .ok_or_else(|| {
            KitError::Validation(
                "no workbook specified (use --workbook or a config file)".to_string(),
            )
        })?;
    println!("   Workbook: {}", workbook.display());
    println!();

    // Explicit files win; otherwise fall back to the config's module list.
    let candidates = if files.is_empty() {
        config.resolve_modules(&root)
    } else {
        files
    };

    let mut registry = FileRegistry::new();
    for path in &candidates {
        if path
            .extension()
            .map_or(true, |e| !e.eq_ignore_ascii_case("bas"))
        {
            println!("   {} skipped (not .bas): {}", "⚠️".yellow(), path.display());
            continue;
        }
        match registry.add(path) {
            AddOutcome::Added => {
                if verbose {
                    if let Some(entry) = registry.entries().last() {
                        println!("   + {} ({})", entry.file_name(), entry.encoding);
                    }
                }
            }
            AddOutcome::Duplicate => {
                println!("   {} already added: {}", "⚠️".yellow(), path.display());
            }
        }
    }

    let request = ImportRequest {
        workbook,
        auto_backup: !no_backup && config.auto_backup,
    };

    let host = ExcelHost::new();
    let executor = ImportExecutor::new(&host);
    let outcome = executor.run(&request, &mut registry)?;

    println!();
    for entry in registry.entries() {
        println!(
            "   {} [{}] {}",
            entry.file_name(),
            entry.encoding,
            paint_status(entry.status)
        );
    }
    println!();

    if let Some(backup) = &outcome.backup {
        println!("   Backup: {}", backup.display());
    }

    if outcome.is_success() {
        println!(
            "{}",
            format!("✅ {}/{} modules imported", outcome.succeeded, outcome.total)
                .bold()
                .green()
        );
        Ok(())
    } else {
        println!(
            "{}",
            format!("❌ {}/{} modules imported", outcome.succeeded, outcome.total)
                .bold()
                .red()
        );
        Err(KitError::Import(format!(
            "{}/{} modules imported",
            outcome.succeeded, outcome.total
        )))
    }
}

/// Execute the detect command: report the encoding of each file.
pub fn detect(files: Vec<PathBuf>) -> KitResult<()> {
    println!("{}", "🔍 vbakit - Encoding detection".bold().green());
    println!();

    for path in &files {
        let detected = encoding::detect(path)?;
        println!("   {}: {}", path.display(), detected.to_string().cyan());
    }
    Ok(())
}

/// Execute the convert command: phase 1 on its own, no workbook needed.
pub fn convert(files: Vec<PathBuf>) -> KitResult<()> {
    println!("{}", "🔄 vbakit - Shift-JIS normalization".bold().green());
    println!();

    let mut registry = FileRegistry::new();
    for path in &files {
        registry.add(path);
    }

    import::normalize(&mut registry);

    let mut failures = 0;
    for entry in registry.entries() {
        if entry.status == ModuleStatus::ConversionFailed {
            failures += 1;
        }
        println!(
            "   {} [{}] {}",
            entry.file_name(),
            entry.encoding,
            paint_status(entry.status)
        );
    }

    if failures > 0 {
        Err(KitError::Encoding(format!(
            "{} of {} files failed to convert",
            failures,
            registry.len()
        )))
    } else {
        Ok(())
    }
}

/// Execute the template command: build the clean billing template, or
/// strip formulas from an existing workbook.
pub fn template(
    output: PathBuf,
    from: Option<PathBuf>,
    month: Option<String>,
) -> KitResult<()> {
    println!("{}", "📄 vbakit - Template builder".bold().green());

    match from {
        Some(input) => {
            println!("   Source: {}", input.display());
            let stripped = template::strip_formulas(&input, &output)?;
            println!("   Stripped {} formula cells", stripped);
        }
        None => {
            template::build_template(&output, month.as_deref())?;
        }
    }

    println!("{}", format!("✅ Saved: {}", output.display()).bold().green());
    Ok(())
}

/// Execute the package command: embed a binary as a Base64 JS fragment.
pub fn package(input: PathBuf, output: PathBuf) -> KitResult<()> {
    println!("{}", "📦 vbakit - Base64 packaging".bold().green());

    let stats = template::package(&input, &output)?;

    println!("   Input:  {} ({} bytes)", input.display(), stats.raw_bytes);
    println!(
        "   Output: {} ({} Base64 chars)",
        output.display(),
        stats.encoded_chars
    );
    println!("{}", "✅ Packaging complete".bold().green());
    Ok(())
}

/// Execute the config init command: write the default descriptor.
pub fn config_init(path: Option<PathBuf>) -> KitResult<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(config::DEFAULT_FILE_NAME));
    if path.exists() {
        return Err(KitError::Validation(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    ImportConfig::default().save(&path)?;
    println!(
        "{}",
        format!("✅ Config written: {}", path.display()).bold().green()
    );
    Ok(())
}

/// Execute the config show command: display a descriptor.
pub fn config_show(path: Option<PathBuf>) -> KitResult<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(config::DEFAULT_FILE_NAME));
    let config = ImportConfig::load(&path)?;

    println!("{}", format!("⚙️  {}", path.display()).bold().green());
    println!("   Workbook:    {}", config.workbook);
    println!("   Backup:      {}", config.auto_backup);
    println!("   Modules dir: {}", config.modules_dir);
    println!("   Modules:");
    for module in &config.modules {
        println!("     - {}", module);
    }
    Ok(())
}

fn load_or_default_config(
    root: &Path,
    config_path: Option<&Path>,
    verbose: bool,
) -> KitResult<ImportConfig> {
    if let Some(path) = config_path {
        println!("   Config: {}", path.display());
        return ImportConfig::load(path);
    }

    // Auto-discover the descriptor in the working directory.
    let default_path = root.join(config::DEFAULT_FILE_NAME);
    if default_path.exists() {
        println!("   Config: {}", default_path.display());
        return ImportConfig::load(&default_path);
    }

    if verbose {
        println!("   Config: none (defaults)");
    }
    Ok(ImportConfig::default())
}

fn paint_status(status: ModuleStatus) -> colored::ColoredString {
    let label = status.to_string();
    match status {
        ModuleStatus::Converted | ModuleStatus::NotNeeded | ModuleStatus::ImportSucceeded => {
            label.green()
        }
        ModuleStatus::ConversionFailed | ModuleStatus::ImportFailed => label.red(),
        ModuleStatus::Pending | ModuleStatus::Unconverted => label.yellow(),
    }
}
