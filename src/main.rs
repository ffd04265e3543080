use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use std::path::PathBuf;
use table_view::config::config::Config;
use table_view::config::preferences::{PreferenceStore, Theme};
use table_view::data::data_exporter::DataExporter;
use table_view::utils::logging;
use table_view::{source, SortDirection, SortSpec};
use tracing::warn;

mod table_display;

use table_display::display_view;

/// What `--theme` asks for
#[derive(Debug, Clone, Copy, PartialEq)]
enum ThemeChoice {
    Set(Theme),
    Toggle,
}

#[derive(Debug, Default)]
struct CliArgs {
    location: Option<String>,
    filter: Option<String>,
    sort: Option<SortSpec>,
    page: Option<usize>,
    page_size: Option<usize>,
    hidden: Vec<String>,
    export: Option<PathBuf>,
    export_json: bool,
    theme: Option<ThemeChoice>,
    debug: bool,
    help: bool,
    generate_config: bool,
}

fn print_help() {
    println!("{}", "table-view - filter, sort and page JSON tables".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  table-view [OPTIONS] <FILE.json|URL>");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}       - Global search text", "--filter TEXT".green());
    println!("  {} - Sort by a column (default asc)", "--sort COL[:asc|desc]".green());
    println!("  {}            - Page to show, starting at 1", "--page N".green());
    println!("  {}       - Rows per page", "--page-size N".green());
    println!("  {}          - Hide a column (repeatable)", "--hide COL".green());
    println!("  {}       - Export all matching rows", "--export FILE".green());
    println!("  {}              - Export as JSON instead of CSV", "--json".green());
    println!("  {} - Set or toggle the saved theme", "--theme dark|light|toggle".green());
    println!("  {}   - Print a commented config file", "--generate-config".green());
    println!("  {}             - Print recent log lines", "--debug".green());
    println!("  {}              - Show this help", "--help".green());
    println!();
}

fn parse_sort(value: &str) -> Result<SortSpec> {
    let (column, direction) = match value.rsplit_once(':') {
        Some((column, dir)) => {
            let direction = match dir.to_ascii_lowercase().as_str() {
                "asc" | "ascending" => SortDirection::Ascending,
                "desc" | "descending" => SortDirection::Descending,
                other => bail!("Unknown sort direction '{}'", other),
            };
            (column, direction)
        }
        None => (value, SortDirection::Ascending),
    };
    Ok(SortSpec::new(column, direction))
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs> {
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{} needs a value", name))
        };

        match arg.as_str() {
            "--filter" => cli.filter = Some(value("--filter")?),
            "--sort" => cli.sort = Some(parse_sort(&value("--sort")?)?),
            "--page" => {
                let page: usize = value("--page")?.parse().context("--page must be a number")?;
                cli.page = Some(page.saturating_sub(1));
            }
            "--page-size" => {
                cli.page_size = Some(
                    value("--page-size")?
                        .parse()
                        .context("--page-size must be a number")?,
                )
            }
            "--hide" => cli.hidden.push(value("--hide")?),
            "--export" => cli.export = Some(PathBuf::from(value("--export")?)),
            "--json" => cli.export_json = true,
            "--theme" => {
                let choice = value("--theme")?;
                cli.theme = Some(if choice.eq_ignore_ascii_case("toggle") {
                    ThemeChoice::Toggle
                } else {
                    ThemeChoice::Set(choice.parse()?)
                });
            }
            "--debug" => cli.debug = true,
            "--generate-config" => cli.generate_config = true,
            "-h" | "--help" => cli.help = true,
            other if other.starts_with("--") => bail!("Unknown option '{}'", other),
            _ => cli.location = Some(arg.clone()),
        }
    }

    Ok(cli)
}

fn resolve_theme(choice: Option<ThemeChoice>) -> Theme {
    let store = match PreferenceStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            warn!(target: "preferences", "Preferences unavailable: {}", e);
            return match choice {
                Some(ThemeChoice::Set(theme)) => theme,
                _ => Theme::default(),
            };
        }
    };

    let result = match choice {
        Some(ThemeChoice::Set(theme)) => store.set_theme(theme).map(|_| theme),
        Some(ThemeChoice::Toggle) => store.toggle_theme(),
        None => Ok(store.theme()),
    };
    result.unwrap_or_else(|e| {
        warn!(target: "preferences", "Could not save theme: {}", e);
        store.theme()
    })
}

fn run(cli: CliArgs) -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!(target: "config", "Using default config: {:#}", e);
        Config::default()
    });
    let theme = resolve_theme(cli.theme);

    let location = cli
        .location
        .ok_or_else(|| anyhow!("No data source given (see --help)"))?;
    let values = source::load(&location)?;
    let mut view = source::records_to_view(&values)?
        .with_page_size(config.view.default_page_size);

    for id in view.registry().ids() {
        view.set_column_width(&id, config.view.default_column_width)?;
    }
    for id in &cli.hidden {
        view.set_column_visible(id, false)?;
    }
    if let Some(filter) = cli.filter {
        view.set_filter(filter);
    }
    view.set_sort(cli.sort)?;
    if let Some(size) = cli.page_size {
        if !config.view.page_size_options.contains(&size) {
            warn!(target: "config", "Page size {} is not one of the configured options", size);
        }
        view.set_page_size(size)?;
    }
    if let Some(page) = cli.page {
        view.set_page_index(page);
    }

    let computed = view.compute()?;
    display_view(&computed, &config, theme);

    if let Some(path) = cli.export {
        let path = if path.is_dir() {
            let extension = if cli.export_json { "json" } else { "csv" };
            let name = if config.export.timestamp_filenames {
                DataExporter::timestamped_filename(&config.export.file_prefix, extension)
            } else {
                format!("{}.{}", config.export.file_prefix, extension)
            };
            path.join(name)
        } else {
            path
        };

        let grid = view.export()?;
        let message = if cli.export_json {
            DataExporter::export_to_json(&grid, &path)?
        } else {
            DataExporter::export_to_csv(&grid, &path)?
        };
        println!("{}", message.green());
    }

    Ok(())
}

fn main() {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            print_help();
            std::process::exit(2);
        }
    };

    let log_buffer = logging::init_tracing(if cli.debug { "debug" } else { "warn" });

    if cli.help {
        print_help();
        return;
    }
    if cli.generate_config {
        print!("{}", Config::create_default_with_comments());
        return;
    }

    let debug = cli.debug;
    let outcome = run(cli);

    if debug {
        println!("\n{}", "Recent log:".yellow());
        for entry in log_buffer.get_recent(50) {
            println!("{}", entry.format_for_display());
        }
    }

    if let Err(e) = outcome {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
