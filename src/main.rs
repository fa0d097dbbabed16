use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use procto_table::config::config::Config;
use procto_table::data::data_exporter::DataExporter;
use procto_table::data::datatable_loaders::load_datatable;
use procto_table::data::view_state::PageSize;
use procto_table::ui::table_component::{DataTableComponent, TableEvent, TableOptions};
use procto_table::ui::table_renderer::render_text;
use procto_table::utils::logging::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct CliArgs {
    fixture: Option<PathBuf>,
    query: Option<String>,
    sort: Option<String>,
    descending: bool,
    page: Option<usize>,
    page_size: Option<PageSize>,
    select: Vec<String>,
    select_all: bool,
    loading: bool,
    export: Option<PathBuf>,
    config: Option<PathBuf>,
    log_level: Option<String>,
    help: bool,
    generate_config: bool,
}

fn print_help() {
    println!("{}", "procto-table - sortable, filterable, paginated tables".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  procto-table [OPTIONS] <FILE.json|FILE.csv>");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}       - Filter rows by free text", "--query Q".green());
    println!("  {}    - Sort by a column field", "--sort FIELD".green());
    println!("  {}          - Sort descending (with --sort)", "--desc".green());
    println!("  {}        - Show page N (1-based)", "--page N".green());
    println!("  {}   - Rows per page: 5, 10, 25 or 50", "--page-size N".green());
    println!("  {}     - Select a row (repeatable)", "--select ID".green());
    println!("  {}    - Select every row", "--select-all".green());
    println!("  {}       - Render the loading state", "--loading".green());
    println!("  {}   - Export the filtered rows (.csv or .json)", "--export PATH".green());
    println!("  {}   - Use this config file", "--config PATH".green());
    println!("  {} - Log level when RUST_LOG is unset", "--log-level L".green());
    println!("  {} - Write a commented default config", "--generate-config".green());
    println!("  {}          - Show this help", "--help".green());
}

fn take_value(args: &[String], index: &mut usize, flag: &str) -> Result<String> {
    *index += 1;
    args.get(*index)
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" => cli.help = true,
            "--generate-config" => cli.generate_config = true,
            "--query" => cli.query = Some(take_value(args, &mut i, arg)?),
            "--sort" => cli.sort = Some(take_value(args, &mut i, arg)?),
            "--desc" => cli.descending = true,
            "--page" => {
                let value = take_value(args, &mut i, arg)?;
                let page: usize = value
                    .parse()
                    .with_context(|| format!("Invalid page '{}'", value))?;
                if page == 0 {
                    bail!("Pages start at 1");
                }
                cli.page = Some(page - 1);
            }
            "--page-size" => {
                let value = take_value(args, &mut i, arg)?;
                let size: usize = value
                    .parse()
                    .with_context(|| format!("Invalid page size '{}'", value))?;
                cli.page_size = Some(PageSize::try_from(size)?);
            }
            "--select" => cli.select.push(take_value(args, &mut i, arg)?),
            "--select-all" => cli.select_all = true,
            "--loading" => cli.loading = true,
            "--export" => cli.export = Some(PathBuf::from(take_value(args, &mut i, arg)?)),
            "--config" => cli.config = Some(PathBuf::from(take_value(args, &mut i, arg)?)),
            "--log-level" => cli.log_level = Some(take_value(args, &mut i, arg)?),
            other if other.starts_with("--") => bail!("Unknown option '{}'", other),
            file => {
                if cli.fixture.is_some() {
                    bail!("Only one data file can be shown, got '{}'", file);
                }
                cli.fixture = Some(PathBuf::from(file));
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn load_config(cli: &CliArgs) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("{}", format!("Config not loaded ({}), using defaults", e).yellow());
        Config::default()
    })
}

fn write_default_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory: {:?}", parent))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file: {:?}", path))?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn run(cli: CliArgs) -> Result<()> {
    let config = load_config(&cli);
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level);

    let fixture = cli
        .fixture
        .as_ref()
        .ok_or_else(|| anyhow!("No data file given (try --help)"))?;
    let loaded = load_datatable(fixture)?;

    let mut options = TableOptions::from(&config.table).with_loading(cli.loading);
    if let Some(title) = loaded.title.clone() {
        options = options.with_title(title);
    }
    if let Some(page_size) = cli.page_size {
        options = options.with_page_size(page_size);
    }
    if cli.select_all || !cli.select.is_empty() {
        options = options.with_selectable(true);
    }

    let mut table = DataTableComponent::new(Arc::new(loaded.table), options);

    if cli.select_all {
        table.handle_event(TableEvent::SelectAllToggled(true));
    }
    for id in &cli.select {
        if !table.handle_event(TableEvent::RowToggled(id.clone())) {
            warn!(target: "cli", "No row with id '{}' to select", id);
        }
    }
    if let Some(query) = &cli.query {
        table.handle_event(TableEvent::SearchChanged(query.clone()));
    }
    if let Some(field) = &cli.sort {
        if table.source().column(field).is_none() {
            warn!(target: "cli", "Sorting by '{}', which has no column", field);
        }
        table.handle_event(TableEvent::HeaderClicked(field.clone()));
        if cli.descending {
            table.handle_event(TableEvent::HeaderClicked(field.clone()));
        }
    }
    if let Some(page) = cli.page {
        table.handle_event(TableEvent::PageChanged(page));
        if table.state().page != page {
            eprintln!(
                "{}",
                format!("Page {} is past the end, showing page {}", page + 1, table.state().page + 1)
                    .yellow()
            );
        }
    }

    let width = crossterm::terminal::size().ok().map(|(cols, _)| cols);
    print!("{}", render_text(&table.render(), &config.display.icons, width));

    if !table.selection().is_empty() {
        let ids: Vec<&str> = table.selection().selected_ids().collect();
        println!("{}", format!("Selected: {}", ids.join(", ")).cyan());
    }

    if let Some(path) = &cli.export {
        let message = DataExporter::export_to_file(&table.view(), path)?;
        println!("{}", message.green());
    }

    info!(target: "cli", "Rendered {:?}", fixture);
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            print_help();
            std::process::exit(2);
        }
    };

    if cli.help {
        print_help();
        return;
    }

    if cli.generate_config {
        if let Err(e) = write_default_config() {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
