use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use marquee::data::stats;
use marquee::data::Lookup;
use marquee::{
    App, CategoryScope, DataSource, FileSource, FilterCriteria, ReaderSource, Settings,
    SortColumn, TierScheme,
};

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Prepare movie revenue data and query derived metrics")]
struct Args {
    /// Path to the movie CSV, or "-" to read from stdin
    #[arg(short, long, default_value = "imdb_movies.csv")]
    file: PathBuf,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Top of the source rating scale (100 for the IMDb revenue dataset)
    #[arg(long)]
    score_scale: Option<f64>,

    /// Earliest release year to include
    #[arg(long)]
    year_min: Option<i32>,

    /// Latest release year to include
    #[arg(long)]
    year_max: Option<i32>,

    /// Lowest score to include (0-10)
    #[arg(long)]
    score_min: Option<f64>,

    /// Highest score to include (0-10)
    #[arg(long)]
    score_max: Option<f64>,

    /// Lowest revenue to include
    #[arg(long)]
    revenue_min: Option<f64>,

    /// Highest revenue to include
    #[arg(long)]
    revenue_max: Option<f64>,

    /// Keep movies tagged with this genre (repeatable; any match keeps the movie)
    #[arg(short, long = "genre")]
    genres: Vec<String>,

    /// Case-insensitive title substring
    #[arg(short, long)]
    search: Option<String>,

    /// Column to sort the table by
    #[arg(long, value_enum, default_value_t = SortArg::Revenue)]
    sort: SortArg,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,

    /// Number of table rows to print
    #[arg(short, long, default_value = "20")]
    limit: usize,

    /// Override the tier scheme from settings
    #[arg(long, value_enum)]
    tiers: Option<TiersArg>,

    /// Override the categorization scope from settings
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Export the current view as a JSON summary and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Export the current view as CSV and exit
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Name,
    Year,
    Revenue,
    Score,
    Roi,
    Profit,
    Category,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortColumn::Name,
            SortArg::Year => SortColumn::Year,
            SortArg::Revenue => SortColumn::Revenue,
            SortArg::Score => SortColumn::Score,
            SortArg::Roi => SortColumn::Roi,
            SortArg::Profit => SortColumn::Profit,
            SortArg::Category => SortColumn::Category,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TiersArg {
    Four,
    Five,
}

impl From<TiersArg> for TierScheme {
    fn from(arg: TiersArg) -> Self {
        match arg {
            TiersArg::Four => TierScheme::Four,
            TiersArg::Five => TierScheme::Five,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    Full,
    Filtered,
}

impl From<ScopeArg> for CategoryScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Full => CategoryScope::FullDataset,
            ScopeArg::Filtered => CategoryScope::FilteredView,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(tiers) = args.tiers {
        settings.tiers = tiers.into();
    }
    if let Some(scope) = args.scope {
        settings.category_scope = scope.into();
    }
    if let Some(scale) = args.score_scale {
        settings.score_scale = scale;
    }
    settings.validate()?;
    debug!(?settings, "settings loaded");

    let source: Box<dyn DataSource> = if args.file.as_os_str() == "-" {
        Box::new(ReaderSource::stdin())
    } else {
        Box::new(FileSource::new(&args.file))
    };

    let mut app = App::new(source, settings);
    app.reload_data()?;
    if app.data.is_none() {
        let reason = app.load_error.as_deref().unwrap_or("no data");
        anyhow::bail!("{}: {}", app.source_description(), reason);
    }

    app.set_criteria(criteria_from(&args));
    app.sort_column = args.sort.into();
    app.sort_ascending = args.asc;

    // Handle export mode (non-interactive)
    if args.export.is_some() || args.export_csv.is_some() {
        if let Some(ref path) = args.export {
            app.export_state(path)?;
        }
        if let Some(ref path) = args.export_csv {
            app.export_csv(path)?;
        }
        return Ok(());
    }

    print_report(&app, args.limit);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "marquee=debug" } else { "marquee=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build filter criteria from the CLI. A single bound leaves the other side open.
fn criteria_from(args: &Args) -> FilterCriteria {
    let mut criteria = FilterCriteria::new();

    if args.year_min.is_some() || args.year_max.is_some() {
        criteria = criteria.with_year_range(
            args.year_min.unwrap_or(i32::MIN),
            args.year_max.unwrap_or(i32::MAX),
        );
    }
    if args.score_min.is_some() || args.score_max.is_some() {
        criteria = criteria
            .with_score_range(args.score_min.unwrap_or(0.0), args.score_max.unwrap_or(10.0));
    }
    if args.revenue_min.is_some() || args.revenue_max.is_some() {
        criteria = criteria.with_revenue_range(
            args.revenue_min.unwrap_or(0.0),
            args.revenue_max.unwrap_or(f64::MAX),
        );
    }
    if !args.genres.is_empty() {
        criteria = criteria.with_genres(args.genres.iter().cloned());
    }
    if let Some(ref needle) = args.search {
        criteria = criteria.with_name(needle.clone());
    }
    criteria
}

fn print_report(app: &App, limit: usize) {
    let Some(ref data) = app.data else {
        return;
    };
    let rows = app.view();
    let settings = &app.settings;
    let labels = settings.lookup();
    let base: Vec<_> = rows.iter().map(|r| r.movie.clone()).collect();

    println!("{}", app.source_description());
    println!("{} of {} movies match", rows.len(), data.len());
    if data.dropped_rows > 0 {
        println!("{} incomplete rows dropped", data.dropped_rows);
    }
    println!();

    println!("Tiers ({:?} scope):", settings.category_scope);
    for (tier, count) in stats::category_counts(&rows, settings.tiers) {
        println!("  {:<18} {}", labels.translate(tier.label()), count);
    }

    let summary = stats::score_summary(&base);
    match summary.mean {
        Some(mean) => println!(
            "Score: mean {:.2} over {} rated, {} unrated",
            mean, summary.rated, summary.unrated
        ),
        None => println!("Score: no rated movies"),
    }
    println!();

    println!("Top genres:");
    for count in stats::genre_counts(&base, settings.top_n) {
        println!("  {:<18} {}", labels.translate(&count.label), count.count);
    }
    println!("Top languages:");
    for count in stats::language_counts(&base, settings.top_n) {
        println!("  {:<18} {}", labels.translate(&count.label), count.count);
    }
    println!("Revenue by country:");
    for country in stats::revenue_by_country(&base, settings.country_codes)
        .into_iter()
        .take(settings.top_n)
    {
        println!(
            "  {:<18} {:>16.0} ({} movies)",
            labels.translate(&country.iso3),
            country.total_revenue,
            country.movies
        );
    }
    println!();

    println!(
        "{:<40} {:>6} {:>16} {:>6} {:>10}  {}",
        "Name",
        "Year",
        "Revenue",
        "Score",
        "ROI %",
        "Tier"
    );
    for row in rows.iter().take(limit) {
        let (record, metrics) = (row.record(), row.metrics());
        let year = if metrics.has_date() { metrics.year.to_string() } else { "-".to_string() };
        let score = record.score.map_or("-".to_string(), |s| format!("{:.1}", s));
        println!(
            "{:<40} {:>6} {:>16.0} {:>6} {:>10.1}  {}",
            truncate(&record.name, 40),
            year,
            record.revenue,
            score,
            metrics.roi_percent,
            labels.translate(row.category.label())
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
