use clap::{Args, Parser, Subcommand};

use focusreport::{
    DateRange, FocusReport, RangeSelector, ReportFilters, Scope, ScoringConfig, Snapshot,
};

#[derive(Parser)]
#[command(name = "focusreport", about = "Productivity reports from exported activity data")]
struct Cli {
    /// Data file (default: ~/.focusreport/data.json)
    #[arg(long)]
    data: Option<String>,

    /// Scoring config file (default: ~/.focusreport/config.json if present)
    #[arg(long)]
    config: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report: totals, consistency, distributions, goals
    Report {
        #[command(flatten)]
        period: PeriodArgs,
        /// Compare against the preceding period of equal length
        #[arg(long)]
        compare: bool,
        /// Scope: global, project, category, goals
        #[arg(long, default_value = "global")]
        scope: String,
        /// Project id for --scope project
        #[arg(long)]
        project: Option<String>,
        /// Category id for --scope category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Goal progress and projected completion
    Goals {
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long)]
        json: bool,
    },
    /// One line per day of the period
    Buckets {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

#[derive(Args)]
struct PeriodArgs {
    /// Range: week, month, year, custom
    #[arg(long, default_value = "week")]
    range: String,
    /// Dates for --range custom (e.g. 2025-01-01..2025-01-31)
    #[arg(long)]
    custom: Option<String>,
}

impl PeriodArgs {
    fn filters(&self) -> anyhow::Result<ReportFilters> {
        let range = RangeSelector::parse(&self.range)?;
        let custom_range = self.custom.as_deref().map(DateRange::parse).transpose()?;
        if custom_range.is_some() && range != RangeSelector::Custom {
            log::warn!("--custom is ignored unless --range custom");
        }
        Ok(ReportFilters {
            range,
            custom_range,
            ..Default::default()
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::load_default()?,
    };
    let snapshot = match &cli.data {
        Some(path) => Snapshot::open_at(path)?,
        None => Snapshot::open()?,
    };
    let engine = FocusReport::new(config);
    let now = chrono::Local::now().naive_local();

    match cli.command {
        Commands::Report {
            period,
            compare,
            scope,
            project,
            category,
            json,
        } => {
            let filters = ReportFilters {
                compare_with_previous: compare,
                scope: Scope::parse(&scope)?,
                project_id: project,
                category_id: category,
                ..period.filters()?
            };
            let r = engine.compute(&filters, snapshot.entities(), now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&r)?);
            } else {
                println!("Report: {} ({})", r.period, filters.range);
                print_stats(&r.stats);
                if let (Some(prev), Some(cmp)) = (&r.previous_period, &r.comparison) {
                    print_comparison(prev, cmp);
                }
                print_consistency(&r.consistency);
                print_distribution("Projects", &r.project_distribution);
                print_distribution("Categories", &r.category_distribution);
                print_goals(&r.goal_progress);
            }
        }
        Commands::Goals { period, json } => {
            let r = engine.compute(&period.filters()?, snapshot.entities(), now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&r.goal_progress)?);
            } else {
                println!("Goals: {}", r.period);
                print_goals(&r.goal_progress);
            }
        }
        Commands::Buckets { period } => {
            let r = engine.compute(&period.filters()?, snapshot.entities(), now)?;
            println!("date,time_seconds,tasks_completed,pomodoros_completed,intensity");
            for b in &r.daily_buckets {
                println!(
                    "{},{},{},{},{:.2}",
                    b.date, b.time_seconds, b.tasks_completed, b.pomodoros_completed, b.intensity
                );
            }
        }
    }

    Ok(())
}

fn format_duration(secs: u64) -> String {
    format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
}

fn print_stats(s: &focusreport::PeriodStats) {
    println!("  Totals:");
    println!("    Tracked:     {}", format_duration(s.total_time_seconds));
    println!("    Tasks:       {}", s.tasks_completed);
    println!("    Pomodoros:   {}", s.pomodoros_completed);
    println!("    Daily avg:   {}", format_duration(s.average_daily_seconds.round() as u64));
    println!("    Std dev:     {:.2} h", s.std_dev_hours);
}

fn print_comparison(prev: &DateRange, c: &focusreport::StatsComparison) {
    println!("  Versus {prev}:");
    for (label, d) in [
        ("Tracked (s)", &c.total_time_seconds),
        ("Tasks", &c.tasks_completed),
        ("Pomodoros", &c.pomodoros_completed),
        ("Active days", &c.active_days),
    ] {
        match d.change_pct {
            Some(pct) => println!("    {label:<12} {:+} ({pct:+.1}%)", d.change),
            None => println!("    {label:<12} {:+}", d.change),
        }
    }
}

fn print_consistency(c: &focusreport::ConsistencyBlock) {
    let f = &c.focus_score;
    println!("  Consistency:");
    println!("    Active days: {}/{}", c.active_days, c.total_days);
    println!("    Streak:      {} (best {})", c.streak.current, c.streak.max);
    println!(
        "    Focus score: {} (consistency {}, concentration {}, streak {}, goals {})",
        f.total, f.consistency, f.time_on_goals, f.streak_relative, f.goal_completion
    );
}

fn print_distribution(title: &str, entries: &[focusreport::metrics::DistributionEntry]) {
    println!("  {title}:");
    if entries.is_empty() {
        println!("    No tracked time");
    }
    for e in entries {
        println!(
            "    {:<20} {:>9} {:>6.2}%  {} tasks",
            e.name,
            format_duration(e.time_seconds),
            e.percentage,
            e.tasks_count
        );
    }
}

fn print_goals(goals: &[focusreport::GoalProgress]) {
    println!("  Goals:");
    if goals.is_empty() {
        println!("    No active goals");
    }
    for g in goals {
        let eta = match g.projected_days_remaining {
            Some(d) if d <= 0 => "target reached".to_string(),
            Some(d) => format!("{d} days left"),
            None => "no projection".to_string(),
        };
        println!(
            "    {:<20} {:>3}%  {:.2}/day  {}  {}",
            g.title,
            g.percentage,
            g.average_rate,
            eta,
            if g.on_track { "on track" } else { "behind" }
        );
    }
}
