// Budget Explorer - CLI
// Loads the budget CSV, prints the cleaning digest and headline metrics,
// and answers year / ministry / selection queries from the terminal.

use anyhow::Result;
use std::env;
use std::path::Path;

use budget_explorer::{
    format_inr_opt, format_percent_opt, BudgetStore, ExplorerConfig, SelectionError,
};

const DEFAULT_DATA_PATH: &str = "data/budget.csv";
const DEFAULT_CONFIG_PATH: &str = "config/explorer.json";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut data_path = DEFAULT_DATA_PATH.to_string();
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" if i + 1 < args.len() => {
                data_path = args[i + 1].clone();
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config_path = args[i + 1].clone();
                i += 2;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => {
                positional.push(args[i].clone());
                i += 1;
            }
        }
    }

    // Config file is optional; the built-in defaults carry the known
    // alias table and watchlist for the 2014-2025 dataset
    let config = if Path::new(&config_path).exists() {
        println!("📋 Loading config from: {}", config_path);
        ExplorerConfig::from_file(&config_path)?
    } else {
        ExplorerConfig::default()
    };

    println!("📂 Loading budget data from: {}", data_path);
    let store = BudgetStore::open(&data_path, config)?;
    println!("✓ Loaded: {}\n", store.report().summary());

    match positional.first().map(|s| s.as_str()) {
        None | Some("summary") => run_summary(&store),
        Some("year") => match positional.get(1) {
            Some(year) => run_year(&store, year),
            None => {
                eprintln!("Usage: budget-explorer year <YYYY-YYYY>");
                std::process::exit(2);
            }
        },
        Some("ministry") => match positional.get(1) {
            Some(name) => run_ministry(&store, name),
            None => {
                eprintln!("Usage: budget-explorer ministry <MINISTRY NAME>");
                std::process::exit(2);
            }
        },
        Some("select") => match (positional.get(1), positional.get(2)) {
            (Some(name), Some(year)) => run_select(&store, name, year),
            _ => {
                eprintln!("Usage: budget-explorer select <MINISTRY NAME> <YYYY-YYYY>");
                std::process::exit(2);
            }
        },
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_usage() {
    println!("Budget Explorer - India's union budget by ministry, 2014-2025");
    println!();
    println!("Usage: budget-explorer [--data <csv>] [--config <json>] [command]");
    println!();
    println!("Commands:");
    println!("  summary                          Headline metrics (default)");
    println!("  year <YYYY-YYYY>                 Watchlist breakdown for one year");
    println!("  ministry <MINISTRY NAME>         One ministry across all years");
    println!("  select <MINISTRY NAME> <YYYY-YYYY>  A single (ministry, year) row");
}

fn run_summary(store: &BudgetStore) {
    let table = store.shares();
    let years = table.years();

    println!("📊 SUMMARY");
    println!("==========\n");

    let (Some(first), Some(last)) = (years.first(), years.last()) else {
        println!("No watchlist data available.");
        return;
    };
    println!("Years covered: {} → {} ({} years)", first, last, years.len());

    // Headline cards: defence growth, agriculture share shift
    match table.growth_multiple("MINISTRY OF DEFENCE", first, last) {
        Ok(growth) => println!("Defence budget growth: {:.1}x ({} → {})", growth, first, last),
        Err(e) => println!("Defence budget growth: {}", e),
    }

    match table.share_shift(
        "MINISTRY OF AGRICULTURE AND FARMERS' WELFARE",
        first,
        last,
    ) {
        Ok(shift) => println!(
            "Agriculture share shift: {:+.1} pp ({} → {})",
            shift, first, last
        ),
        Err(e) => println!("Agriculture share shift: {}", e),
    }

    println!("\nLatest year ({}):", last);
    if let Ok(rows) = table.year_breakdown(last) {
        for record in rows {
            println!(
                "   {:<48} {:>16}  {:>7}",
                record.ministry_name,
                format_inr_opt(record.total_allocation),
                format_percent_opt(record.percent_of_total),
            );
        }
    }

    if !store.report().unmapped_ministries.is_empty() {
        println!(
            "\nℹ️  {} ministry spellings passed through unmapped (run with a richer alias table to fold them)",
            store.report().unmapped_ministries.len()
        );
    }
}

fn run_year(store: &BudgetStore, year: &str) {
    println!("📅 Watchlist breakdown for {}", year);
    println!();

    match store.shares().year_breakdown(year) {
        Ok(rows) => {
            let year_total = rows.first().and_then(|r| r.year_total);
            for record in rows {
                println!(
                    "   {:<48} {:>16}  {:>7}",
                    record.ministry_name,
                    format_inr_opt(record.total_allocation),
                    format_percent_opt(record.percent_of_total),
                );
            }
            println!("   {:<48} {:>16}", "WATCHLIST TOTAL", format_inr_opt(year_total));
        }
        Err(e) => report_no_data(&e),
    }
}

fn run_ministry(store: &BudgetStore, name: &str) {
    println!("🏛️  {} across years", name);
    println!();

    match store.shares().ministry_trend(name) {
        Ok(rows) => {
            for record in rows {
                println!(
                    "   {}  {:>16}  {:>7}",
                    record.year,
                    format_inr_opt(record.total_allocation),
                    format_percent_opt(record.percent_of_total),
                );
            }
        }
        Err(e) => report_no_data(&e),
    }
}

fn run_select(store: &BudgetStore, name: &str, year: &str) {
    match store.shares().select(name, year) {
        Ok(record) => {
            println!("🏛️  {} / {}", record.ministry_name, record.year);
            println!("   Allocation:      {}", format_inr_opt(record.total_allocation));
            println!("   Watchlist total: {}", format_inr_opt(record.year_total));
            println!("   Share:           {}", format_percent_opt(record.percent_of_total));
        }
        Err(e) => report_no_data(&e),
    }
}

fn report_no_data(error: &SelectionError) {
    eprintln!("❌ {}", error);
    std::process::exit(1);
}
